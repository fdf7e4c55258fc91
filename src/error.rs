//! Error types for the course-sync application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Portal errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    // Ledger errors
    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Ledger database error: {0}")]
    Database(#[from] sqlx::Error),

    // File system errors
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config file errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error comes from the ledger store.
    ///
    /// Ledger failures end the whole run since no resource can be
    /// classified without the store.
    pub fn is_ledger(&self) -> bool {
        matches!(self, Error::Ledger(_) | Error::Database(_))
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const PORTAL_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const LEDGER_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_DOWNLOADS_FAILED: i32 = 6;
}
