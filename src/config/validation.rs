//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Smallest accepted write chunk.
const MIN_CHUNK_SIZE: usize = 512;

/// Largest accepted write chunk (1 MiB).
const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_credentials(&config.account.username, &config.account.password)?;
    validate_url("portal.login_url", &config.portal.login_url)?;
    validate_url("portal.entry_url", &config.portal.entry_url)?;
    validate_url("portal.app_store_url", &config.portal.app_store_url)?;
    validate_url("portal.course_portal_url", &config.portal.course_portal_url)?;
    validate_options(config)?;

    Ok(())
}

/// Validate the login credentials.
pub fn validate_credentials(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::MissingConfig("account.username".to_string()));
    }

    if password.is_empty() {
        return Err(Error::MissingConfig(
            "account.password (or set PORTAL_PASSWORD)".to_string(),
        ));
    }

    let lower = username.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_username") {
        return Err(Error::ConfigValidation {
            field: "account.username".to_string(),
            message: "Username appears to be a placeholder. Please provide your portal login."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate that a configured endpoint is an http(s) URL.
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = url::Url::parse(value).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("Unsupported URL scheme '{}'", url.scheme()),
        });
    }

    Ok(())
}

/// Validate numeric run options.
pub fn validate_options(config: &Config) -> Result<()> {
    let options = &config.options;

    if options.modes.is_empty() {
        return Err(Error::ConfigValidation {
            field: "options.modes".to_string(),
            message: "At least one of courseware, video or homework must be selected".to_string(),
        });
    }

    if options.max_concurrent_downloads == 0 {
        return Err(Error::ConfigValidation {
            field: "options.max_concurrent_downloads".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    if options.page_timeout_seconds == 0 || options.download_timeout_seconds == 0 {
        return Err(Error::ConfigValidation {
            field: "options.*_timeout_seconds".to_string(),
            message: "Timeouts must be greater than zero".to_string(),
        });
    }

    if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&options.chunk_size) {
        return Err(Error::ConfigValidation {
            field: "options.chunk_size".to_string(),
            message: format!(
                "Chunk size must be between {} and {} bytes (got {})",
                MIN_CHUNK_SIZE, MAX_CHUNK_SIZE, options.chunk_size
            ),
        });
    }

    Ok(())
}
