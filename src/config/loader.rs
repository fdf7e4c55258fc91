//! Configuration structures and loading logic.

use crate::config::modes::{CourseSelection, MarkerPolicy};
use crate::error::{Error, Result};
use crate::resource::ResourceKind;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub portal: PortalConfig,

    #[serde(default)]
    pub options: OptionsConfig,

    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Portal account credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Login name (usually the e-mail address registered with the portal).
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Student id of a second identity to switch to before listing courses.
    #[serde(default)]
    pub another_user: Option<String>,
}

impl AccountConfig {
    /// The configured second identity, ignoring blank values.
    pub fn another_user(&self) -> Option<&str> {
        self.another_user
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Portal endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Form login endpoint answering with `{"f": bool, "msg": string}`.
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Page that redirects into the course site.
    #[serde(default = "default_entry_url")]
    pub entry_url: String,

    /// Page visited after login to establish the course-site session.
    #[serde(default = "default_app_store_url")]
    pub app_store_url: String,

    /// Course site portal; switching identity requires https.
    #[serde(default = "default_course_portal_url")]
    pub course_portal_url: String,
}

/// Run options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Base directory for downloads.
    #[serde(default)]
    pub download_directory: Option<PathBuf>,

    /// Path of the change ledger database.
    #[serde(default)]
    pub ledger_path: Option<PathBuf>,

    /// Resource kinds to process.
    #[serde(default = "default_modes")]
    pub modes: Vec<ResourceKind>,

    /// Courses to process.
    #[serde(default)]
    pub courses: CourseSelection,

    /// Upper bound on simultaneous transfers.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Timeout for page requests.
    #[serde(default = "default_page_timeout")]
    pub page_timeout_seconds: u64,

    /// Timeout for establishing a download and for each body read.
    #[serde(default = "default_download_timeout")]
    pub download_timeout_seconds: u64,

    /// Write buffer size used while streaming a file to disk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Write to a temporary file and rename it once the transfer completes.
    #[serde(default)]
    pub atomic_writes: bool,

    /// Whether to show the download progress bar.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            download_directory: None,
            ledger_path: None,
            modes: default_modes(),
            courses: CourseSelection::All,
            max_concurrent_downloads: default_max_concurrent(),
            page_timeout_seconds: default_page_timeout(),
            download_timeout_seconds: default_download_timeout(),
            chunk_size: default_chunk_size(),
            atomic_writes: false,
            show_progress: true,
        }
    }
}

/// Change-detection policy per resource kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub courseware: MarkerPolicy,

    #[serde(default)]
    pub video: MarkerPolicy,
}

impl PolicyConfig {
    /// Policy applied to a resource kind.
    pub fn for_kind(&self, kind: ResourceKind) -> MarkerPolicy {
        match kind {
            ResourceKind::Courseware => self.courseware,
            ResourceKind::Video => self.video,
            ResourceKind::Homework => MarkerPolicy::Displayed,
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.122 Safari/537.36 Edg/80.0.361.62".to_string()
}

fn default_login_url() -> String {
    "http://onestop.ucas.ac.cn/Ajax/Login/0".to_string()
}

fn default_entry_url() -> String {
    "http://sep.ucas.ac.cn/portal/site/16/801".to_string()
}

fn default_app_store_url() -> String {
    "http://sep.ucas.ac.cn/appStore".to_string()
}

fn default_course_portal_url() -> String {
    "https://course.ucas.ac.cn/portal".to_string()
}

fn default_modes() -> Vec<ResourceKind> {
    vec![ResourceKind::Courseware]
}

fn default_max_concurrent() -> usize {
    8
}

fn default_page_timeout() -> u64 {
    10
}

fn default_download_timeout() -> u64 {
    20
}

fn default_chunk_size() -> usize {
    1024
}

fn default_true() -> bool {
    true
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            user_agent: default_user_agent(),
            another_user: None,
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            entry_url: default_entry_url(),
            app_store_url: default_app_store_url(),
            course_portal_url: default_course_portal_url(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.options
            .download_directory
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Get the effective ledger database path.
    pub fn ledger_path(&self) -> PathBuf {
        if let Some(path) = &self.options.ledger_path {
            return path.clone();
        }

        ProjectDirs::from("", "", "course-sync")
            .map(|dirs| dirs.data_dir().join("courses.db"))
            .unwrap_or_else(|| PathBuf::from("courses.db"))
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.options.page_timeout_seconds)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.options.download_timeout_seconds)
    }
}
