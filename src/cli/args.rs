//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, CourseSelection};
use crate::resource::ResourceKind;

/// Course portal sync CLI.
#[derive(Parser, Debug)]
#[command(
    name = "course-sync",
    version,
    about = "Sync course materials from a Sakai course portal",
    long_about = "A CLI tool to download courseware and lecture videos from a Sakai course portal\n\
                  and to report homework that is still waiting for submission.\n\n\
                  Files already downloaded are only fetched again when the portal shows a change."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Portal login name.
    #[arg(short, long, env = "PORTAL_USERNAME")]
    pub username: Option<String>,

    /// Portal password.
    #[arg(short, long, env = "PORTAL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Student id of a second identity to switch to before listing courses.
    #[arg(long, env = "PORTAL_ANOTHER_USER")]
    pub another_user: Option<String>,

    /// Resource kinds to sync: courseware, video, homework.
    /// Repeat the flag or separate values with commas.
    #[arg(short, long, value_delimiter = ',')]
    pub mode: Vec<ResourceKind>,

    /// Courses to sync: "all" or indices from --list-courses, e.g. "0 2 5".
    #[arg(long)]
    pub courses: Option<CourseSelection>,

    /// Log in, print the enrolled courses and exit.
    #[arg(long)]
    pub list_courses: bool,

    /// Maximum number of simultaneous downloads.
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Download to a temporary file and move it into place when complete.
    #[arg(long)]
    pub atomic_writes: bool,

    /// Path of the change ledger database.
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(username) = &self.username {
            config.account.username = username.clone();
        }

        if let Some(password) = &self.password {
            config.account.password = password.clone();
        }

        if let Some(id) = &self.another_user {
            config.account.another_user = Some(id.clone());
        }

        if let Some(dir) = &self.download_directory {
            config.options.download_directory = Some(dir.clone());
        }

        if !self.mode.is_empty() {
            config.options.modes = self.mode.clone();
        }

        if let Some(courses) = &self.courses {
            config.options.courses = courses.clone();
        }

        if let Some(max) = self.max_concurrent {
            config.options.max_concurrent_downloads = max;
        }

        if let Some(ledger) = &self.ledger {
            config.options.ledger_path = Some(ledger.clone());
        }

        // Boolean flags (only override if set to non-default)
        if self.atomic_writes {
            config.options.atomic_writes = true;
        }

        if self.quiet {
            config.options.show_progress = false;
        }
    }
}
