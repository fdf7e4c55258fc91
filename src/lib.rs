//! course-sync - keep a local copy of a Sakai course portal in sync
//!
//! This library logs in to the portal, enumerates the enrolled courses and
//! downloads their materials, fetching a file again only when the portal
//! shows that it changed.
//!
//! # Features
//!
//! - Courseware folders walked recursively, including collapsed subfolders
//! - Lecture video discovery
//! - Pending homework notices
//! - Change ledger in SQLite (displayed date or content checksum)
//! - Bounded concurrent downloads with a per-run report
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use course_sync::adapter::adapters_for;
//! use course_sync::api::{fetch_courses, login, PortalClient};
//! use course_sync::download::{CoordinatorOptions, FetchCoordinator};
//! use course_sync::{Config, Ledger};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let client = PortalClient::from_config(&config)?;
//!
//!     login(&client, &config.portal, &config.account).await?;
//!     let courses = fetch_courses(&client, &config.portal, &config.account).await?;
//!
//!     let ledger = Ledger::open(&config.ledger_path()).await?;
//!     let coordinator = FetchCoordinator::new(
//!         &client,
//!         &ledger,
//!         config.download_directory(),
//!         CoordinatorOptions::from_config(&config),
//!         adapters_for(&config.options.modes),
//!     );
//!     let report = coordinator.run(&courses).await?;
//!     println!("{} new file(s)", report.new.len());
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod api;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod download;
pub mod error;
pub mod fs;
pub mod ledger;
pub mod output;
pub mod page;
pub mod resource;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-exports for convenience
pub use adapter::{adapters_for, SiteAdapter};
pub use api::{PortalClient, Session};
pub use config::Config;
pub use discovery::ResourceWalker;
pub use download::{FetchCoordinator, Report};
pub use error::{Error, Result};
pub use ledger::{Classification, Ledger};
pub use resource::{Course, ResourceDescriptor, ResourceKind};
