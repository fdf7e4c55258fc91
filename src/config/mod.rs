//! Configuration module for course-sync.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Change-detection policies and course selection
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{AccountConfig, Config, OptionsConfig, PolicyConfig, PortalConfig};
pub use modes::{CourseSelection, MarkerPolicy};
pub use validation::validate_config;
