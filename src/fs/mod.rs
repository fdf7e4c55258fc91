//! Filesystem module.
//!
//! Provides:
//! - Destination path layout
//! - Filename sanitization

pub mod naming;
pub mod paths;

pub use naming::{sanitize_filename, sanitize_path_component};
pub use paths::{destination_for, ensure_dir, temp_path_for};
