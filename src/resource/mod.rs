//! Resource module.
//!
//! Provides the course and resource descriptor types shared by discovery,
//! the change ledger and the download engine.

pub mod item;

pub use item::{Course, ResourceDescriptor, ResourceKind};
