//! Change ledger module.
//!
//! This module provides:
//! - A persistent key to change-marker store deciding new/updated/unchanged
//! - MD5 content digests for the checksum marker policy

pub mod hash;
pub mod store;

pub use hash::{hash_file, ContentDigest};
pub use store::{Classification, Ledger, LedgerRecord};
