//! Portal access module.
//!
//! This module provides:
//! - The `Session` capability shared by discovery and downloads
//! - A reqwest-backed client with a cookie store
//! - The login flow and course enumeration

pub mod auth;
pub mod client;
pub mod session;

pub use auth::{fetch_courses, login};
pub use client::PortalClient;
pub use session::{ByteStream, Session};
