//! Resource discovery.

pub mod walker;

pub use walker::ResourceWalker;
