//! Domain types shared across the frontdesk workspace.
//!
//! This crate has no internal dependencies so it can be used by the
//! API server, the directory syncer, and any future CLI tooling.

pub mod error;
pub mod signature;
pub mod status;
pub mod types;
