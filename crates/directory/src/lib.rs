//! External HR directory integration: the paginated API client and the
//! reconciliation syncer that mirrors directory records into the local
//! employee table.

pub mod client;
pub mod record;
pub mod syncer;

pub use client::{DirectoryClient, DirectoryError};
pub use record::RemoteEmployee;
pub use syncer::{EmployeeSyncer, SyncStats};
