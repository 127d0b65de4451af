//! Sync log entity model.

use frontdesk_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Outcome values for the `sync_logs.status` column.
pub const SYNC_STATUS_SUCCESS: &str = "success";
pub const SYNC_STATUS_FAILED: &str = "failed";

/// A row from the `sync_logs` table. Append-only: one row per
/// directory sync run, never mutated afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SyncLog {
    pub id: DbId,
    pub service: String,
    pub status: String,
    /// Structured run detail: counters and the per-record error list.
    pub details: serde_json::Value,
    pub error_message: Option<String>,
    pub synced_at: Timestamp,
}
