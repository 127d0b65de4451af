//! Repository for the `sync_logs` table.

use frontdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::sync_log::SyncLog;

/// Column list for `sync_logs` queries.
const COLUMNS: &str = "id, service, status, details, error_message, synced_at";

/// Provides persistence operations for sync logs.
pub struct SyncLogRepo;

impl SyncLogRepo {
    /// Append one sync log entry, returning the generated id.
    pub async fn create(
        pool: &PgPool,
        service: &str,
        status: &str,
        details: &serde_json::Value,
        error_message: Option<&str>,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO sync_logs (service, status, details, error_message, synced_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             RETURNING id",
        )
        .bind(service)
        .bind(status)
        .bind(details)
        .bind(error_message)
        .fetch_one(pool)
        .await
    }

    /// List the most recent sync log entries, newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<SyncLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sync_logs ORDER BY synced_at DESC LIMIT $1"
        );
        sqlx::query_as::<_, SyncLog>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
