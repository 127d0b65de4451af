//! Reconciliation of directory records into the local employee table.
//!
//! One run fetches the full remote set, upserts each record with
//! change detection, deactivates local employees that disappeared
//! upstream, and writes exactly one sync log entry. Per-record
//! failures are isolated: one bad record never blocks the rest.

use frontdesk_db::models::employee::{CreateEmployee, SyncedFields};
use frontdesk_db::models::sync_log::{SYNC_STATUS_FAILED, SYNC_STATUS_SUCCESS};
use frontdesk_db::repositories::{DepartmentRepo, EmployeeRepo, SyncLogRepo};
use sqlx::PgPool;

use crate::client::{DirectoryClient, DirectoryError};
use crate::record::RemoteEmployee;

/// Service name written to `sync_logs.service`.
pub const SERVICE_NAME: &str = "directory";

/// Counters for one sync run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    pub created: u32,
    pub updated: u32,
    pub deactivated: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

impl SyncStats {
    /// Structured detail payload for the sync log entry.
    pub fn to_details(&self) -> serde_json::Value {
        serde_json::json!({
            "created": self.created,
            "updated": self.updated,
            "deactivated": self.deactivated,
            "skipped": self.skipped,
            "errors": self.errors,
        })
    }
}

/// What one remote record did to the local table.
enum RecordOutcome {
    Created,
    Updated,
    Skipped,
}

/// Drives one full directory sync run.
pub struct EmployeeSyncer {
    client: DirectoryClient,
}

impl EmployeeSyncer {
    pub fn new(client: DirectoryClient) -> Self {
        Self { client }
    }

    /// Run a full sync and record the outcome in `sync_logs`.
    ///
    /// Exactly one log entry is written per run, success or failure;
    /// a failure to write the log itself is swallowed so it can never
    /// fail the run retroactively.
    pub async fn run(&self, pool: &PgPool) -> Result<SyncStats, DirectoryError> {
        match self.sync_all(pool).await {
            Ok(stats) => {
                tracing::info!(
                    created = stats.created,
                    updated = stats.updated,
                    deactivated = stats.deactivated,
                    skipped = stats.skipped,
                    errors = stats.errors.len(),
                    "Directory sync completed"
                );
                write_sync_log(pool, SYNC_STATUS_SUCCESS, &stats, None).await;
                Ok(stats)
            }
            Err((error, partial)) => {
                tracing::error!(error = %error, "Directory sync failed");
                write_sync_log(pool, SYNC_STATUS_FAILED, &partial, Some(&error.to_string())).await;
                Err(error)
            }
        }
    }

    /// Fetch and reconcile, returning partial stats alongside a fatal
    /// error so the failure log still carries whatever was applied.
    async fn sync_all(&self, pool: &PgPool) -> Result<SyncStats, (DirectoryError, SyncStats)> {
        let mut stats = SyncStats::default();

        let remote = self
            .client
            .fetch_all_employees()
            .await
            .map_err(|e| (e, SyncStats::default()))?;

        for record in &remote {
            match self.sync_one(pool, record).await {
                Ok(RecordOutcome::Created) => stats.created += 1,
                Ok(RecordOutcome::Updated) => stats.updated += 1,
                Ok(RecordOutcome::Skipped) => stats.skipped += 1,
                Err(e) => {
                    tracing::error!(external_id = %record.id, error = %e, "Failed to sync employee");
                    stats.errors.push(format!("Employee {}: {e}", record.id));
                }
            }
        }

        // An empty remote set is indistinguishable from a broken feed;
        // deactivating the whole roster over it is never right.
        if remote.is_empty() {
            tracing::warn!("Directory returned no employees; skipping deactivation");
            return Ok(stats);
        }

        let seen: Vec<String> = remote.iter().map(|r| r.id.clone()).collect();
        match EmployeeRepo::deactivate_missing(pool, &seen).await {
            Ok(deactivated) => {
                for employee in &deactivated {
                    tracing::info!(
                        employee = %employee.name,
                        external_id = ?employee.external_id,
                        "Deactivated employee missing from directory"
                    );
                }
                stats.deactivated = deactivated.len() as u32;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to deactivate missing employees");
                stats.errors.push(format!("Deactivation: {e}"));
            }
        }

        Ok(stats)
    }

    /// Reconcile one remote record.
    ///
    /// `visible_to_visitors` is never part of either path: creation
    /// leaves the schema default, updates exclude the column entirely.
    async fn sync_one(
        &self,
        pool: &PgPool,
        record: &RemoteEmployee,
    ) -> Result<RecordOutcome, sqlx::Error> {
        let department = DepartmentRepo::find_or_create(pool, record.department_name()).await?;

        let fields = SyncedFields {
            name: record.full_name(),
            email: record.email.clone(),
            department_id: department.id,
            is_active: record.is_active(),
        };

        match EmployeeRepo::find_by_external_id(pool, &record.id).await? {
            Some(existing) => {
                if existing.differs_from(&fields) {
                    EmployeeRepo::update_synced_fields(pool, existing.id, &fields).await?;
                    tracing::info!(
                        employee = %fields.name,
                        external_id = %record.id,
                        "Updated employee from directory"
                    );
                    Ok(RecordOutcome::Updated)
                } else {
                    tracing::debug!(employee = %fields.name, "Employee unchanged, skipping");
                    Ok(RecordOutcome::Skipped)
                }
            }
            None => {
                let created = EmployeeRepo::create(
                    pool,
                    &CreateEmployee {
                        name: fields.name,
                        email: fields.email,
                        slack_user_id: record.chat_user_id(),
                        department_id: fields.department_id,
                        is_active: fields.is_active,
                        external_id: Some(record.id.clone()),
                    },
                )
                .await?;
                tracing::info!(
                    employee = %created.name,
                    external_id = %record.id,
                    "Created employee from directory"
                );
                Ok(RecordOutcome::Created)
            }
        }
    }
}

/// Append the run's sync log entry; never propagate a logging failure.
async fn write_sync_log(
    pool: &PgPool,
    status: &str,
    stats: &SyncStats,
    error_message: Option<&str>,
) {
    let details = stats.to_details();
    if let Err(e) =
        SyncLogRepo::create(pool, SERVICE_NAME, status, &details, error_message).await
    {
        tracing::error!(error = %e, "Failed to write sync log entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_details_include_all_counters() {
        let stats = SyncStats {
            created: 2,
            updated: 1,
            deactivated: 3,
            skipped: 4,
            errors: vec!["Employee E9: boom".to_string()],
        };
        let details = stats.to_details();
        assert_eq!(details["created"], 2);
        assert_eq!(details["updated"], 1);
        assert_eq!(details["deactivated"], 3);
        assert_eq!(details["skipped"], 4);
        assert_eq!(details["errors"][0], "Employee E9: boom");
    }
}
