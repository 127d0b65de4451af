//! Scheduled employee directory synchronisation.
//!
//! Spawns a background task that runs a full directory sync on a fixed
//! interval so the employee roster tracks the HR system without manual
//! triggering. Runs on `tokio::time::interval`; each run records its own
//! `sync_logs` entry, so failures here are logged and waited out rather
//! than retried immediately.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use frontdesk_directory::{DirectoryClient, EmployeeSyncer};

use crate::config::DirectoryConfig;

/// Run the scheduled directory sync loop.
///
/// Does nothing (beyond a warning) when the directory API is not
/// configured. Runs until `cancel` is triggered.
pub async fn run(pool: PgPool, config: DirectoryConfig, cancel: CancellationToken) {
    let client = match DirectoryClient::from_config(
        config.base_url.as_deref(),
        config.access_token.as_deref(),
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "Directory sync job not started");
            return;
        }
    };

    let interval_hours = config.sync_interval_hours;
    let period = Duration::from_secs(interval_hours * 3600);

    tracing::info!(interval_hours, "Directory sync job started");

    let syncer = EmployeeSyncer::new(client);
    let mut interval = tokio::time::interval(period);
    // The first tick fires immediately; skip it so a freshly booted
    // server does not hammer the directory API on every restart.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Directory sync job stopping");
                break;
            }
            _ = interval.tick() => {
                match syncer.run(&pool).await {
                    Ok(stats) => {
                        tracing::info!(
                            created = stats.created,
                            updated = stats.updated,
                            deactivated = stats.deactivated,
                            skipped = stats.skipped,
                            errors = stats.errors.len(),
                            "Scheduled directory sync finished"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Scheduled directory sync failed");
                    }
                }
            }
        }
    }
}
