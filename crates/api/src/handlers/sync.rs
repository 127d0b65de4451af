//! On-demand directory sync trigger and sync log listing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use frontdesk_db::repositories::SyncLogRepo;
use frontdesk_directory::{DirectoryClient, EmployeeSyncer};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// How many log entries the listing returns.
const SYNC_LOG_LIMIT: i64 = 20;

/// POST /api/v1/admin/sync
///
/// Kick off a directory sync run in the background. The outcome lands
/// in `sync_logs`; this endpoint only reports that the run started.
pub async fn trigger_sync(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let directory = &state.config.directory;
    let client = DirectoryClient::from_config(
        directory.base_url.as_deref(),
        directory.access_token.as_deref(),
    )
    .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let pool = state.pool.clone();
    tokio::spawn(async move {
        // The syncer writes its own sync log entry on both outcomes.
        let _ = EmployeeSyncer::new(client).run(&pool).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "data": { "started": true } })),
    ))
}

/// GET /api/v1/admin/sync/logs
///
/// Most recent sync runs, newest first.
pub async fn list_sync_logs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let logs = SyncLogRepo::list_recent(&state.pool, SYNC_LOG_LIMIT).await?;
    Ok(Json(DataResponse { data: logs }))
}
