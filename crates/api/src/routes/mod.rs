pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /slack/actions            interactivity webhook (POST)
///
/// /employees                visitor-facing listing (GET)
/// /visits                   visit creation handoff (POST)
/// /visits/{id}/status       polling endpoint (GET)
///
/// /admin/sync               trigger directory sync (POST)
/// /admin/sync/logs          recent sync runs (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/slack/actions", post(handlers::slack_actions::receive_action))
        .route("/employees", get(handlers::employees::list_employees))
        .route("/visits", post(handlers::visits::create_visit))
        .route("/visits/{id}/status", get(handlers::visits::visit_status))
        .route("/admin/sync", post(handlers::sync::trigger_sync))
        .route("/admin/sync/logs", get(handlers::sync::list_sync_logs))
}
