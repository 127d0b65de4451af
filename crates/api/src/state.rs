use std::sync::Arc;

use frontdesk_core::signature::SignatureVerifier;
use frontdesk_slack::SlackClient;

use crate::config::ServerConfig;
use crate::notifications::NotificationDispatcher;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: frontdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Webhook signature verifier built from the configured secret.
    pub verifier: SignatureVerifier,
    /// Slack client, or `None` when notifications are disabled.
    pub slack: Option<Arc<SlackClient>>,
    /// Outbound visit-notification dispatcher.
    pub dispatcher: Arc<NotificationDispatcher>,
}
