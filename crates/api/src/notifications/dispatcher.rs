//! Dispatches the initial Slack notification for a new visit.
//!
//! One dispatch job per visit id, handed off via `tokio::spawn` from
//! the visit-creation handler. Transport and platform failures are
//! retried with exponential backoff; a missing visit and a missing
//! Slack configuration are permanent conditions and are not.

use std::sync::Arc;
use std::time::Duration;

use frontdesk_core::types::DbId;
use frontdesk_db::repositories::VisitRepo;
use frontdesk_slack::{MessageBuilder, SlackClient, SlackError};
use sqlx::PgPool;

/// Retry delays between attempts (exponential backoff), giving three
/// attempts in total.
const RETRY_DELAYS_SECS: [u64; 2] = [1, 2];

/// Why a single notification attempt failed.
#[derive(Debug, thiserror::Error)]
enum DispatchError {
    /// The visit disappeared (or never existed). Never retried.
    #[error("Visit {0} not found")]
    VisitNotFound(DbId),

    #[error(transparent)]
    Slack(#[from] SlackError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DispatchError {
    fn is_permanent(&self) -> bool {
        matches!(
            self,
            DispatchError::VisitNotFound(_) | DispatchError::Slack(SlackError::NotConfigured(_))
        )
    }
}

/// Sends the initial notification for newly created visits.
pub struct NotificationDispatcher {
    pool: PgPool,
    slack: Option<Arc<SlackClient>>,
}

impl NotificationDispatcher {
    pub fn new(pool: PgPool, slack: Option<Arc<SlackClient>>) -> Self {
        Self { pool, slack }
    }

    /// Notify Slack about a visit, retrying transient failures.
    ///
    /// When Slack is not configured this is a silent no-op: running
    /// without notifications is a supported mode, not an error.
    pub async fn dispatch(&self, visit_id: DbId) {
        let Some(slack) = &self.slack else {
            tracing::warn!(
                visit_id,
                "Skipping visit notification: Slack is not configured"
            );
            return;
        };

        tracing::info!(visit_id, "Dispatching visit notification");

        let mut attempt = 1;
        loop {
            match self.try_notify(slack, visit_id).await {
                Ok(()) => {
                    tracing::info!(visit_id, attempt, "Visit notification sent");
                    return;
                }
                Err(e) if e.is_permanent() => {
                    tracing::error!(visit_id, error = %e, "Visit notification discarded");
                    return;
                }
                Err(e) => {
                    let Some(&delay) = RETRY_DELAYS_SECS.get(attempt - 1) else {
                        tracing::error!(
                            visit_id,
                            attempt,
                            error = %e,
                            "Visit notification failed after all retries"
                        );
                        return;
                    };
                    tracing::warn!(
                        visit_id,
                        attempt,
                        error = %e,
                        "Visit notification attempt failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// One attempt: load, render, post, persist the message handle.
    async fn try_notify(&self, slack: &SlackClient, visit_id: DbId) -> Result<(), DispatchError> {
        let visit = VisitRepo::find_for_notification(&self.pool, visit_id)
            .await?
            .ok_or(DispatchError::VisitNotFound(visit_id))?;

        let builder = MessageBuilder {
            visit_id: visit.id,
            status: visit.status(),
            employee_name: &visit.employee_name,
            employee_slack_user_id: &visit.employee_slack_user_id,
            department_name: &visit.department_name,
            notes: visit.notes.as_deref(),
            responder: None,
            responded_at: None,
        };

        let ts = slack
            .post_message(&builder.plain_text(), &builder.blocks())
            .await?;

        // Direct field update: no re-validation, no re-notification.
        VisitRepo::set_message_ts(&self.pool, visit_id, &ts).await?;
        Ok(())
    }
}
