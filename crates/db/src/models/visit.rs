//! Visit entity models and DTOs.

use frontdesk_core::status::VisitStatus;
use frontdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `visits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Visit {
    pub id: DbId,
    pub employee_id: DbId,
    pub notes: Option<String>,
    /// Raw status text; use [`Visit::status`] for the typed view.
    pub status: String,
    /// Handle of the Slack message posted for this visit, set after the
    /// first successful delivery. Needed to edit the message in place.
    pub slack_message_ts: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Visit {
    /// Typed view of the status column.
    ///
    /// The CHECK constraint keeps the column inside the enum, so the
    /// fallback arm is unreachable in practice.
    pub fn status(&self) -> VisitStatus {
        VisitStatus::parse(&self.status).unwrap_or(VisitStatus::Pending)
    }
}

/// DTO for creating a visit from the visitor-submission flow.
#[derive(Debug, Deserialize)]
pub struct CreateVisit {
    pub employee_id: DbId,
    pub notes: Option<String>,
}

/// A visit joined with the employee (and department) it targets.
///
/// This is the shape the notification path needs: one query instead of
/// three round trips.
#[derive(Debug, Clone, FromRow)]
pub struct VisitForNotification {
    pub id: DbId,
    pub employee_id: DbId,
    pub notes: Option<String>,
    pub status: String,
    pub slack_message_ts: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub employee_name: String,
    pub employee_slack_user_id: String,
    pub department_name: String,
}

impl VisitForNotification {
    pub fn status(&self) -> VisitStatus {
        VisitStatus::parse(&self.status).unwrap_or(VisitStatus::Pending)
    }
}
