//! Repository for the `visits` table.

use frontdesk_core::status::VisitStatus;
use frontdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::visit::{Visit, VisitForNotification};

/// Column list for `visits` queries.
const COLUMNS: &str = "id, employee_id, notes, status, slack_message_ts, created_at, updated_at";

/// Outcome of the guarded `pending -> terminal` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// This call won the race and persisted the new status.
    Applied,
    /// The visit had already left `pending`; nothing was written.
    AlreadyResponded,
}

/// Provides persistence operations for visits.
pub struct VisitRepo;

impl VisitRepo {
    /// Create a pending visit for an employee.
    pub async fn create(
        pool: &PgPool,
        employee_id: DbId,
        notes: Option<&str>,
    ) -> Result<Visit, sqlx::Error> {
        let query = format!(
            "INSERT INTO visits (employee_id, notes) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Visit>(&query)
            .bind(employee_id)
            .bind(notes)
            .fetch_one(pool)
            .await
    }

    /// Fetch a visit by id.
    pub async fn find(pool: &PgPool, visit_id: DbId) -> Result<Option<Visit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visits WHERE id = $1");
        sqlx::query_as::<_, Visit>(&query)
            .bind(visit_id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a visit joined with its employee and department, as needed
    /// by the notification path.
    pub async fn find_for_notification(
        pool: &PgPool,
        visit_id: DbId,
    ) -> Result<Option<VisitForNotification>, sqlx::Error> {
        sqlx::query_as::<_, VisitForNotification>(
            "SELECT v.id, v.employee_id, v.notes, v.status, v.slack_message_ts, \
                    v.created_at, v.updated_at, \
                    e.name AS employee_name, e.slack_user_id AS employee_slack_user_id, \
                    d.name AS department_name \
             FROM visits v \
             JOIN employees e ON e.id = v.employee_id \
             JOIN departments d ON d.id = e.department_id \
             WHERE v.id = $1",
        )
        .bind(visit_id)
        .fetch_optional(pool)
        .await
    }

    /// Atomically move a visit out of `pending`.
    ///
    /// The `WHERE status = 'pending'` clause is the concurrency guard:
    /// of two concurrent calls for the same visit, exactly one matches
    /// the row and the other observes
    /// [`TransitionOutcome::AlreadyResponded`]. `new_status` must be a
    /// terminal status; the action-id mapping upstream guarantees this.
    pub async fn transition_from_pending(
        pool: &PgPool,
        visit_id: DbId,
        new_status: VisitStatus,
    ) -> Result<TransitionOutcome, sqlx::Error> {
        debug_assert!(new_status.is_terminal());

        let result = sqlx::query(
            "UPDATE visits \
             SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(visit_id)
        .bind(new_status.as_str())
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            Ok(TransitionOutcome::Applied)
        } else {
            Ok(TransitionOutcome::AlreadyResponded)
        }
    }

    /// Store the Slack message handle after a successful post.
    ///
    /// A plain field assignment: no validation, no notification side
    /// effects. Last successful post wins.
    pub async fn set_message_ts(
        pool: &PgPool,
        visit_id: DbId,
        message_ts: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE visits SET slack_message_ts = $2 WHERE id = $1")
            .bind(visit_id)
            .bind(message_ts)
            .execute(pool)
            .await?;
        Ok(())
    }
}
