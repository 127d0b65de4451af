//! Employee entity models and DTOs.

use frontdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `employees` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub slack_user_id: String,
    pub department_id: DbId,
    pub is_active: bool,
    /// Operator-curated flag. Directory sync must never write it.
    pub visible_to_visitors: bool,
    /// Id of this employee in the external HR directory, when synced.
    pub external_id: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new employee.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    pub email: Option<String>,
    pub slack_user_id: String,
    pub department_id: DbId,
    pub is_active: bool,
    pub external_id: Option<String>,
}

/// The directory-sourced fields the syncer is allowed to update.
///
/// `visible_to_visitors` is deliberately absent: it survives every
/// sync cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedFields {
    pub name: String,
    pub email: Option<String>,
    pub department_id: DbId,
    pub is_active: bool,
}

impl Employee {
    /// Whether the stored directory-sourced fields differ from `fields`.
    ///
    /// Email comparison is case-insensitive, matching the storage
    /// normalization.
    pub fn differs_from(&self, fields: &SyncedFields) -> bool {
        let stored_email = self.email.as_deref().map(str::to_lowercase);
        let new_email = fields.email.as_deref().map(str::to_lowercase);
        self.name != fields.name
            || stored_email != new_email
            || self.department_id != fields.department_id
            || self.is_active != fields.is_active
    }
}

/// Default avatar for employees created without one.
pub fn default_avatar_url(name: &str) -> String {
    let query = serde_urlencoded::to_string([("name", name)]).unwrap_or_default();
    format!("https://ui-avatars.com/api/?{query}&background=random&size=200")
}
