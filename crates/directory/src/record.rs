//! Remote employee records as returned by the directory API.
//!
//! The API has grown several shapes for the same information over
//! time (name fields, department nesting), so the accessors here
//! encode the priority order rather than leaving it to callers.

use serde::Deserialize;
use serde_json::Value;

/// Fallback department for records carrying no department at all.
pub const UNASSIGNED_DEPARTMENT: &str = "Unassigned";

/// Prefix for the synthetic chat identifier assigned when no real one
/// is discoverable. Not a real notification target; an operator is
/// expected to fix it manually.
pub const PLACEHOLDER_CHAT_ID_PREFIX: &str = "EXTERNAL_";

/// Employment status value marking a resigned employee.
const STATUS_RESIGNED: &str = "resigned";

/// One employee record from the directory API.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEmployee {
    pub id: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub emp_status: Option<String>,
    /// Either an object with a `name` field or a plain string,
    /// depending on API vintage.
    #[serde(default)]
    pub department: Option<Value>,
    #[serde(default)]
    pub dept_name: Option<String>,
    #[serde(default)]
    pub custom_fields: Option<Value>,
}

impl RemoteEmployee {
    /// Surname + given name, trimmed. Either half may be absent.
    pub fn full_name(&self) -> String {
        let last = non_empty(&self.last_name).or_else(|| non_empty(&self.family_name));
        let first = non_empty(&self.first_name).or_else(|| non_empty(&self.given_name));
        format!("{} {}", last.unwrap_or(""), first.unwrap_or(""))
            .trim()
            .to_string()
    }

    /// Department name, checking the possible field shapes in priority
    /// order: `department.name` object, `dept_name`, plain-string
    /// `department`, then the fixed fallback.
    pub fn department_name(&self) -> &str {
        if let Some(name) = self
            .department
            .as_ref()
            .and_then(|d| d.get("name"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            return name;
        }
        if let Some(name) = non_empty(&self.dept_name) {
            return name;
        }
        if let Some(name) = self
            .department
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
        {
            return name;
        }
        UNASSIGNED_DEPARTMENT
    }

    /// Resigned employees sync as inactive; any other (or missing)
    /// employment status counts as active.
    pub fn is_active(&self) -> bool {
        self.emp_status.as_deref() != Some(STATUS_RESIGNED)
    }

    /// Resolve a chat identifier for notifications.
    ///
    /// Prefers a `slack_user_id` custom field when the directory
    /// carries one; otherwise falls back to the deterministic
    /// `EXTERNAL_<id>` placeholder.
    pub fn chat_user_id(&self) -> String {
        self.custom_fields
            .as_ref()
            .and_then(|f| f.get("slack_user_id"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{PLACEHOLDER_CHAT_ID_PREFIX}{}", self.id))
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}
