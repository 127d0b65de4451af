//! Visitor-facing employee listing.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use frontdesk_core::types::DbId;
use frontdesk_db::repositories::EmployeeRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// The subset of employee data exposed to visitors. Deliberately
/// excludes email and the Slack identifier.
#[derive(Debug, Serialize)]
pub struct VisitorEmployee {
    pub id: DbId,
    pub name: String,
    pub department_id: DbId,
    pub avatar_url: Option<String>,
}

/// GET /api/v1/employees
///
/// Active employees opted in to visitor visibility, ordered by name.
pub async fn list_employees(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let employees = EmployeeRepo::list_visible(&state.pool).await?;

    let data: Vec<VisitorEmployee> = employees
        .into_iter()
        .map(|e| VisitorEmployee {
            id: e.id,
            name: e.name,
            department_id: e.department_id,
            avatar_url: e.avatar_url,
        })
        .collect();

    Ok(Json(DataResponse { data }))
}
