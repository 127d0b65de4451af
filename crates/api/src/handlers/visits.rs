//! Visit creation handoff and the status polling endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use frontdesk_core::error::CoreError;
use frontdesk_core::types::{DbId, Timestamp};
use frontdesk_db::models::visit::CreateVisit;
use frontdesk_db::repositories::{EmployeeRepo, VisitRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Status payload consumed by the polling front-desk client.
#[derive(Debug, Serialize)]
pub struct VisitStatusResponse {
    pub id: DbId,
    pub status: &'static str,
    pub label: &'static str,
    pub responded: bool,
    pub updated_at: Timestamp,
}

/// POST /api/v1/visits
///
/// Visitor-submission handoff: persists a pending visit and enqueues
/// exactly one notification dispatch for it.
pub async fn create_visit(
    State(state): State<AppState>,
    Json(input): Json<CreateVisit>,
) -> AppResult<impl IntoResponse> {
    let employee = EmployeeRepo::find(&state.pool, input.employee_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Employee",
            id: input.employee_id,
        }))?;

    if !employee.is_active || !employee.visible_to_visitors {
        return Err(AppError::Core(CoreError::Validation(
            "Employee cannot receive visits".to_string(),
        )));
    }

    let visit = VisitRepo::create(&state.pool, employee.id, input.notes.as_deref()).await?;

    tracing::info!(visit_id = visit.id, employee_id = employee.id, "Visit created");

    // Fire-and-forget: the dispatcher owns its own retry policy, and a
    // notification failure must not fail visit creation.
    let dispatcher = state.dispatcher.clone();
    let visit_id = visit.id;
    tokio::spawn(async move {
        dispatcher.dispatch(visit_id).await;
    });

    Ok((StatusCode::CREATED, Json(DataResponse { data: visit })))
}

/// GET /api/v1/visits/{id}/status
///
/// Polling endpoint: current status, its label, and whether someone
/// has responded yet.
pub async fn visit_status(
    State(state): State<AppState>,
    Path(visit_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let visit = VisitRepo::find(&state.pool, visit_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Visit",
            id: visit_id,
        }))?;

    let status = visit.status();
    Ok(Json(DataResponse {
        data: VisitStatusResponse {
            id: visit.id,
            status: status.as_str(),
            label: status.label(),
            responded: status.responded(),
            updated_at: visit.updated_at,
        },
    }))
}
