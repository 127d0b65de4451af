//! Inbound Slack interactivity endpoint.
//!
//! Verifies the request signature against the raw body, decodes the
//! form-encoded `payload` JSON, and routes button clicks to the visit
//! status transition. Responses are always JSON with a short `text`
//! field, the shape Slack renders back to the clicking user.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use frontdesk_core::status::VisitStatus;
use frontdesk_core::types::DbId;
use frontdesk_db::repositories::{TransitionOutcome, VisitRepo};
use frontdesk_slack::payload::BlockAction;
use frontdesk_slack::{ActionPayload, MessageBuilder};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::state::AppState;

/// Header carrying the request timestamp.
const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Header carrying the request signature.
const SIGNATURE_HEADER: &str = "x-slack-signature";

/// The form body wrapping the JSON payload document.
#[derive(Deserialize)]
struct ActionForm {
    payload: String,
}

/// POST /api/v1/slack/actions
///
/// Interactivity webhook. Unknown payload shapes are accepted and
/// ignored so the platform never sees spurious failures; duplicate
/// deliveries of the same click resolve to "already responded".
pub async fn receive_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let timestamp = header_str(&headers, TIMESTAMP_HEADER);
    let signature = header_str(&headers, SIGNATURE_HEADER);

    if let Err(e) = state
        .verifier
        .verify(timestamp, signature, &body, Utc::now())
    {
        tracing::warn!(error = %e, "Rejected Slack webhook request");
        return text_response(StatusCode::UNAUTHORIZED, "Signature verification failed");
    }

    let Some(payload) = decode_payload(&body) else {
        return text_response(StatusCode::BAD_REQUEST, "Invalid payload");
    };

    match ActionPayload::parse(&payload) {
        Err(e) => {
            tracing::warn!(error = %e, "Malformed Slack action payload");
            text_response(StatusCode::BAD_REQUEST, "Invalid payload")
        }
        Ok(ActionPayload::UrlVerification { challenge }) => {
            // Endpoint handshake: echo the challenge verbatim, nothing else.
            Json(json!({ "challenge": challenge })).into_response()
        }
        Ok(ActionPayload::Ignored) => {
            tracing::debug!("Ignoring Slack payload of unrecognized type");
            text_response(StatusCode::OK, "Ignored")
        }
        Ok(ActionPayload::BlockAction(action)) => handle_block_action(&state, action).await,
    }
}

/// Route one button click to the state machine.
async fn handle_block_action(state: &AppState, action: BlockAction) -> Response {
    let Some(new_status) = action.target_status() else {
        tracing::warn!(action_id = %action.action_id, "Unknown Slack action id");
        return text_response(StatusCode::BAD_REQUEST, "Unknown action");
    };

    let Ok(visit_id) = action.value.parse::<DbId>() else {
        tracing::warn!(value = %action.value, "Slack action value is not a visit id");
        return text_response(StatusCode::BAD_REQUEST, "Invalid payload");
    };

    match transition_visit(state, visit_id, new_status, &action.responder).await {
        Ok(Some(TransitionOutcome::Applied)) => {
            tracing::info!(
                visit_id,
                status = %new_status,
                responder = %action.responder,
                "Visit status updated"
            );
            text_response(
                StatusCode::OK,
                &format!("\u{2713} {}", new_status.response_label()),
            )
        }
        Ok(Some(TransitionOutcome::AlreadyResponded)) => {
            // Duplicate delivery or a lost race: harmless by design.
            tracing::info!(visit_id, "Visit already responded");
            text_response(StatusCode::OK, "This visit has already been responded to")
        }
        Ok(None) => {
            tracing::warn!(visit_id, "Slack action for unknown visit");
            text_response(StatusCode::NOT_FOUND, "Visit not found")
        }
        Err(e) => {
            tracing::error!(visit_id, error = %e, "Slack action processing failed");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "An error occurred")
        }
    }
}

/// Guarded transition plus the best-effort message edit.
///
/// Returns `None` when the visit does not exist. The message edit runs
/// only after the status write committed, and its failure is swallowed:
/// the database is the source of truth, the Slack message is display.
async fn transition_visit(
    state: &AppState,
    visit_id: DbId,
    new_status: VisitStatus,
    responder: &str,
) -> Result<Option<TransitionOutcome>, sqlx::Error> {
    if VisitRepo::find(&state.pool, visit_id).await?.is_none() {
        return Ok(None);
    }

    let outcome = VisitRepo::transition_from_pending(&state.pool, visit_id, new_status).await?;
    if outcome == TransitionOutcome::Applied {
        update_resolved_message(state, visit_id, responder).await;
    }
    Ok(Some(outcome))
}

/// Edit the original notification in place to show the resolution.
/// Best-effort: every failure path logs and returns.
async fn update_resolved_message(state: &AppState, visit_id: DbId, responder: &str) {
    let Some(slack) = &state.slack else {
        return;
    };

    let visit = match VisitRepo::find_for_notification(&state.pool, visit_id).await {
        Ok(Some(visit)) => visit,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(visit_id, error = %e, "Could not reload visit for message update");
            return;
        }
    };

    let Some(message_ts) = visit.slack_message_ts.clone() else {
        tracing::warn!(visit_id, "Visit has no Slack message to update");
        return;
    };

    let builder = MessageBuilder {
        visit_id: visit.id,
        status: visit.status(),
        employee_name: &visit.employee_name,
        employee_slack_user_id: &visit.employee_slack_user_id,
        department_name: &visit.department_name,
        notes: visit.notes.as_deref(),
        responder: Some(responder),
        responded_at: Some(visit.updated_at),
    };

    if let Err(e) = slack
        .update_message(&message_ts, &builder.plain_text(), &builder.blocks())
        .await
    {
        // The transition already committed; do not undo or retry it
        // because the display update failed.
        tracing::warn!(visit_id, error = %e, "Slack message update failed (swallowed)");
    }
}

/// Decode the webhook body: a form-encoded `payload` field carrying
/// JSON, or (for the handshake) a bare JSON document.
fn decode_payload(body: &[u8]) -> Option<Value> {
    if let Ok(form) = serde_urlencoded::from_bytes::<ActionForm>(body) {
        return serde_json::from_str(&form.payload).ok();
    }
    serde_json::from_slice(body).ok()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn text_response(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "text": text }))).into_response()
}
