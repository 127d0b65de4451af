//! Typed view of inbound Slack interactivity payloads.
//!
//! Slack delivers a JSON document inside a form-encoded `payload`
//! field. Only two shapes matter: the one-time `url_verification`
//! handshake and `block_actions` button clicks. Everything else is
//! accepted and ignored.

use frontdesk_core::status::VisitStatus;
use serde_json::Value;

/// Placeholder responder name when the payload carries no usable user info.
pub const UNKNOWN_RESPONDER: &str = "unknown user";

/// Payload type string for the endpoint-verification handshake.
const TYPE_URL_VERIFICATION: &str = "url_verification";

/// Payload type string for interactive button clicks.
const TYPE_BLOCK_ACTIONS: &str = "block_actions";

/// A recognized inbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionPayload {
    /// Endpoint handshake: echo the challenge back verbatim.
    UrlVerification { challenge: String },
    /// A button click on a visit notification.
    BlockAction(BlockAction),
    /// Any other payload type: accepted, no-op.
    Ignored,
}

/// The parts of a `block_actions` payload the router needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAction {
    /// Stable action identifier of the clicked button.
    pub action_id: String,
    /// Opaque value carried by the button (the visit id).
    pub value: String,
    /// Human-readable name of whoever clicked.
    pub responder: String,
}

/// A structurally invalid payload of a recognized type.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Invalid payload: {0}")]
    Invalid(&'static str),
}

impl ActionPayload {
    /// Classify a decoded payload document.
    ///
    /// `block_actions` without a first action element (or without its
    /// identifier/value) is malformed and rejected; unknown payload
    /// types are not.
    pub fn parse(payload: &Value) -> Result<Self, PayloadError> {
        match payload.get("type").and_then(Value::as_str) {
            Some(TYPE_URL_VERIFICATION) => {
                let challenge = payload
                    .get("challenge")
                    .and_then(Value::as_str)
                    .ok_or(PayloadError::Invalid("url_verification without challenge"))?;
                Ok(ActionPayload::UrlVerification {
                    challenge: challenge.to_string(),
                })
            }
            Some(TYPE_BLOCK_ACTIONS) => {
                let action = payload
                    .get("actions")
                    .and_then(Value::as_array)
                    .and_then(|actions| actions.first())
                    .ok_or(PayloadError::Invalid("block_actions without actions"))?;
                let action_id = action
                    .get("action_id")
                    .and_then(Value::as_str)
                    .ok_or(PayloadError::Invalid("action without action_id"))?;
                let value = action
                    .get("value")
                    .and_then(Value::as_str)
                    .ok_or(PayloadError::Invalid("action without value"))?;
                Ok(ActionPayload::BlockAction(BlockAction {
                    action_id: action_id.to_string(),
                    value: value.to_string(),
                    responder: extract_responder(payload),
                }))
            }
            _ => Ok(ActionPayload::Ignored),
        }
    }
}

impl BlockAction {
    /// Map the action identifier to its target status.
    ///
    /// The identifiers are exactly the terminal status names; anything
    /// else is an unknown action.
    pub fn target_status(&self) -> Option<VisitStatus> {
        VisitStatus::parse(&self.action_id).filter(|s| s.is_terminal())
    }
}

/// Best-effort responder name: display name, then platform user id,
/// then a fixed placeholder.
fn extract_responder(payload: &Value) -> String {
    let user = payload.get("user");
    let pick = |key: &str| {
        user.and_then(|u| u.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };
    pick("name")
        .or_else(|| pick("id"))
        .unwrap_or(UNKNOWN_RESPONDER)
        .to_string()
}
