//! Block Kit message construction for visit notifications.
//!
//! Pure functions of the visit data: the initial message carries the
//! three response buttons, the resolved message replaces them with a
//! resolution line. Both modes expose a plain-text fallback for
//! clients that cannot render blocks.

use chrono::{DateTime, Utc};
use frontdesk_core::status::VisitStatus;
use frontdesk_core::types::DbId;
use serde_json::{json, Value};

/// Everything the builder needs to render a visit notification.
///
/// Borrowed view assembled by the caller from the joined visit row;
/// `responder`/`responded_at` are only present in resolved mode.
#[derive(Debug, Clone)]
pub struct MessageBuilder<'a> {
    pub visit_id: DbId,
    pub status: VisitStatus,
    pub employee_name: &'a str,
    pub employee_slack_user_id: &'a str,
    pub department_name: &'a str,
    pub notes: Option<&'a str>,
    pub responder: Option<&'a str>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl MessageBuilder<'_> {
    /// Build the Block Kit body for the current mode.
    pub fn blocks(&self) -> Vec<Value> {
        if self.status.responded() {
            self.resolved_blocks()
        } else {
            self.initial_blocks()
        }
    }

    /// Plain-text fallback for the current mode.
    pub fn plain_text(&self) -> String {
        if self.status.responded() {
            format!(
                "{} responded with \"{}\"",
                self.responder.unwrap_or("unknown user"),
                self.status.response_label()
            )
        } else {
            "A visitor has arrived".to_string()
        }
    }

    fn initial_blocks(&self) -> Vec<Value> {
        let mut blocks = vec![
            header_block(),
            section(format!(
                "<@{}> A visitor is asking for you. Please come to the 1F front desk.",
                self.employee_slack_user_id
            )),
            self.info_block(),
        ];
        if let Some(notes) = self.notes.filter(|n| !n.trim().is_empty()) {
            blocks.push(section(format!("*Notes:*\n{notes}")));
        }
        blocks.push(section("Please choose a response:".to_string()));
        blocks.push(self.action_block());
        blocks
    }

    fn resolved_blocks(&self) -> Vec<Value> {
        let time = self
            .responded_at
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default();
        vec![
            header_block(),
            self.info_block(),
            section(format!(
                "{} responded {} with \"{}\"",
                self.responder.unwrap_or("unknown user"),
                time,
                self.status.response_label()
            )),
        ]
    }

    fn info_block(&self) -> Value {
        json!({
            "type": "section",
            "fields": [
                { "type": "mrkdwn", "text": format!("*Employee:*\n{}", self.employee_name) },
                { "type": "mrkdwn", "text": format!("*Department:*\n{}", self.department_name) },
            ]
        })
    }

    fn action_block(&self) -> Value {
        let value = self.visit_id.to_string();
        json!({
            "type": "actions",
            "elements": [
                button("On my way", VisitStatus::GoingNow, &value, Some("primary")),
                button("Please wait", VisitStatus::Waiting, &value, None),
                button("Not expecting anyone", VisitStatus::NoMatch, &value, Some("danger")),
            ]
        })
    }
}

fn header_block() -> Value {
    section("*:wave: A visitor has arrived*".to_string())
}

fn section(text: String) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text }
    })
}

fn button(label: &str, status: VisitStatus, value: &str, style: Option<&str>) -> Value {
    let mut b = json!({
        "type": "button",
        "text": { "type": "plain_text", "text": label },
        "action_id": status.as_str(),
        "value": value,
    });
    if let Some(style) = style {
        b["style"] = json!(style);
    }
    b
}
