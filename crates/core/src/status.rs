//! Visit status lifecycle.
//!
//! A visit starts as [`VisitStatus::Pending`] and moves exactly once to
//! one of the three terminal statuses when someone actions the Slack
//! message. The enum is closed on purpose: adding a status forces every
//! `match` in the workspace to be revisited.

use serde::{Deserialize, Serialize};

/// Status of a visit, stored as TEXT in the `visits` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    /// Initial state: the employee has not responded yet.
    Pending,
    /// The employee is coming to the front desk right away.
    GoingNow,
    /// The employee asked the visitor to wait.
    Waiting,
    /// The employee has no record of the visitor.
    NoMatch,
}

impl VisitStatus {
    /// Database/wire representation. Doubles as the Slack `action_id`
    /// for the terminal statuses.
    pub fn as_str(self) -> &'static str {
        match self {
            VisitStatus::Pending => "pending",
            VisitStatus::GoingNow => "going_now",
            VisitStatus::Waiting => "waiting",
            VisitStatus::NoMatch => "no_match",
        }
    }

    /// Parse a stored or wire status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(VisitStatus::Pending),
            "going_now" => Some(VisitStatus::GoingNow),
            "waiting" => Some(VisitStatus::Waiting),
            "no_match" => Some(VisitStatus::NoMatch),
            _ => None,
        }
    }

    /// Whether the visit has left the initial state.
    pub fn responded(self) -> bool {
        self != VisitStatus::Pending
    }

    /// Whether this status is a legal transition target.
    ///
    /// The lifecycle is a single-step automaton: the only transition is
    /// `pending -> {going_now | waiting | no_match}`.
    pub fn is_terminal(self) -> bool {
        self.responded()
    }

    /// Human-readable label for the polling API.
    pub fn label(self) -> &'static str {
        match self {
            VisitStatus::Pending => "awaiting response",
            responded => responded.response_label(),
        }
    }

    /// Human-readable label shown in the resolved Slack message.
    ///
    /// `Pending` falls back to a generic label so an unmapped status can
    /// never render an empty resolution line.
    pub fn response_label(self) -> &'static str {
        match self {
            VisitStatus::GoingNow => "coming right away",
            VisitStatus::Waiting => "please wait",
            VisitStatus::NoMatch => "no record found",
            VisitStatus::Pending => "acknowledged",
        }
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
