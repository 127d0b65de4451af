//! Slack integration: Block Kit message construction, the Web API
//! client used to post and edit visit notifications, and the typed
//! view of inbound interactivity payloads.

pub mod client;
pub mod message;
pub mod payload;

pub use client::{SlackClient, SlackError};
pub use message::MessageBuilder;
pub use payload::{ActionPayload, PayloadError};
