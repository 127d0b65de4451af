//! Slack Web API client.
//!
//! Thin wrapper over `chat.postMessage` and `chat.update` using
//! [`reqwest`]. Slack answers HTTP 200 with an `{ "ok": false, "error":
//! "..." }` envelope on API-level failures, so both transport errors
//! and envelope errors are mapped here.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Default Slack Web API endpoint.
const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// Overall request timeout for a single API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from the Slack client.
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    /// A required credential is missing. Detected at construction and
    /// never retried.
    #[error("Slack is not configured: {0} is missing")]
    NotConfigured(&'static str),

    /// The bot token was rejected.
    #[error("Slack authentication failed; check the bot token")]
    AuthenticationFailed,

    /// The configured channel does not exist or the bot is not in it.
    #[error("Slack channel not found: {0}")]
    ChannelNotFound(String),

    /// Any other API-level error reported in the response envelope.
    #[error("Slack API error: {0}")]
    Platform(String),

    /// The HTTP request itself failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Response envelope shared by `chat.postMessage` and `chat.update`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for posting and editing messages in one Slack channel.
#[derive(Debug)]
pub struct SlackClient {
    client: reqwest::Client,
    token: String,
    channel_id: String,
    base_url: String,
}

impl SlackClient {
    /// Build a client from optional configuration.
    ///
    /// Fails with [`SlackError::NotConfigured`] when either credential
    /// is absent, so callers can distinguish "notifications disabled"
    /// from delivery failures.
    pub fn from_config(
        bot_token: Option<&str>,
        channel_id: Option<&str>,
    ) -> Result<Self, SlackError> {
        let token = bot_token
            .filter(|t| !t.is_empty())
            .ok_or(SlackError::NotConfigured("SLACK_BOT_TOKEN"))?;
        let channel = channel_id
            .filter(|c| !c.is_empty())
            .ok_or(SlackError::NotConfigured("SLACK_CHANNEL_ID"))?;
        Ok(Self::new(token.to_string(), channel.to_string()))
    }

    pub fn new(token: String, channel_id: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            token,
            channel_id,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Post a new message, returning the message handle (`ts`) needed
    /// to edit it later.
    pub async fn post_message(&self, text: &str, blocks: &[Value]) -> Result<String, SlackError> {
        let body = serde_json::json!({
            "channel": self.channel_id,
            "text": text,
            "blocks": blocks,
        });
        let envelope = self.call("chat.postMessage", &body).await?;
        envelope
            .ts
            .ok_or_else(|| SlackError::Platform("chat.postMessage returned no ts".to_string()))
    }

    /// Edit a previously posted message in place.
    pub async fn update_message(
        &self,
        message_ts: &str,
        text: &str,
        blocks: &[Value],
    ) -> Result<(), SlackError> {
        let body = serde_json::json!({
            "channel": self.channel_id,
            "ts": message_ts,
            "text": text,
            "blocks": blocks,
        });
        self.call("chat.update", &body).await?;
        Ok(())
    }

    /// Execute one API call and decode the envelope.
    async fn call(&self, method: &str, body: &Value) -> Result<ApiEnvelope, SlackError> {
        let response = self
            .client
            .post(format!("{}/{method}", self.base_url))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        let envelope: ApiEnvelope = response.json().await?;
        if envelope.ok {
            return Ok(envelope);
        }

        let code = envelope.error.unwrap_or_else(|| "unknown_error".to_string());
        tracing::warn!(method, error = %code, "Slack API call failed");
        Err(match code.as_str() {
            "not_authed" | "invalid_auth" | "account_inactive" | "token_revoked" => {
                SlackError::AuthenticationFailed
            }
            "channel_not_found" | "is_archived" => {
                SlackError::ChannelNotFound(self.channel_id.clone())
            }
            _ => SlackError::Platform(code),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn from_config_requires_both_credentials() {
        assert_matches!(
            SlackClient::from_config(None, Some("C123")),
            Err(SlackError::NotConfigured("SLACK_BOT_TOKEN"))
        );
        assert_matches!(
            SlackClient::from_config(Some("xoxb-1"), None),
            Err(SlackError::NotConfigured("SLACK_CHANNEL_ID"))
        );
        assert_matches!(
            SlackClient::from_config(Some(""), Some("C123")),
            Err(SlackError::NotConfigured("SLACK_BOT_TOKEN"))
        );
        assert!(SlackClient::from_config(Some("xoxb-1"), Some("C123")).is_ok());
    }

    #[test]
    fn envelope_decodes_post_message_response() {
        let envelope: ApiEnvelope =
            serde_json::from_str(r#"{"ok":true,"ts":"1700000000.000100"}"#).unwrap();
        assert!(envelope.ok);
        assert_eq!(envelope.ts.as_deref(), Some("1700000000.000100"));
    }

    #[test]
    fn envelope_decodes_error_response() {
        let envelope: ApiEnvelope =
            serde_json::from_str(r#"{"ok":false,"error":"channel_not_found"}"#).unwrap();
        assert!(!envelope.ok);
        assert_eq!(envelope.error.as_deref(), Some("channel_not_found"));
    }
}
