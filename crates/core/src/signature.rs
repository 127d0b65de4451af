//! Webhook request signature verification.
//!
//! Implements the Slack v0 signing scheme: the signature header carries
//! `"v0=" + hex(HMAC-SHA256(secret, "v0:" + timestamp + ":" + body))`,
//! and the timestamp header bounds the replay window. Comparison is
//! constant-time via [`Mac::verify_slice`].

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::types::Timestamp;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed age (in either direction) of a signed request.
/// Requests outside this window are treated as replays.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Version prefix used by the signing scheme.
const SIGNATURE_VERSION: &str = "v0";

/// Reasons a signed request can be rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The timestamp header is absent.
    #[error("Request timestamp header is missing")]
    TimestampMissing,

    /// The timestamp header is present but not an integer.
    #[error("Request timestamp header is not a valid integer")]
    TimestampInvalid,

    /// The timestamp is outside the replay window.
    #[error("Request timestamp is too old (difference: {diff_secs}s, max: {TIMESTAMP_TOLERANCE_SECS}s)")]
    TimestampExpired { diff_secs: i64 },

    /// The signature header is absent, malformed, or does not match.
    #[error("Signature verification failed")]
    SignatureMismatch,
}

/// Verifies the authenticity and freshness of inbound webhook requests.
///
/// Built once from configuration and shared via application state. When
/// no signing secret is configured and `allow_unverified` is set (local
/// development only -- the production boot guard refuses this
/// combination), every request passes with a loud warning.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: Option<String>,
    allow_unverified: bool,
}

impl SignatureVerifier {
    pub fn new(secret: Option<String>, allow_unverified: bool) -> Self {
        Self {
            secret,
            allow_unverified,
        }
    }

    /// Whether verification is effectively disabled (no secret configured).
    pub fn is_disabled(&self) -> bool {
        self.secret.is_none()
    }

    /// Verify a request against the signing scheme.
    ///
    /// `now` is passed in rather than read from the clock so the replay
    /// window is testable at its exact boundaries.
    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
        now: Timestamp,
    ) -> Result<(), SignatureError> {
        let Some(secret) = self.secret.as_deref() else {
            if self.allow_unverified {
                tracing::warn!(
                    "Webhook signature verification is DISABLED (no signing secret configured); \
                     accepting request unverified"
                );
                return Ok(());
            }
            // Unreachable when the boot guard is in place; fail closed.
            return Err(SignatureError::SignatureMismatch);
        };

        let timestamp = timestamp.ok_or(SignatureError::TimestampMissing)?;
        let request_time: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::TimestampInvalid)?;

        let diff_secs = (now.timestamp() - request_time).abs();
        if diff_secs > TIMESTAMP_TOLERANCE_SECS {
            return Err(SignatureError::TimestampExpired { diff_secs });
        }

        let claimed = signature.unwrap_or_default();
        let claimed_hex = claimed
            .strip_prefix("v0=")
            .ok_or(SignatureError::SignatureMismatch)?;
        let claimed_bytes =
            hex::decode(claimed_hex).ok_or(SignatureError::SignatureMismatch)?;

        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
        mac.update(SIGNATURE_VERSION.as_bytes());
        mac.update(b":");
        mac.update(timestamp.as_bytes());
        mac.update(b":");
        mac.update(body);

        // verify_slice is constant-time, which is the point of this whole
        // dance: a plain == comparison would leak prefix length.
        mac.verify_slice(&claimed_bytes)
            .map_err(|_| SignatureError::SignatureMismatch)
    }
}

/// Compute the expected signature header value for a request.
///
/// Exposed so tests (and any future outbound signer) can construct
/// valid signatures without duplicating the scheme.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    format!("{SIGNATURE_VERSION}={}", hex::encode(mac.finalize().into_bytes()))
}

// ---------------------------------------------------------------------------
// hex helpers (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string, returning `None` on any malformed input.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    const SECRET: &str = "s3cr3t";
    const TS: &str = "1700000000";

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new(Some(SECRET.to_string()), false)
    }

    fn at(epoch: i64) -> Timestamp {
        Utc.timestamp_opt(epoch, 0).unwrap()
    }

    #[test]
    fn accepts_valid_signature() {
        let sig = sign(SECRET, TS, b"{}");
        let result = verifier().verify(Some(TS), Some(&sig), b"{}", at(1_700_000_000));
        assert_matches!(result, Ok(()));
    }

    #[test]
    fn rejects_single_character_mutation() {
        let sig = sign(SECRET, TS, b"{}");
        // Flip the last hex character.
        let mut mutated = sig.clone();
        let last = mutated.pop().unwrap();
        mutated.push(if last == '0' { '1' } else { '0' });

        let result = verifier().verify(Some(TS), Some(&mutated), b"{}", at(1_700_000_000));
        assert_matches!(result, Err(SignatureError::SignatureMismatch));
    }

    #[test]
    fn rejects_missing_timestamp() {
        let sig = sign(SECRET, TS, b"{}");
        let result = verifier().verify(None, Some(&sig), b"{}", at(1_700_000_000));
        assert_matches!(result, Err(SignatureError::TimestampMissing));
    }

    #[test]
    fn rejects_non_numeric_timestamp() {
        let result = verifier().verify(Some("yesterday"), None, b"{}", at(1_700_000_000));
        assert_matches!(result, Err(SignatureError::TimestampInvalid));
    }

    #[test]
    fn rejects_timestamp_301_seconds_old() {
        let sig = sign(SECRET, TS, b"{}");
        let result = verifier().verify(Some(TS), Some(&sig), b"{}", at(1_700_000_301));
        assert_matches!(
            result,
            Err(SignatureError::TimestampExpired { diff_secs: 301 })
        );
    }

    #[test]
    fn accepts_timestamp_299_seconds_old() {
        let sig = sign(SECRET, TS, b"{}");
        let result = verifier().verify(Some(TS), Some(&sig), b"{}", at(1_700_000_299));
        assert_matches!(result, Ok(()));
    }

    #[test]
    fn accepts_timestamp_slightly_in_the_future() {
        // Clock skew between us and the platform is tolerated up to the
        // same window in the other direction.
        let sig = sign(SECRET, TS, b"{}");
        let result = verifier().verify(Some(TS), Some(&sig), b"{}", at(1_699_999_800));
        assert_matches!(result, Ok(()));
    }

    #[test]
    fn rejects_missing_signature_header() {
        let result = verifier().verify(Some(TS), None, b"{}", at(1_700_000_000));
        assert_matches!(result, Err(SignatureError::SignatureMismatch));
    }

    #[test]
    fn rejects_signature_without_version_prefix() {
        let sig = sign(SECRET, TS, b"{}");
        let bare = sig.strip_prefix("v0=").unwrap();
        let result = verifier().verify(Some(TS), Some(bare), b"{}", at(1_700_000_000));
        assert_matches!(result, Err(SignatureError::SignatureMismatch));
    }

    #[test]
    fn rejects_signature_for_different_body() {
        let sig = sign(SECRET, TS, b"{}");
        let result =
            verifier().verify(Some(TS), Some(&sig), b"{\"a\":1}", at(1_700_000_000));
        assert_matches!(result, Err(SignatureError::SignatureMismatch));
    }

    #[test]
    fn disabled_mode_passes_without_secret() {
        let verifier = SignatureVerifier::new(None, true);
        let result = verifier.verify(None, None, b"{}", at(1_700_000_000));
        assert_matches!(result, Ok(()));
    }

    #[test]
    fn missing_secret_fails_closed_when_unverified_not_allowed() {
        let verifier = SignatureVerifier::new(None, false);
        let result = verifier.verify(Some(TS), None, b"{}", at(1_700_000_000));
        assert_matches!(result, Err(SignatureError::SignatureMismatch));
    }
}
