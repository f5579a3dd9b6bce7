//! Slack request signature verification
//!
//! Slack signs every callback with
//! `v0=` + hex(HMAC-SHA256(signing_secret, "v0:{timestamp}:{raw body}")).

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-slack-signature";
pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";

/// Requests signed further than this from the current time are rejected
pub const MAX_TIMESTAMP_SKEW_SECS: u64 = 60 * 5;

const VERSION: &str = "v0";

/// Signature verification failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("missing {0} header")]
    MissingHeader(&'static str),

    #[error("malformed request timestamp")]
    MalformedTimestamp,

    #[error("request timestamp outside the accepted window")]
    Stale,

    #[error("malformed signature")]
    MalformedSignature,

    #[error("signature mismatch")]
    Mismatch,
}

impl From<SignatureError> for AppError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::Stale => AppError::StaleRequest,
            _ => AppError::InvalidSignature,
        }
    }
}

fn mac_for(secret: &str, timestamp: &str, body: &[u8]) -> HmacSha256 {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC accepts keys of any length"),
    };
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    mac
}

/// Verify a Slack callback.
///
/// `now_secs` is the current Unix time; passing it in keeps the check testable.
pub fn verify_slack_signature(
    secret: &str,
    timestamp: &str,
    body: &[u8],
    signature: &str,
    now_secs: i64,
) -> Result<(), SignatureError> {
    let ts: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| SignatureError::MalformedTimestamp)?;
    if now_secs.abs_diff(ts) > MAX_TIMESTAMP_SKEW_SECS {
        return Err(SignatureError::Stale);
    }

    let expected = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
        .ok_or(SignatureError::MalformedSignature)?;

    mac_for(secret, timestamp.trim(), body)
        .verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Produce the `x-slack-signature` value for a request
pub fn sign_slack_request(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let digest = mac_for(secret, timestamp, body).finalize().into_bytes();
    format!("{VERSION}={}", hex::encode(digest))
}
