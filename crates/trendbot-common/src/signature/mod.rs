//! Slack request signing

mod slack_signature;

pub use slack_signature::{
    sign_slack_request, verify_slack_signature, SignatureError, MAX_TIMESTAMP_SKEW_SECS,
    SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
