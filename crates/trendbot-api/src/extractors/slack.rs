//! Signed Slack request body

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::HeaderMap,
};
use trendbot_common::signature::{
    verify_slack_signature, SignatureError, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};

use crate::response::ApiError;
use crate::state::AppState;

/// Raw request body whose Slack signature has been verified
#[derive(Debug, Clone)]
pub struct SlackVerified(pub Bytes);

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(SignatureError::MissingHeader(name))
}

#[async_trait]
impl FromRequest<AppState> for SlackVerified {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::rejected(e.to_string()))?;

        verify_slack_signature(
            state.signing_secret(),
            header(&headers, TIMESTAMP_HEADER)?,
            &body,
            header(&headers, SIGNATURE_HEADER)?,
            chrono::Utc::now().timestamp(),
        )?;

        Ok(SlackVerified(body))
    }
}
