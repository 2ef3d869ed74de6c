use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::api::ApiError;

/// Header carrying the shared secret on `/api` requests.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Shared-secret settings used by [`require_api_key`].
#[derive(Clone)]
pub struct ApiKeyState {
    secret: Option<Arc<str>>,
}

impl ApiKeyState {
    /// Blank secrets are treated as unset.
    #[must_use]
    pub fn new(secret: Option<&str>) -> Self {
        let secret = secret
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Arc::from);
        Self { secret }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }
}

impl std::fmt::Debug for ApiKeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyState")
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing the shared `x-api-key` secret.
///
/// Answers 500 when the server has no secret configured and 403 when the
/// client key is missing or wrong; the handler never runs in either case.
pub async fn require_api_key(
    State(api_key): State<ApiKeyState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(secret) = api_key.secret.as_deref() else {
        tracing::error!("API_SECRET_KEY is not set; rejecting /api request");
        return ApiError::Misconfigured.into_response();
    };

    let presented = decode_api_key(req.headers().get(API_KEY_HEADER));
    let matched = presented
        .as_deref()
        .is_some_and(|key| keys_match(key, secret));

    tracing::debug!(
        client_key_len = presented.as_ref().map_or(0, String::len),
        server_key_len = secret.len(),
        matched,
        "api key check"
    );

    if matched {
        next.run(req).await
    } else {
        tracing::warn!(path = %req.uri().path(), "rejected request with invalid api key");
        ApiError::Forbidden.into_response()
    }
}

/// Percent-decodes and trims the header. Undecodable or blank keys count as absent.
fn decode_api_key(value: Option<&HeaderValue>) -> Option<String> {
    let raw = value?.to_str().ok()?;
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let trimmed = decoded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn keys_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_api_key_passes_plain_value() {
        let header = HeaderValue::from_static("s3cret");
        assert_eq!(decode_api_key(Some(&header)).as_deref(), Some("s3cret"));
    }

    #[test]
    fn decode_api_key_percent_decodes_and_trims() {
        let header = HeaderValue::from_static("%20a%2Bb%3D%20");
        assert_eq!(decode_api_key(Some(&header)).as_deref(), Some("a+b="));
    }

    #[test]
    fn decode_api_key_rejects_blank_and_missing() {
        let header = HeaderValue::from_static("   ");
        assert_eq!(decode_api_key(Some(&header)), None);
        assert_eq!(decode_api_key(None), None);
    }

    #[test]
    fn decode_api_key_rejects_invalid_utf8_escape() {
        let header = HeaderValue::from_static("%FF%FE");
        assert_eq!(decode_api_key(Some(&header)), None);
    }

    #[test]
    fn keys_match_requires_exact_equality() {
        assert!(keys_match("abc", "abc"));
        assert!(!keys_match("abc", "abd"));
        assert!(!keys_match("abc", "abcd"));
        assert!(!keys_match("", "abc"));
    }

    #[test]
    fn api_key_state_treats_blank_secret_as_unset() {
        assert!(!ApiKeyState::new(Some("  ")).is_configured());
        assert!(!ApiKeyState::new(None).is_configured());
        assert!(ApiKeyState::new(Some(" k ")).is_configured());
    }

    #[test]
    fn api_key_state_debug_redacts_secret() {
        let rendered = format!("{:?}", ApiKeyState::new(Some("s3cret")));
        assert!(!rendered.contains("s3cret"));
    }
}
