//! Referral attribution, extracted per request.
//!
//! The frontend keeps a referral code (from a `?ref=` link) and forwards it with
//! the submission, either as the same query parameter or an `X-Referral-Code`
//! header. The handler receives it as an explicit `ReferralContext` value and
//! passes it on to the store. The header wins when both are present.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

pub const REFERRAL_HEADER: &str = "x-referral-code";
const MAX_CODE_LEN: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferralContext {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReferralQuery {
    #[serde(rename = "ref")]
    code: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for ReferralContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(REFERRAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(normalize_code);

        let code = match from_header {
            Some(code) => Some(code),
            None => Query::<ReferralQuery>::from_request_parts(parts, state)
                .await
                .ok()
                .and_then(|Query(q)| q.code)
                .as_deref()
                .and_then(normalize_code),
        };

        Ok(ReferralContext { code })
    }
}

/// Trims and upper-cases a code. Anything other than ASCII alphanumerics,
/// `-` and `_`, or longer than 32 characters, is discarded.
pub fn normalize_code(raw: &str) -> Option<String> {
    let code = raw.trim();
    let valid = !code.is_empty()
        && code.len() <= MAX_CODE_LEN
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| code.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(uri: &str, header: Option<&str>) -> ReferralContext {
        let mut builder = Request::builder().uri(uri);
        if let Some(h) = header {
            builder = builder.header(REFERRAL_HEADER, h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        ReferralContext::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" partner-7 ").as_deref(), Some("PARTNER-7"));
        assert_eq!(normalize_code("spring_24").as_deref(), Some("SPRING_24"));
        assert_eq!(normalize_code(""), None);
        assert_eq!(normalize_code("bad code"), None);
        assert_eq!(normalize_code("<script>"), None);
        assert_eq!(normalize_code(&"A".repeat(33)), None);
    }

    #[tokio::test]
    async fn test_code_from_query() {
        let ctx = extract("/api/v1/dream/assessments?ref=friend1", None).await;
        assert_eq!(ctx.code.as_deref(), Some("FRIEND1"));
    }

    #[tokio::test]
    async fn test_header_wins_over_query() {
        let ctx = extract("/api/v1/dream/assessments?ref=friend1", Some("agency-9")).await;
        assert_eq!(ctx.code.as_deref(), Some("AGENCY-9"));
    }

    #[tokio::test]
    async fn test_invalid_header_falls_back_to_query() {
        let ctx = extract("/api/v1/dream/assessments?ref=friend1", Some("no spaces")).await;
        assert_eq!(ctx.code.as_deref(), Some("FRIEND1"));
    }

    #[tokio::test]
    async fn test_no_code() {
        let ctx = extract("/api/v1/dream/assessments", None).await;
        assert_eq!(ctx, ReferralContext::default());
    }
}
