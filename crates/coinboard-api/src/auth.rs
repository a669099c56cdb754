//! Bearer secret check for the `/cron/*` routes

use crate::error::ApiError;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use coinboard_core::CronConfig;
use subtle::ConstantTimeEq;
use tracing::debug;

/// Exact match of `Authorization: Bearer <secret>`, compared in constant
/// time. With no configured secret every request is rejected.
pub fn is_authorized(headers: &HeaderMap, cron: &CronConfig) -> bool {
    let Some(secret) = cron.secret.as_deref() else {
        return false;
    };

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| bool::from(token.as_bytes().ct_eq(secret.as_bytes())))
}

pub async fn require_cron_secret(
    State(cron): State<CronConfig>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_authorized(req.headers(), &cron) {
        let route = req.uri().path().to_string();
        debug!(route = %route, "Cron request rejected");
        coinboard_metrics::counters::cron_rejected(&route);
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_accepts_exact_bearer() {
        let cron = CronConfig::with_secret("s3cret");
        assert!(is_authorized(&headers("Bearer s3cret"), &cron));
    }

    #[test]
    fn test_rejects_mismatches() {
        let cron = CronConfig::with_secret("s3cret");
        assert!(!is_authorized(&HeaderMap::new(), &cron));
        assert!(!is_authorized(&headers("Bearer wrong"), &cron));
        assert!(!is_authorized(&headers("Basic s3cret"), &cron));
        assert!(!is_authorized(&headers("bearer s3cret"), &cron));
        assert!(!is_authorized(&headers("Bearer s3cret "), &cron));
        assert!(!is_authorized(&headers("s3cret"), &cron));
    }

    #[test]
    fn test_unconfigured_secret_rejects_everything() {
        let cron = CronConfig::default();
        assert!(!is_authorized(&headers("Bearer "), &cron));
        assert!(!is_authorized(&headers("Bearer anything"), &cron));
    }
}
