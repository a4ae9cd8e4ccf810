//! # Request Guards
//!
//! The two optional gates in front of the student routes:
//!
//! - [`ApiKey`]: shared key checked on every request except `/health`.
//!   Accepted as `Authorization: Bearer <key>` or as the bare key.
//! - [`Throttle`]: one process-wide quota of requests per second.
//!
//! Both are built from [`ApiSettings`](super::ApiSettings); each is skipped
//! entirely when its setting is off. The environment variable names live
//! here, but only the config layer reads them.

use super::error::ApiError;
use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;
use subtle::{Choice, ConstantTimeEq};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ROLLBOOK_API_KEY";

/// Environment variable holding the request quota.
pub const RATE_LIMIT_ENV: &str = "ROLLBOOK_RATE_LIMIT";

/// Requests per second when nothing is configured.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

const OPEN_PATH: &str = "/health";

// =============================================================================
// API KEY
// =============================================================================

/// Why a request failed the key check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRejection {
    Missing,
    Mismatch,
}

impl KeyRejection {
    fn reason(self) -> &'static str {
        match self {
            Self::Missing => "missing_authorization_header",
            Self::Mismatch => "invalid_api_key",
        }
    }
}

/// The shared API key. Never empty.
#[derive(Clone)]
pub struct ApiKey(Arc<[u8]>);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(..)")
    }
}

impl ApiKey {
    /// `None` for an empty key, which means authentication is off.
    pub fn new(key: &str) -> Option<Self> {
        (!key.is_empty()).then(|| Self(Arc::from(key.as_bytes())))
    }

    /// Check an `Authorization` header value.
    pub fn check(&self, authorization: Option<&str>) -> Result<(), KeyRejection> {
        let value = authorization.ok_or(KeyRejection::Missing)?;
        let candidate = value.strip_prefix("Bearer ").unwrap_or(value);
        if self.matches(candidate.as_bytes()) {
            Ok(())
        } else {
            Err(KeyRejection::Mismatch)
        }
    }

    // Constant time in the key length. A candidate of the wrong length is
    // swapped for the key itself so the byte comparison still runs.
    fn matches(&self, candidate: &[u8]) -> bool {
        let expected: &[u8] = &self.0;
        let same_len = candidate.len() == expected.len();
        let probe = if same_len { candidate } else { expected };
        (probe.ct_eq(expected) & Choice::from(u8::from(same_len))).into()
    }
}

/// Middleware rejecting requests without the shared key.
pub async fn require_api_key(
    State(key): State<ApiKey>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if request.uri().path() == OPEN_PATH {
        return Ok(next.run(request).await);
    }

    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match key.check(authorization) {
        Ok(()) => Ok(next.run(request).await),
        Err(rejection) => {
            tracing::warn!(
                event = "auth_failure",
                reason = rejection.reason(),
                path = %request.uri().path(),
                "Request rejected by API key check"
            );
            Err(ApiError::Unauthorized)
        }
    }
}

// =============================================================================
// THROTTLE
// =============================================================================

/// Process-wide request quota.
#[derive(Clone)]
pub struct Throttle(Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>);

impl Throttle {
    /// `None` for a quota of zero, which means limiting is off.
    pub fn per_second(requests: u32) -> Option<Self> {
        NonZeroU32::new(requests).map(|rps| Self(Arc::new(RateLimiter::direct(Quota::per_second(rps)))))
    }

    fn admit(&self) -> bool {
        self.0.check().is_ok()
    }
}

/// Middleware answering 429 once the quota for the current second is spent.
pub async fn throttle(
    State(throttle): State<Throttle>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if !throttle.admit() {
        tracing::warn!(event = "rate_limited", path = %request.uri().path(), "Quota exhausted");
        return Err(ApiError::RateLimited);
    }
    Ok(next.run(request).await)
}

// =============================================================================
// TESTS
// =============================================================================
