//! # Rollbook HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /api/students` - All students in insertion order
//! - `GET /api/students/sorted` - Students ranked by percentage
//! - `GET /api/students/count` - Number of students
//! - `GET /api/students/{roll}` - One student
//! - `POST /api/students` - Create a student
//! - `PUT /api/students/{roll}` - Update a student
//! - `DELETE /api/students/{roll}` - Delete a student
//! - `POST /api/students/dummy` - Load the sample batch
//! - `GET /health` - Health check
//!
//! ## Security Configuration
//!
//! Read by [`RollbookConfig`](crate::config::RollbookConfig) from the
//! `[api]` section, then overridden by the environment:
//!
//! - `ROLLBOOK_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `ROLLBOOK_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `ROLLBOOK_API_KEY`: If set, requires Bearer token authentication

mod error;
mod guard;
mod handlers;
mod types;

pub use error::ApiError;
pub use guard::{API_KEY_ENV, ApiKey, DEFAULT_RATE_LIMIT, KeyRejection, RATE_LIMIT_ENV, Throttle};
pub use types::{
    CountResponse, CreateStudentRequest, ErrorResponse, HealthResponse, MessageResponse,
    SeedResponse, StudentJson, UpdateStudentRequest,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use rollbook_core::{RecordError, Registry};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Environment variable holding the CORS origin list.
pub const CORS_ORIGINS_ENV: &str = "ROLLBOOK_CORS_ORIGINS";

/// Default request body limit (64 KiB).
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the record registry.
#[derive(Clone)]
pub struct AppState {
    /// The registry owning all records.
    pub registry: Arc<RwLock<Registry>>,
}

impl AppState {
    /// Create new app state with a registry.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
        }
    }
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Security and limit settings for the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// `None` means localhost only; `"*"` means any origin.
    pub cors_origins: Option<String>,
    /// Requests per second; 0 disables limiting.
    pub rate_limit: u32,
    /// Shared API key; `None` disables authentication.
    pub api_key: Option<String>,
    /// Maximum request body size in bytes.
    pub body_limit_bytes: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            cors_origins: None,
            rate_limit: DEFAULT_RATE_LIMIT,
            api_key: None,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build the CORS layer.
///
/// - `"*"`: allows all origins (warned)
/// - `None`: localhost only
/// - otherwise: the comma-separated origins that parse
fn build_cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins ({CORS_ORIGINS_ENV}=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods(CORS_METHODS)
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No origins configured, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5000",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5000",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(CORS_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting - global quota (if enabled)
/// 5. Authentication - validates API key (if configured)
///
/// Unknown paths and unsupported methods answer with the usual
/// `{"error"}` body.
pub fn create_router_with(state: AppState, settings: &ApiSettings) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/api/students",
            get(handlers::list_handler).post(handlers::create_handler),
        )
        .route("/api/students/sorted", get(handlers::sorted_handler))
        .route("/api/students/count", get(handlers::count_handler))
        .route("/api/students/dummy", post(handlers::seed_handler))
        .route(
            "/api/students/{roll}",
            get(handlers::get_handler)
                .put(handlers::update_handler)
                .delete(handlers::delete_handler),
        )
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed);

    match settings.api_key.as_deref().and_then(ApiKey::new) {
        Some(key) => {
            tracing::info!("API key authentication enabled");
            router = router.layer(axum_middleware::from_fn_with_state(key, guard::require_api_key));
        }
        None => {
            tracing::warn!(
                "API key authentication DISABLED - all endpoints are publicly accessible! \
                 Set {API_KEY_ENV} to enable authentication."
            );
        }
    }

    match Throttle::per_second(settings.rate_limit) {
        Some(throttle) => {
            tracing::info!("Rate limiting enabled: {} requests/second", settings.rate_limit);
            router = router.layer(axum_middleware::from_fn_with_state(throttle, guard::throttle));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(DefaultBodyLimit::max(settings.body_limit_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(settings.cors_origins.as_deref())),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and serve until Ctrl+C.
pub async fn run_server(
    addr: &str,
    registry: Registry,
    settings: &ApiSettings,
) -> Result<(), RecordError> {
    let backend = registry.backend_name();
    let router = create_router_with(AppState::new(registry), settings);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| RecordError::Storage(format!("Bind failed: {}", e)))?;

    tracing::info!(event = "server_started", %addr, backend, "Rollbook HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RecordError::Storage(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!(event = "server_stopping", "Shutdown signal received");
    }
}
