//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`         - Short link redirect
//! - `GET  /health`         - Liveness probe
//! - `GET  /health/ready`   - Readiness probe (store ping)
//! - `/links`, `/links/{code}` - Link management API
//!
//! Static segments take precedence over `/{code}`, and codes equal to a
//! management segment are refused at creation, so the redirect namespace
//! never shadows the API.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Browser dashboard access
//!
//! Trailing-slash normalization is applied around the whole router in
//! [`crate::server`].

use crate::api;
use crate::api::handlers::{health_handler, readiness_handler, redirect_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors_origins` - origins allowed by the CORS layer; empty allows any
pub fn app_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .route("/health/ready", get(readiness_handler))
        .merge(api::routes::link_routes())
        .with_state(state)
        .layer(cors::layer(cors_origins))
        .layer(tracing::layer())
}
