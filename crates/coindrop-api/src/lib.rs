//! # coindrop-api — HTTP Surface of the Coindrop Gateway
//!
//! ## API Surface
//!
//! | Method/Path            | Module               | Behavior                          |
//! |------------------------|----------------------|-----------------------------------|
//! | `POST /webhook`        | [`routes::webhook`]  | Verify + process one notification |
//! | `POST /redeem`         | [`routes::redeem`]   | Redeem a paid session once        |
//! | `OPTIONS *`            | [`middleware::cors`] | 204 preflight                     |
//! | `GET /health/liveness` | here                 | process liveness probe            |
//! | `GET /health/readiness`| here                 | readiness probe                   |
//! | `GET /openapi.json`    | [`openapi`]          | generated OpenAPI spec            |
//! | anything else          | here                 | 404 `{"error": "not found"}`      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → CorsMiddleware → Handler
//! ```
//!
//! Preflights never reach routing; every other response leaves with
//! `access-control-allow-origin: *`.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(routes::webhook::router())
        .merge(routes::redeem::router())
        .merge(openapi::router())
        .fallback(not_found)
        .layer(from_fn(middleware::cors::cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}

/// JSON 404 for unknown routes and methods.
pub(crate) async fn not_found() -> AppError {
    AppError::NotFound
}
