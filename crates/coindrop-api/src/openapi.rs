//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single spec served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the gateway.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coindrop API — Payment Confirmation Gateway",
        version = "0.3.2",
        description = "Verifies Stripe checkout webhooks, records per-session payment state, and redeems each paid session for a coin grant exactly once.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::webhook::receive_event,
        crate::routes::redeem::redeem_session,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::webhook::EventAck,
        crate::routes::redeem::RedeemRequest,
        crate::routes::redeem::RedeemResponse,
    )),
    tags(
        (name = "webhook", description = "Inbound provider notifications"),
        (name = "redeem", description = "One-shot session redemption"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
