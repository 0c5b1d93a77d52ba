//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! The gateway's wire contract fixes a flat error shape — every failure
//! is `{"error": "<code>"}` with the status the taxonomy assigns — so
//! unlike richer APIs there is no nested code/message/details body.
//! Internal and upstream detail is logged, never echoed to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use coindrop_store::StoreError;
use coindrop_stripe::StripeError;

/// Flat JSON error body: `{"error": "<code>"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: String,
}

/// Application-level error type mapped onto the gateway's error taxonomy.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be parsed as JSON (400).
    #[error("request body is not valid JSON")]
    InvalidJson,

    /// Redemption request without a usable session id (400).
    #[error("session_id is required")]
    SessionIdRequired,

    /// Redemption preconditions unmet: unknown session, never paid, or
    /// already redeemed — indistinguishable by design (400).
    #[error("session has not been paid or was already redeemed")]
    NotPaid,

    /// Webhook authenticity check failed (400).
    #[error("webhook signature verification failed")]
    InvalidSignature,

    /// Event envelope could not be parsed or lacked required fields (400).
    #[error("event payload could not be parsed")]
    InvalidPayload,

    /// No line item matched the enforced price (400).
    #[error("no line item matched the configured price")]
    PriceNotMatched,

    /// The provider API call failed (502). Detail is logged only.
    #[error("upstream provider failure: {0}")]
    Upstream(String),

    /// The webhook shared secret is not configured (500).
    #[error("webhook shared secret is not configured")]
    MissingWebhookSecret,

    /// No such route (404).
    #[error("not found")]
    NotFound,

    /// Unexpected failure (500). Detail is logged only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and wire error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidJson => (StatusCode::BAD_REQUEST, "invalid_json"),
            Self::SessionIdRequired => (StatusCode::BAD_REQUEST, "session_id_required"),
            Self::NotPaid => (StatusCode::BAD_REQUEST, "not_paid"),
            Self::InvalidSignature => (StatusCode::BAD_REQUEST, "invalid_signature"),
            Self::InvalidPayload => (StatusCode::BAD_REQUEST, "invalid_payload"),
            Self::PriceNotMatched => (StatusCode::BAD_REQUEST, "price_not_matched"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            Self::MissingWebhookSecret => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Self::NotFound => (StatusCode::NOT_FOUND, "not found"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Operator-facing detail stays in the logs.
        match &self {
            Self::Internal(detail) => tracing::error!(%detail, "internal server error"),
            Self::Upstream(detail) => tracing::warn!(%detail, "upstream provider failure"),
            Self::MissingWebhookSecret => {
                tracing::error!("webhook delivery received but no shared secret is configured");
            }
            _ => {}
        }

        let body = ErrorBody {
            error: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Store failures that escape the handlers' conflict handling.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        // Conflicts are resolved by re-reading in the handlers; one
        // reaching here is a logic error, reported like any other
        // store failure.
        Self::Internal(err.to_string())
    }
}

impl From<StripeError> for AppError {
    fn from(err: StripeError) -> Self {
        Self::Upstream(err.to_string())
    }
}
