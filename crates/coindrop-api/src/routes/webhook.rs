//! # Webhook Notification Processing
//!
//! `POST /webhook` receives provider event deliveries. The body is kept
//! as raw bytes until the signature over those exact bytes has verified;
//! only then is it parsed. One event type is acted on —
//! `checkout.session.completed` with `payment_status == "paid"` — and
//! everything else is acknowledged untouched so the provider stops
//! re-delivering.
//!
//! Processing is replay-safe: re-delivery of an already-recorded (or
//! already-redeemed) session is a no-op acknowledgement, never an error
//! and never a second record.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use coindrop_core::{SessionId, SessionRecord};
use coindrop_store::{Precondition, StoreError};
use coindrop_stripe::signature::{self, Verification};
use coindrop_stripe::types::Event;
use coindrop_stripe::SIGNATURE_HEADER;

use crate::error::AppError;
use crate::state::AppState;

/// Acknowledgement body for an accepted delivery.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventAck {
    /// Always `true`; the provider only checks the status code.
    pub received: bool,
}

impl EventAck {
    fn received() -> Self {
        Self { received: true }
    }
}

/// Build the webhook router.
///
/// Non-POST methods get the same JSON 404 as unknown routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(receive_event).fallback(crate::not_found))
}

/// POST /webhook — Verify and process one provider notification.
#[utoipa::path(
    post,
    path = "/webhook",
    request_body(content = String, description = "Raw provider event envelope; signature in the `Stripe-Signature` header"),
    responses(
        (status = 200, description = "Delivery acknowledged", body = EventAck),
        (status = 400, description = "Invalid signature, payload, or price mismatch", body = crate::error::ErrorBody),
        (status = 500, description = "Webhook secret not configured", body = crate::error::ErrorBody),
        (status = 502, description = "Provider API failure", body = crate::error::ErrorBody),
    ),
    tag = "webhook"
)]
pub(crate) async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<EventAck>, AppError> {
    let Some(secret) = state.config.webhook_secret.as_ref() else {
        return Err(AppError::MissingWebhookSecret);
    };

    // Verification runs on the exact bytes received, before any parsing.
    let signature_header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if let Verification::Invalid(reason) = signature::verify(&body, signature_header, secret.expose())
    {
        tracing::warn!(reason = reason.as_str(), "webhook delivery rejected");
        return Err(AppError::InvalidSignature);
    }

    let event: Event = serde_json::from_slice(&body).map_err(|_| AppError::InvalidPayload)?;
    if !event.is_checkout_completed() {
        tracing::debug!(kind = %event.kind, "ignoring unrelated event");
        return Ok(Json(EventAck::received()));
    }

    // A completed-checkout event must carry its session object.
    let session = event
        .data
        .and_then(|data| data.object)
        .ok_or(AppError::InvalidPayload)?;

    if !session.is_paid() {
        tracing::debug!("checkout completed but not paid; ignoring");
        return Ok(Json(EventAck::received()));
    }

    let session_id = session
        .id
        .and_then(|id| SessionId::new(id).ok())
        .ok_or(AppError::InvalidPayload)?;

    record_paid_session(&state, &session_id).await?;
    Ok(Json(EventAck::received()))
}

/// Record a paid session: replay check, optional price confirmation,
/// then a conditional write.
///
/// The write is conditioned on the version observed during the replay
/// check. Losing that race forces a re-read: a session that became
/// `redeemed` in the meantime stays settled (the replay rule), anything
/// else retries the overwrite.
async fn record_paid_session(state: &AppState, session_id: &SessionId) -> Result<(), AppError> {
    let observed = state.sessions.get(session_id)?;
    if let Some((record, _)) = &observed {
        if !record.is_redeemable() {
            tracing::info!(session = %session_id, "replayed notification for a redeemed session");
            return Ok(());
        }
    }

    confirm_price(state, session_id).await?;

    let coins = state.config.default_coins;
    let mut precondition = match &observed {
        Some((_, version)) => Precondition::Version(*version),
        None => Precondition::Absent,
    };

    loop {
        match state
            .sessions
            .put(session_id, &SessionRecord::paid(coins, Utc::now()), precondition)
        {
            Ok(_) => {
                tracing::info!(session = %session_id, coins, "session recorded as paid");
                return Ok(());
            }
            Err(StoreError::Conflict { .. }) => match state.sessions.get(session_id)? {
                Some((current, _)) if !current.is_redeemable() => {
                    tracing::info!(session = %session_id, "session redeemed concurrently; leaving it");
                    return Ok(());
                }
                Some((_, version)) => precondition = Precondition::Version(version),
                None => precondition = Precondition::Absent,
            },
            Err(err) => return Err(err.into()),
        }
    }
}

/// Confirm the session contains a line item at the enforced price.
///
/// A no-op unless both a price id and a provider client are configured.
/// Any upstream failure is a hard failure of this notification — no
/// partial record is ever written.
async fn confirm_price(state: &AppState, session_id: &SessionId) -> Result<(), AppError> {
    let (Some(price_id), Some(stripe)) = (
        state.config.enforced_price_id.as_deref(),
        state.stripe.as_ref(),
    ) else {
        return Ok(());
    };

    let items = stripe.checkout_session_line_items(session_id).await?;
    if items.iter().any(|item| item.has_price(price_id)) {
        Ok(())
    } else {
        tracing::warn!(session = %session_id, price = price_id, "no line item matched the enforced price");
        Err(AppError::PriceNotMatched)
    }
}
