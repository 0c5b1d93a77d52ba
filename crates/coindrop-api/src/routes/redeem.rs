//! # Session Redemption
//!
//! `POST /redeem` exchanges a paid session id for its coin grant,
//! exactly once. The `paid → redeemed` write is conditioned on the
//! version read, so of two concurrent redeemers exactly one lands the
//! transition; the other re-reads, finds the terminal record, and gets
//! the same `not_paid` answer as any unknown or unpaid session —
//! callers cannot distinguish the three cases.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use coindrop_core::SessionId;
use coindrop_store::{Precondition, StoreError};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Redemption request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RedeemRequest {
    /// Provider-issued checkout session id.
    ///
    /// Optional at the serde layer so an absent field maps to
    /// `session_id_required` rather than a generic parse error.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Successful redemption response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedeemResponse {
    /// Coins granted by this redemption.
    pub coins_granted: u32,
    /// The session id that was redeemed.
    pub session_id: String,
}

/// Build the redemption router.
///
/// Non-POST methods get the same JSON 404 as unknown routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/redeem", post(redeem_session).fallback(crate::not_found))
}

/// POST /redeem — Redeem a paid session for its coin grant.
#[utoipa::path(
    post,
    path = "/redeem",
    request_body = RedeemRequest,
    responses(
        (status = 200, description = "Grant issued", body = RedeemResponse),
        (status = 400, description = "Invalid JSON, missing session_id, or session not redeemable", body = crate::error::ErrorBody),
    ),
    tag = "redeem"
)]
pub(crate) async fn redeem_session(
    State(state): State<AppState>,
    body: Result<Json<RedeemRequest>, JsonRejection>,
) -> Result<Json<RedeemResponse>, AppError> {
    let request = extract_json(body)?;
    let session_id = request
        .session_id
        .and_then(|id| SessionId::new(id).ok())
        .ok_or(AppError::SessionIdRequired)?;

    loop {
        let Some((record, version)) = state.sessions.get(&session_id)? else {
            return Err(AppError::NotPaid);
        };
        let Ok(redeemed) = record.redeemed(Utc::now()) else {
            return Err(AppError::NotPaid);
        };

        match state
            .sessions
            .put(&session_id, &redeemed, Precondition::Version(version))
        {
            Ok(_) => {
                tracing::info!(session = %session_id, coins = redeemed.coins, "session redeemed");
                return Ok(Json(RedeemResponse {
                    coins_granted: redeemed.coins,
                    session_id: session_id.to_string(),
                }));
            }
            // Lost to a concurrent writer; the re-read decides.
            Err(StoreError::Conflict { .. }) => continue,
            Err(err) => return Err(err.into()),
        }
    }
}
