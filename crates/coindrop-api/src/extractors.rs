//! # Request Extraction Helpers
//!
//! Maps Axum's JSON rejection onto the gateway's `invalid_json` error so
//! handlers keep their happy path linear.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Extract a JSON body, mapping any deserialization failure to
/// [`AppError::InvalidJson`].
///
/// Handlers take `Result<Json<T>, JsonRejection>` and call this first:
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
///     // use req...
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result.map(|Json(value)| value).map_err(|_| AppError::InvalidJson)
}
