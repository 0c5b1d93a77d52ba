//! # coindrop-stripe — Provider Edge of the Coindrop Gateway
//!
//! Everything that touches Stripe lives here:
//!
//! - [`signature`] — webhook authenticity: HMAC-SHA256 over the exact raw
//!   body with a constant-time digest comparison. A total function; every
//!   failure mode reduces to [`Verification::Invalid`].
//! - [`types`] — typed wire structures for the event envelope and
//!   checkout line items. Required fields are checked by the caller;
//!   everything optional is `#[serde(default)]` so schema drift in the
//!   live API cannot turn into a parse failure.
//! - [`client`] — the one REST call this gateway makes:
//!   `GET /v1/checkout/sessions/{id}/line_items`, bearer-authenticated,
//!   with a bounded timeout and no retries (Stripe re-delivers webhooks;
//!   this side stays idempotent instead).
//! - [`config`] — explicit configuration struct, env-loaded in `main`
//!   only.

pub mod client;
pub mod config;
pub mod error;
pub mod signature;
pub mod types;

pub use client::StripeClient;
pub use config::{ConfigError, StripeConfig};
pub use error::StripeError;
pub use signature::{verify, InvalidReason, Verification, SIGNATURE_HEADER};
pub use types::{CheckoutSession, Event, LineItem, Price, CHECKOUT_SESSION_COMPLETED};
