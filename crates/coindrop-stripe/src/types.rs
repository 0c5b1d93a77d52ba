//! Typed wire structures for Stripe payloads.
//!
//! Everything the live API may omit or extend is `#[serde(default)]` /
//! `Option` — schema drift must not turn into a parse failure. Which
//! fields are *required* for a given operation is the caller's decision:
//! the webhook handler rejects a completed-checkout event without an id,
//! but the same envelope type still parses every other event Stripe can
//! deliver.

use serde::Deserialize;

/// The one event type this gateway acts on.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Webhook event envelope: `{type, data: {object}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event type, e.g. `checkout.session.completed`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Event payload.
    #[serde(default)]
    pub data: Option<EventData>,
}

impl Event {
    /// Whether this is a completed-checkout event.
    pub fn is_checkout_completed(&self) -> bool {
        self.kind == CHECKOUT_SESSION_COMPLETED
    }
}

/// The `data` member of an event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    /// The object the event describes; a checkout session here.
    #[serde(default)]
    pub object: Option<CheckoutSession>,
}

/// Checkout session as embedded in a webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Provider-issued session id (`cs_...`).
    #[serde(default)]
    pub id: Option<String>,
    /// `paid`, `unpaid`, or `no_payment_required`.
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl CheckoutSession {
    /// Whether the session reports a settled payment.
    pub fn is_paid(&self) -> bool {
        self.payment_status.as_deref() == Some("paid")
    }
}

/// Paginated list wrapper returned by the line-items endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemList {
    /// The line items themselves.
    #[serde(default)]
    pub data: Vec<LineItem>,
}

/// One purchased line item of a checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
    /// Line item id (`li_...`).
    #[serde(default)]
    pub id: Option<String>,
    /// The price the item was sold at.
    #[serde(default)]
    pub price: Option<Price>,
}

impl LineItem {
    /// Whether this item was sold at the given price id.
    pub fn has_price(&self, price_id: &str) -> bool {
        self.price.as_ref().is_some_and(|price| price.id == price_id)
    }
}

/// Price reference on a line item.
#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    /// Price id (`price_...`).
    pub id: String,
}
