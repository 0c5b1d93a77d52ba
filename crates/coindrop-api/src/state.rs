//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Configuration is an explicit struct built
//! once in `main` — handlers never read the environment.

use std::sync::Arc;

use coindrop_core::Secret;
use coindrop_store::SessionStore;
use coindrop_stripe::StripeClient;

/// Gateway configuration, read-only after startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port to bind.
    pub port: u16,
    /// Shared secret for webhook signature verification. Absence turns
    /// every webhook delivery into a `config_error` (500) — deliveries
    /// are never accepted unverified.
    pub webhook_secret: Option<Secret>,
    /// Coins granted per redeemed session.
    pub default_coins: u32,
    /// When set, a completed checkout must contain a line item sold at
    /// this price id before a record is written.
    pub enforced_price_id: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `STRIPE_WEBHOOK_SECRET` (optional; see [`AppConfig::webhook_secret`])
    /// - `COINS_PACK_1` (default: 5)
    /// - `PRICE_ID_PACK_1` (optional)
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .map(Secret::new),
            default_coins: std::env::var("COINS_PACK_1")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(5),
            enforced_price_id: std::env::var("PRICE_ID_PACK_1")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration.
    pub config: Arc<AppConfig>,
    /// Durable session records.
    pub sessions: SessionStore,
    /// Provider client for line-item confirmation; `None` disables
    /// price enforcement.
    pub stripe: Option<StripeClient>,
}

impl AppState {
    /// Assemble the application state.
    pub fn new(config: AppConfig, sessions: SessionStore, stripe: Option<StripeClient>) -> Self {
        if config.enforced_price_id.is_some() && stripe.is_none() {
            tracing::warn!(
                "a price id is configured but no stripe client is available; \
                 line-item enforcement will be skipped"
            );
        }
        Self {
            config: Arc::new(config),
            sessions,
            stripe,
        }
    }
}
