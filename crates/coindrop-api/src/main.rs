//! # coindrop-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the coindrop gateway.
//! Binds to a configurable port (default 8080).

use coindrop_api::state::{AppConfig, AppState};
use coindrop_store::SessionStore;
use coindrop_stripe::{ConfigError, StripeClient, StripeConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    if config.webhook_secret.is_none() {
        tracing::warn!(
            "STRIPE_WEBHOOK_SECRET is not set; webhook deliveries will be rejected with config_error"
        );
    }

    // The provider client is optional — without it, price enforcement
    // is skipped and the gateway still records paid sessions.
    let stripe = match StripeConfig::from_env() {
        Ok(stripe_config) => Some(StripeClient::new(stripe_config)?),
        Err(ConfigError::MissingSecretKey) => {
            tracing::warn!("STRIPE_SECRET_KEY is not set; line-item price enforcement is disabled");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let sessions = SessionStore::in_memory();
    let port = config.port;
    let state = AppState::new(config, sessions, stripe);
    let app = coindrop_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("coindrop gateway listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
