//! Stripe client configuration.
//!
//! Explicit struct, loaded from the environment in `main` only — never
//! ambient lookup at request time. The secret key is held in a
//! [`Secret`] so a stray `{:?}` cannot leak it.

use coindrop_core::Secret;
use url::Url;

/// Configuration for the Stripe REST client.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Base URL of the Stripe API.
    /// Default: <https://api.stripe.com>
    pub api_url: Url,
    /// Secret API key used as the bearer credential.
    pub secret_key: Secret,
    /// Request timeout in seconds. Line-item confirmation sits on the
    /// webhook request path, so this bounds webhook latency too.
    pub timeout_secs: u64,
}

impl StripeConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `STRIPE_SECRET_KEY` (required)
    /// - `STRIPE_API_URL` (default: `https://api.stripe.com`)
    /// - `STRIPE_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret_key =
            std::env::var("STRIPE_SECRET_KEY").map_err(|_| ConfigError::MissingSecretKey)?;

        Ok(Self {
            api_url: env_url("STRIPE_API_URL", "https://api.stripe.com")?,
            secret_key: Secret::new(secret_key),
            timeout_secs: std::env::var("STRIPE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        })
    }

    /// Configuration pointing at a local mock server (for testing).
    pub fn local_mock(base_url: &str, secret_key: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: Url::parse(base_url)
                .map_err(|e| ConfigError::InvalidUrl("mock".to_string(), e.to_string()))?,
            secret_key: Secret::new(secret_key),
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No secret key in the environment.
    #[error("STRIPE_SECRET_KEY environment variable is required")]
    MissingSecretKey,
    /// A URL variable failed to parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// The secret key cannot be carried in an HTTP header.
    #[error("secret key contains bytes not permitted in an HTTP header")]
    UnusableSecretKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let config = StripeConfig::local_mock("http://127.0.0.1:9000", "sk_test_x").unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(config.secret_key.expose(), "sk_test_x");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn debug_never_prints_the_key() {
        let config = StripeConfig::local_mock("http://127.0.0.1:9000", "sk_live_hunter2").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("COINDROP_NONEXISTENT_VAR", "https://api.stripe.com").unwrap();
        assert_eq!(url.as_str(), "https://api.stripe.com/");
    }
}
