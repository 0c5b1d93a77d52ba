//! Stripe client errors.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors from the Stripe REST client.
///
/// Each variant names the endpoint it occurred on, so a log line is
/// actionable without request tracing.
#[derive(Error, Debug)]
pub enum StripeError {
    /// Client could not be constructed from its configuration.
    #[error("stripe configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The request never produced an HTTP response (connect failure,
    /// timeout, TLS error).
    #[error("request to stripe failed at {endpoint}: {source}")]
    Http {
        /// Endpoint label, e.g. `GET /checkout/sessions/{id}/line_items`.
        endpoint: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Stripe answered with a non-2xx status.
    #[error("stripe returned {status} at {endpoint}: {message}")]
    Api {
        /// Endpoint label.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Message from Stripe's error envelope, or a generic fallback.
        message: String,
    },

    /// A 2xx response body was not the expected JSON shape.
    #[error("stripe response at {endpoint} could not be decoded: {source}")]
    Deserialization {
        /// Endpoint label.
        endpoint: String,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}
