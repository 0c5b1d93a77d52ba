//! Stripe REST client.
//!
//! One endpoint is consumed: checkout session line items, used to
//! confirm that a paid session actually contains the configured price
//! before a record is written. The call sits on the webhook request
//! path, so the client carries a bounded timeout and performs no
//! retries — Stripe re-delivers the webhook on a non-2xx response and
//! the handler is replay-safe.

use std::time::Duration;

use coindrop_core::SessionId;
use serde::Deserialize;

use crate::config::{ConfigError, StripeConfig};
use crate::error::StripeError;
use crate::types::{LineItem, LineItemList};

/// Client for the Stripe API.
#[derive(Debug, Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    api_url: url::Url,
}

/// Stripe error envelope: `{"error": {"message": ...}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    #[serde(default)]
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl StripeClient {
    /// Build a client from configuration.
    ///
    /// The bearer credential is installed as a default header and marked
    /// sensitive so middleware never logs it.
    pub fn new(config: StripeConfig) -> Result<Self, StripeError> {
        let mut auth = reqwest::header::HeaderValue::from_str(&format!(
            "Bearer {}",
            config.secret_key.expose()
        ))
        .map_err(|_| StripeError::Config(ConfigError::UnusableSecretKey))?;
        auth.set_sensitive(true);

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| StripeError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            api_url: config.api_url,
        })
    }

    /// Fetch the line items of a checkout session.
    ///
    /// Calls `GET {base}/v1/checkout/sessions/{id}/line_items`. Non-2xx
    /// responses surface Stripe's error message; a 2xx body that is not
    /// the expected list shape is a hard failure, never an empty list.
    pub async fn checkout_session_line_items(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<LineItem>, StripeError> {
        let endpoint = format!("GET /checkout/sessions/{session_id}/line_items");
        let url = format!(
            "{}v1/checkout/sessions/{session_id}/line_items",
            self.api_url
        );

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| StripeError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| "stripe api error".to_string());
            tracing::warn!(%endpoint, status, "stripe api call failed");
            return Err(StripeError::Api {
                endpoint,
                status,
                message,
            });
        }

        let list: LineItemList = resp
            .json()
            .await
            .map_err(|e| StripeError::Deserialization { endpoint, source: e })?;
        Ok(list.data)
    }
}
