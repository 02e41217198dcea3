//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe
//! PaymentIntents API. The only call this core makes is retrieval: the
//! client completes the charge, then hands us the intent id to verify.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{
    PaymentError, PaymentErrorCode, PaymentProvider, PaymentStatus, PaymentVerification,
};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe implementation of the PaymentProvider port.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Creates a new adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

/// Stripe payment intent, reduced to the fields this core reads.
#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    status: String,
    amount: i64,
}

fn map_intent_status(status: &str) -> PaymentStatus {
    match status {
        "succeeded" => PaymentStatus::Succeeded,
        "processing" | "requires_action" | "requires_capture" | "requires_confirmation" => {
            PaymentStatus::Pending
        }
        "canceled" | "requires_payment_method" => PaymentStatus::Failed,
        other => {
            tracing::warn!(status = other, "Unknown Stripe payment intent status");
            PaymentStatus::Failed
        }
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn retrieve_payment(
        &self,
        reference: &str,
    ) -> Result<PaymentVerification, PaymentError> {
        let url = format!(
            "{}/v1/payment_intents/{}",
            self.config.api_base_url, reference
        );

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::unavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PaymentError::invalid_reference(reference));
        }
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PaymentError::unavailable(format!(
                "Stripe returned {}",
                status
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Stripe API error: {}", error_text),
            ));
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })?;

        Ok(PaymentVerification {
            reference: intent.id,
            status: map_intent_status(&intent.status),
            amount_cents: intent.amount,
        })
    }
}
