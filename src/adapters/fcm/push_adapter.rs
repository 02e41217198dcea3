//! Firebase Cloud Messaging push sender adapter.
//!
//! Implements the `PushSender` trait against the FCM legacy HTTP API:
//! one POST per token batch, authorized with the server key.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::notification::PushMessage;
use crate::ports::{DeliveryReport, PushError, PushSender};

/// FCM API configuration.
#[derive(Clone)]
pub struct FcmConfig {
    /// FCM server key.
    server_key: SecretString,

    /// Send endpoint (default: https://fcm.googleapis.com/fcm/send).
    api_url: String,
}

impl FcmConfig {
    /// Create a new FCM configuration.
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            server_key: SecretString::new(server_key.into()),
            api_url: "https://fcm.googleapis.com/fcm/send".to_string(),
        }
    }

    /// Set a custom send endpoint (for testing).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

/// FCM implementation of the PushSender port.
pub struct FcmPushSender {
    config: FcmConfig,
    http_client: reqwest::Client,
}

impl FcmPushSender {
    /// Creates a new adapter with the given configuration.
    pub fn new(config: FcmConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    registration_ids: &'a [String],
    notification: FcmNotification<'a>,
}

#[derive(Debug, Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    success: i64,
    failure: i64,
}

#[async_trait]
impl PushSender for FcmPushSender {
    async fn send(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<DeliveryReport, PushError> {
        let request = FcmRequest {
            registration_ids: tokens,
            notification: FcmNotification {
                title: message.title(),
                body: message.body(),
            },
        };

        let response = self
            .http_client
            .post(&self.config.api_url)
            .header(
                "Authorization",
                format!("key={}", self.config.server_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| PushError::unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PushError::unavailable(format!("FCM returned {}", status)));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PushError::rejected(format!("FCM error: {}", error_text)));
        }

        let report: FcmResponse = response.json().await.map_err(|e| {
            PushError::rejected(format!("Failed to parse FCM response: {}", e))
        })?;

        Ok(DeliveryReport {
            submitted: report.success.max(0) as usize,
            failed: report.failure.max(0) as usize,
        })
    }
}
