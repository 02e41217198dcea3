//! Push notification configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Push configuration (FCM)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushConfig {
    /// FCM server key
    pub fcm_server_key: String,

    /// Override for the FCM send endpoint (testing)
    pub fcm_api_url: Option<String>,
}

impl PushConfig {
    /// Validate push configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fcm_server_key.is_empty() {
            return Err(ValidationError::MissingRequired("PUSH__FCM_SERVER_KEY"));
        }
        Ok(())
    }
}
