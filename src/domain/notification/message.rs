//! Push message value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Validated push notification content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    title: String,
    body: String,
}

impl PushMessage {
    /// Creates a message, rejecting blank title or body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, ValidationError> {
        let title = title.into();
        let body = body.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        if body.trim().is_empty() {
            return Err(ValidationError::empty_field("body"));
        }
        Ok(Self { title, body })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
