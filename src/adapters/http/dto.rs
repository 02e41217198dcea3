//! Request/response DTOs for the HTTP API.

use serde::{Deserialize, Serialize};

/// Standard error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Request to grant premium after a completed payment.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantRequest {
    pub payment_reference: String,
    pub plan: String,
}

/// Response to a grant request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantResponse {
    pub granted: bool,
}

/// Request to broadcast a push message.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastRequest {
    pub segment: String,
    pub title: String,
    pub body: String,
}

/// Response to a broadcast request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub sent_to: usize,
}

/// Response to a premium-expiry sweep trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResponse {
    pub processed: usize,
    pub failed: usize,
    pub reconciled: usize,
}

/// Response to a storage-retention sweep trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReapResponse {
    pub deleted: usize,
    pub blob_failures: usize,
    pub record_failures: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_request_deserializes() {
        let json = r#"{"payment_reference": "pi_123", "plan": "monthly"}"#;
        let request: GrantRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.payment_reference, "pi_123");
        assert_eq!(request.plan, "monthly");
    }

    #[test]
    fn error_response_serializes_code_and_message() {
        let body = ErrorResponse::new("INVALID_PLAN", "Invalid premium plan: weekly");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "INVALID_PLAN");
        assert_eq!(json["message"], "Invalid premium plan: weekly");
    }
}
