// libs/messaging-cell/src/models.rs
use serde::{Deserialize, Serialize};

/// Outcome of one SMS attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    pub error: Option<String>,
}

impl SendResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

// ==============================================================================
// CLICKSEND WIRE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickSendRequest {
    pub messages: Vec<ClickSendMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickSendMessage {
    pub source: String,
    pub from: String,
    pub body: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickSendResponse {
    pub response_code: String,
    #[serde(default)]
    pub response_msg: Option<String>,
}
