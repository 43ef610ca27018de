// libs/messaging-cell/src/services/clicksend.rs
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::error::MessagingError;
use crate::models::{ClickSendMessage, ClickSendRequest, ClickSendResponse, SendResult};
use crate::traits::SmsSender;

/// ClickSend REST client.
/// Based on: https://developers.clicksend.com/docs/rest/v3/#send-sms
pub struct ClickSendClient {
    client: Client,
    username: String,
    api_key: String,
    api_url: String,
    from: String,
    source: String,
}

impl std::fmt::Debug for ClickSendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickSendClient")
            .field("api_url", &self.api_url)
            .field("from", &self.from)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl ClickSendClient {
    pub fn new(config: &AppConfig) -> Result<Self, MessagingError> {
        if !config.is_sms_configured() {
            return Err(MessagingError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            username: config.clicksend_username.clone(),
            api_key: config.clicksend_api_key.clone(),
            api_url: config.clicksend_api_url.clone(),
            from: config.sms_from.clone(),
            source: config.sms_source.clone(),
        })
    }

    /// POST /v3/sms/send
    pub async fn send_sms(&self, phone_number: &str, message_body: &str) -> Result<(), MessagingError> {
        let request_body = ClickSendRequest {
            messages: vec![ClickSendMessage {
                source: self.source.clone(),
                from: self.from.clone(),
                body: message_body.to_string(),
                to: format_phone(phone_number),
            }],
        };

        debug!("Sending SMS request to: {}", self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .basic_auth(&self.username, Some(&self.api_key))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!("ClickSend response: {} - {}", status, response_text);

        if status != StatusCode::OK {
            error!("ClickSend request failed: {} - {}", status, response_text);
            return Err(MessagingError::Api {
                message: format!("HTTP {}: {}", status.as_u16(), response_text),
            });
        }

        let result: ClickSendResponse = serde_json::from_str(&response_text)?;
        if result.response_code != "SUCCESS" {
            return Err(MessagingError::Api {
                message: format!(
                    "ClickSend API error: {}",
                    result.response_msg.unwrap_or(result.response_code)
                ),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl SmsSender for ClickSendClient {
    async fn send(&self, phone_number: &str, message_body: &str) -> SendResult {
        match self.send_sms(phone_number, message_body).await {
            Ok(()) => {
                info!("SMS accepted by ClickSend for {}", format_phone(phone_number));
                SendResult::sent()
            }
            Err(MessagingError::Api { message }) => SendResult::failed(message),
            Err(err) => SendResult::failed(err.to_string()),
        }
    }
}

/// Strips everything but digits and `+` from a phone cell.
pub fn format_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}
