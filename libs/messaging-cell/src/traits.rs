use async_trait::async_trait;

#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

use crate::models::SendResult;

/// Delivers one text message. Failures are reported in the result, never raised.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone_number: &str, message_body: &str) -> SendResult;
}
