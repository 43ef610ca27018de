use thiserror::Error;

use shared_models::AppError;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("SMS provider not configured")]
    NotConfigured,

    #[error("{message}")]
    Api { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<MessagingError> for AppError {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::NotConfigured => AppError::Config(err.to_string()),
            _ => AppError::ExternalService(err.to_string()),
        }
    }
}
