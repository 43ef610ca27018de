use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Bearer-token client shared by the Drive and Sheets integrations.
pub struct GoogleApiClient {
    client: Client,
    access_token: String,
}

impl GoogleApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_token(config.google_access_token.clone())
    }

    pub fn with_token(access_token: String) -> Self {
        Self {
            client: Client::new(),
            access_token,
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.access_token))?,
        );

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, url: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!("Making {} request to {}", method, url);

        let mut req = self
            .client
            .request(method, url)
            .headers(self.get_headers()?);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Google API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }
}
