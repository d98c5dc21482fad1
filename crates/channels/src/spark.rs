use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use netbot_core::config::SparkConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const MAX_ERROR_BODY: usize = 256;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("original request carries no spark room id")]
    MissingRoom,
    #[error("spark request failed: {0}")]
    Transport(String),
    #[error("spark returned status {status}: {message}")]
    Status { status: u16, message: String },
}

/// A message posted into a Spark (Webex Teams) room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SparkMessage {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, message: &SparkMessage) -> Result<(), DeliveryError>;
}

#[derive(Clone)]
pub struct SparkClient {
    http: Client,
    base_url: String,
    access_token: SecretString,
}

impl fmt::Debug for SparkClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparkClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl SparkClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: SecretString,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("netbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| DeliveryError::Transport(format!("building http client: {error}")))?;
        Ok(Self { http, base_url: base_url.into().trim_end_matches('/').to_owned(), access_token })
    }

    pub fn from_config(config: &SparkConfig) -> Result<Self, DeliveryError> {
        Self::new(
            config.base_url.clone(),
            config.access_token.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl MessageSender for SparkClient {
    async fn send(&self, message: &SparkMessage) -> Result<(), DeliveryError> {
        debug!(event_name = "delivery.spark.send", room_id = %message.room_id, "posting spark message");
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .bearer_auth(self.access_token.expose_secret())
            .json(message)
            .send()
            .await
            .map_err(|error| DeliveryError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let mut end = MAX_ERROR_BODY;
                while !message.is_char_boundary(end) {
                    end -= 1;
                }
                message.truncate(end);
            }
            return Err(DeliveryError::Status { status: status.as_u16(), message });
        }
        Ok(())
    }
}
