//! HTTP webhook delivery adapter

use async_trait::async_trait;
use std::time::Duration;

use crate::config::DeliveryConfig;
use crate::error::DeliveryError;
use crate::models::EventPayload;
use crate::notify::EventSink;

/// Posts event payloads to the configured bridge endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint_url: String,
}

impl WebhookNotifier {
    pub fn new(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
        })
    }
}

#[async_trait]
impl EventSink for WebhookNotifier {
    async fn deliver(&self, payload: &EventPayload) -> Result<(), DeliveryError> {
        tracing::debug!("[Webhook] Sending event to {}", self.endpoint_url);

        let response = self
            .client
            .post(&self.endpoint_url)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status(status.as_u16()));
        }

        tracing::debug!("[Webhook] Endpoint responded: status {}", status);
        Ok(())
    }
}
