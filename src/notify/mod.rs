//! Downstream delivery

mod webhook;

pub use webhook::WebhookNotifier;

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::models::EventPayload;

/// Write side of the bridge: push one payload to the downstream consumer.
/// No retry, no queue; a failed delivery is logged and lost.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, payload: &EventPayload) -> Result<(), DeliveryError>;
}
