//! wyze-event-bridge
//!
//! Polls the Wyze cloud event API for doorbell button presses and forwards
//! each one to a downstream HTTP endpoint. The upstream API has no push
//! mechanism, so a watermarked poll loop bridges the gap.

mod bridge;
mod config;
mod error;
mod models;
mod notify;
mod source;

use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bridge::EventPoller;
use crate::notify::WebhookNotifier;
use crate::source::WyzeClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wyze_event_bridge=info".into()),
        )
        .init();

    tracing::info!("Starting wyze-event-bridge...");

    // Load configuration
    let config = config::Config::load()?;
    tracing::info!("Configuration loaded");

    // Authenticate with the Wyze API. A client is a hard precondition for
    // the loop; failure here ends the process.
    let client = match WyzeClient::login(&config.source).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to initialize Wyze client: {}", e);
            anyhow::bail!("exiting due to failed Wyze client initialization: {}", e);
        }
    };

    let notifier = WebhookNotifier::new(&config.delivery)
        .map_err(|e| anyhow::anyhow!("failed to build webhook client: {}", e))?;

    tracing::info!(
        "Forwarding event type {} for device {} to {}",
        config.bridge.event_type,
        config.bridge.device_mac,
        config.delivery.endpoint_url
    );

    // The poll loop is the whole program; it runs until the process is
    // terminated.
    EventPoller::new(client, notifier, &config.bridge, Utc::now())
        .start()
        .await;

    Ok(())
}
