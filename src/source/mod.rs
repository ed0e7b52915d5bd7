//! Upstream event source

mod wyze;

pub use wyze::WyzeClient;

use async_trait::async_trait;

use crate::bridge::PollWindow;
use crate::error::SourceError;
use crate::models::DeviceEvent;

/// Read side of the bridge: fetch events for one device in a time window.
///
/// Ordering of the returned events is not guaranteed; the poller sorts what
/// it needs sorted.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn events_in_window(
        &self,
        device_mac: &str,
        window: PollWindow,
        max_count: u32,
    ) -> Result<Vec<DeviceEvent>, SourceError>;
}
