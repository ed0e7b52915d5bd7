//! EventPoller: the query-filter-deliver-advance cycle
//!
//! Runs in the foreground forever. Each cycle queries one window of event
//! history, forwards qualifying events oldest-first, then advances the
//! watermark. A failed query leaves the watermark alone so the same window is
//! retried next cycle; a failed delivery is logged and does not hold anything
//! back (at-most-once downstream).

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::interval;

use crate::bridge::Watermark;
use crate::config::BridgeConfig;
use crate::error::SourceError;
use crate::models::{DeviceEvent, EventPayload};
use crate::notify::EventSink;
use crate::source::EventSource;

pub struct EventPoller<S, K> {
    source: S,
    sink: K,
    device_mac: String,
    event_type: i32,
    max_events_per_poll: u32,
    polling_interval: Duration,
    watermark: Watermark,
}

impl<S: EventSource, K: EventSink> EventPoller<S, K> {
    pub fn new(source: S, sink: K, config: &BridgeConfig, now: DateTime<Utc>) -> Self {
        Self {
            source,
            sink,
            device_mac: config.device_mac.clone(),
            event_type: config.event_type,
            max_events_per_poll: config.max_events_per_poll,
            polling_interval: Duration::from_secs(config.polling_interval_secs),
            watermark: Watermark::new(now, config.startup_lookback_secs),
        }
    }

    /// Start the poll loop (runs forever).
    pub async fn start(mut self) {
        tracing::info!(
            "[Poll] Starting bridge for device {} (interval: {}s)",
            self.device_mac,
            self.polling_interval.as_secs()
        );

        let mut interval_timer = interval(self.polling_interval);

        loop {
            interval_timer.tick().await;

            let now = Utc::now();
            if let Err(e) = self.poll_once(now).await {
                tracing::error!("[Poll] Cycle failed, window will be retried: {}", e);
            }
        }
    }

    /// One poll cycle. `now` is sampled once by the caller and reused for
    /// both the window end and the fallback advance. Returns `Err` only on
    /// query failure, in which case the watermark has not moved.
    async fn poll_once(&mut self, now: DateTime<Utc>) -> Result<(), SourceError> {
        let window = self.watermark.current_window(now);

        // Clock went backwards between cycles. Empty window, nothing to query.
        if window.is_inverted() {
            tracing::warn!(
                "[Poll] Window start {} is after end {}, skipping query",
                window.start,
                window.end
            );
            self.watermark.advance(None, window.end);
            return Ok(());
        }

        tracing::debug!(
            "[Poll] Querying events between {} and {}",
            window.start,
            window.end
        );

        let events = self
            .source
            .events_in_window(&self.device_mac, window, self.max_events_per_poll)
            .await?;

        // Latest timestamp over all events, matching or not, so even ignored
        // events shrink the next window.
        let latest_seen = events.iter().map(DeviceEvent::event_ts).max();

        let mut presses: Vec<&DeviceEvent> = events
            .iter()
            .filter(|e| e.event_type == self.event_type)
            .collect();
        presses.sort_by_key(|e| e.event_ts());

        if presses.is_empty() {
            tracing::debug!("[Poll] No new doorbell press events found");
        } else {
            tracing::info!("[Poll] Found {} new doorbell press(es)", presses.len());
        }

        for event in presses {
            let payload = EventPayload::from_event(event);
            if let Err(e) = self.sink.deliver(&payload).await {
                tracing::error!(
                    "[Poll] Delivery failed for event at {}: {}",
                    payload.event_time_utc,
                    e
                );
            }
        }

        self.watermark.advance(latest_seen, window.end);
        Ok(())
    }

    #[cfg(test)]
    fn watermark(&self) -> &Watermark {
        &self.watermark
    }
}
