//! Shared data types

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Message attached to every forwarded doorbell press.
pub const BUTTON_PRESS_MESSAGE: &str = "Doorbell Button Pressed";

/// One event record returned by the Wyze event history API.
///
/// Timestamps arrive as epoch milliseconds; `event_ts()` converts to UTC.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceEvent {
    #[serde(default)]
    pub event_id: Option<String>,
    pub device_mac: String,
    pub event_type: i32,
    #[serde(rename = "event_ts")]
    pub event_ts_ms: i64,
}

impl DeviceEvent {
    /// Event timestamp as UTC. Out-of-range millis clamp to the epoch.
    pub fn event_ts(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.event_ts_ms)
            .single()
            .unwrap_or_else(|| chrono::DateTime::UNIX_EPOCH)
    }
}

/// Outbound payload posted to the downstream bridge endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EventPayload {
    #[serde(rename = "eventType")]
    pub event_type: i32,
    #[serde(rename = "deviceMac")]
    pub device_mac: String,
    #[serde(rename = "eventTimeUtc")]
    pub event_time_utc: String,
    pub message: String,
}

impl EventPayload {
    /// Build the payload for a qualifying event.
    pub fn from_event(event: &DeviceEvent) -> Self {
        Self {
            event_type: event.event_type,
            device_mac: event.device_mac.clone(),
            event_time_utc: event
                .event_ts()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            message: BUTTON_PRESS_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(ts_ms: i64) -> DeviceEvent {
        DeviceEvent {
            event_id: Some("evt-1".to_string()),
            device_mac: "AABBCCDDEEFF".to_string(),
            event_type: 2005,
            event_ts_ms: ts_ms,
        }
    }

    #[test]
    fn payload_uses_wire_field_names() {
        // 2024-05-01T12:00:00.500Z
        let event = make_event(1_714_564_800_500);
        let payload = EventPayload::from_event(&event);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["eventType"], 2005);
        assert_eq!(json["deviceMac"], "AABBCCDDEEFF");
        assert_eq!(json["eventTimeUtc"], "2024-05-01T12:00:00.500Z");
        assert_eq!(json["message"], BUTTON_PRESS_MESSAGE);
    }

    #[test]
    fn device_event_deserializes_from_api_shape() {
        let raw = r#"{
            "event_id": "abc123",
            "device_mac": "AABBCCDDEEFF",
            "event_type": 2005,
            "event_ts": 1714564800500
        }"#;
        let event: DeviceEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.event_type, 2005);
        assert_eq!(event.event_ts().timestamp_millis(), 1_714_564_800_500);
    }
}
