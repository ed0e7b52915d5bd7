//! Configuration module

use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub bridge: BridgeConfig,
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Deserialize)]
pub struct SourceConfig {
    pub email: String,
    pub password: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
}

#[derive(Debug, Deserialize)]
pub struct BridgeConfig {
    /// MAC of the doorbell to poll (VDB = Video Doorbell).
    pub device_mac: String,
    #[serde(default = "default_polling_interval")]
    pub polling_interval_secs: u64,
    /// Wyze event type code for a doorbell button press.
    #[serde(default = "default_event_type")]
    pub event_type: i32,
    #[serde(default = "default_max_events")]
    pub max_events_per_poll: u32,
    /// How far behind startup the first poll window reaches, to catch
    /// events emitted while the process was coming up.
    #[serde(default = "default_lookback")]
    pub startup_lookback_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryConfig {
    pub endpoint_url: String,
    #[serde(default = "default_delivery_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.wyzecam.com".to_string()
}

fn default_auth_url() -> String {
    "https://auth-prod.api.wyze.com".to_string()
}

fn default_polling_interval() -> u64 {
    5
}

fn default_event_type() -> i32 {
    2005
}

fn default_max_events() -> u32 {
    10
}

fn default_lookback() -> u64 {
    15
}

fn default_delivery_timeout() -> u64 {
    5
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("WYZE_BRIDGE").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.source.email.is_empty() || self.source.password.is_empty() {
            anyhow::bail!("Wyze email and password must be set");
        }
        if self.bridge.device_mac.is_empty() {
            anyhow::bail!("bridge.device_mac must be set");
        }
        Url::parse(&self.delivery.endpoint_url)
            .map_err(|e| anyhow::anyhow!("invalid delivery.endpoint_url: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bridge_contract() {
        assert_eq!(default_polling_interval(), 5);
        assert_eq!(default_event_type(), 2005);
        assert_eq!(default_max_events(), 10);
        assert_eq!(default_lookback(), 15);
        assert_eq!(default_delivery_timeout(), 5);
    }

    #[test]
    fn validate_rejects_bad_endpoint() {
        let config = Config {
            source: SourceConfig {
                email: "user@example.com".to_string(),
                password: "secret".to_string(),
                base_url: default_base_url(),
                auth_url: default_auth_url(),
            },
            bridge: BridgeConfig {
                device_mac: "AABBCCDDEEFF".to_string(),
                polling_interval_secs: 5,
                event_type: 2005,
                max_events_per_poll: 10,
                startup_lookback_secs: 15,
            },
            delivery: DeliveryConfig {
                endpoint_url: "not a url".to_string(),
                timeout_secs: 5,
            },
        };
        assert!(config.validate().is_err());
    }
}
