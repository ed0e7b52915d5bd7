//! Wyze cloud API client
//!
//! Logs in once at startup (fatal if that fails), keeps the access token
//! cached behind a lock, and refreshes it via the refresh token shortly
//! before expiry.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::bridge::PollWindow;
use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::models::DeviceEvent;
use crate::source::EventSource;

/// Tokens refresh this many seconds before their reported expiry.
const TOKEN_REFRESH_MARGIN_SECS: u64 = 60;
const DEFAULT_TOKEN_TTL_SECS: i64 = 7200;

#[derive(Debug, Clone)]
struct TokenInfo {
    access_token: String,
    refresh_token: String,
    expires_at: Instant,
}

pub struct WyzeClient {
    http_client: Client,
    base_url: String,
    token: RwLock<TokenInfo>,
}

#[derive(Debug, Deserialize)]
struct LoginResult {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Envelope used by the event API; code 1 means success.
#[derive(Debug, Deserialize)]
struct WyzeResponse<T> {
    code: i32,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct RefreshResult {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct EventListResult {
    #[serde(default)]
    event_list: Vec<DeviceEvent>,
}

impl WyzeClient {
    /// Authenticate with email/password. The process must not start the poll
    /// loop without a working client, so any failure here is fatal upstream.
    pub async fn login(config: &SourceConfig) -> Result<Self, SourceError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        let url = format!("{}/api/user/login", config.auth_url);
        let body = serde_json::json!({
            "email": config.email,
            "password": config.password,
        });

        let resp = http_client.post(&url).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::Auth(format!(
                "login returned status {}",
                resp.status()
            )));
        }

        let result: LoginResult = resp
            .json()
            .await
            .map_err(|e| SourceError::Auth(format!("login parse failed: {}", e)))?;

        let expires_in = result.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        tracing::info!("[Wyze] Logged in, token expires in {} sec", expires_in);

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            token: RwLock::new(TokenInfo {
                access_token: result.access_token,
                refresh_token: result.refresh_token,
                expires_at: token_deadline(expires_in),
            }),
        })
    }

    async fn ensure_token(&self) -> Result<String, SourceError> {
        {
            let token = self.token.read().await;
            if token.expires_at > Instant::now() {
                return Ok(token.access_token.clone());
            }
        }
        self.refresh_token().await
    }

    async fn refresh_token(&self) -> Result<String, SourceError> {
        let refresh_token = self.token.read().await.refresh_token.clone();

        let url = format!("{}/app/user/refresh_token", self.base_url);
        let body = serde_json::json!({ "refresh_token": refresh_token });

        let resp = self.http_client.post(&url).json(&body).send().await?;
        let result: WyzeResponse<RefreshResult> = resp
            .json()
            .await
            .map_err(|e| SourceError::Auth(format!("refresh parse failed: {}", e)))?;

        if result.code != 1 {
            return Err(SourceError::Auth(format!(
                "refresh rejected (code {}): {}",
                result.code,
                result.msg.unwrap_or_default()
            )));
        }

        let refreshed = result
            .data
            .ok_or_else(|| SourceError::Auth("refresh response missing data".to_string()))?;
        let expires_in = refreshed.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        let mut token = self.token.write().await;
        *token = TokenInfo {
            access_token: refreshed.access_token.clone(),
            refresh_token: refreshed.refresh_token,
            expires_at: token_deadline(expires_in),
        };

        tracing::info!("[Wyze] Token refreshed, expires in {} sec", expires_in);
        Ok(refreshed.access_token)
    }
}

fn token_deadline(expires_in: i64) -> Instant {
    let ttl = (expires_in.max(0) as u64).saturating_sub(TOKEN_REFRESH_MARGIN_SECS);
    Instant::now() + Duration::from_secs(ttl)
}

#[async_trait]
impl EventSource for WyzeClient {
    async fn events_in_window(
        &self,
        device_mac: &str,
        window: PollWindow,
        max_count: u32,
    ) -> Result<Vec<DeviceEvent>, SourceError> {
        let token = self.ensure_token().await?;

        let url = format!("{}/app/v2/device/get_event_list", self.base_url);
        let body = serde_json::json!({
            "device_mac_list": [device_mac],
            "begin_time": window.start.timestamp_millis(),
            "end_time": window.end.timestamp_millis(),
            "count": max_count,
        });

        let resp = self
            .http_client
            .post(&url)
            .header("Authorization", token)
            .json(&body)
            .send()
            .await?;

        let result: WyzeResponse<EventListResult> = resp.json().await?;

        if result.code != 1 {
            return Err(SourceError::Api {
                code: result.code,
                msg: result.msg.unwrap_or_default(),
            });
        }

        Ok(result.data.map(|d| d.event_list).unwrap_or_default())
    }
}
