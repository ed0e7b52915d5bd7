//! Error handling module

use thiserror::Error;

/// Upstream (Wyze API) failures. Any of these aborts the current poll cycle
/// before the watermark advances; the same window is retried next cycle.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {code}: {msg}")]
    Api { code: i32, msg: String },

    #[error("authentication failed: {0}")]
    Auth(String),
}

/// Downstream delivery failures. Swallowed per event; the cycle continues
/// and the watermark still advances.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned status {0}")]
    Status(u16),
}
