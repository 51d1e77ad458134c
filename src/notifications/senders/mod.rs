use async_trait::async_trait;
use thiserror::Error;

use crate::store::LeadRecord;

pub mod telegram;

#[derive(Error, Debug)]
pub enum SenderError {
    #[error("Failed to send notification: {0}")]
    SendFailed(String),
    #[error("Invalid configuration for sender: {0}")]
    InvalidConfiguration(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Delivers a new-lead notification to one staff-facing channel.
///
/// Implementations make a single attempt; the caller decides what to do with
/// failures (the dispatcher only logs them).
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Short channel name used in log fields.
    fn channel(&self) -> &'static str;

    async fn send(&self, record: &LeadRecord) -> Result<(), SenderError>;
}
