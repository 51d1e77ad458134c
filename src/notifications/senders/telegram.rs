use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{NotificationSender, SenderError};
use crate::notifications::message::format_lead_message;
use crate::store::LeadRecord;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl TelegramConfig {
    /// Returns `None` unless both credentials are present and non-empty.
    pub fn from_credentials(
        bot_token: Option<&str>,
        chat_id: Option<&str>,
        api_base: &str,
        timeout: Duration,
    ) -> Option<Self> {
        let bot_token = bot_token.map(str::trim).filter(|s| !s.is_empty())?;
        let chat_id = chat_id.map(str::trim).filter(|s| !s.is_empty())?;
        Some(Self {
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

/// A sender for pushing lead notifications via the Telegram Bot API.
pub struct TelegramSender {
    client: Client,
    config: TelegramConfig,
}

#[derive(Serialize)]
struct TelegramMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

impl TelegramSender {
    pub fn new(config: TelegramConfig) -> Result<Self, SenderError> {
        if !config.api_base.starts_with("http://") && !config.api_base.starts_with("https://") {
            return Err(SenderError::InvalidConfiguration(format!(
                "Telegram API base must be an http(s) URL, got: {}",
                config.api_base
            )));
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_base, self.config.bot_token
        )
    }
}

#[async_trait]
impl NotificationSender for TelegramSender {
    fn channel(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, record: &LeadRecord) -> Result<(), SenderError> {
        let text = format_lead_message(record);
        let payload = TelegramMessage {
            chat_id: &self.config.chat_id,
            text: &text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(SenderError::SendFailed(format!(
                "Telegram API returned non-success status: {status}. Body: {error_body}"
            )));
        }

        Ok(())
    }
}
