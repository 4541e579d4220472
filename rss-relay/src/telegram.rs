use crate::traits::Notifier;
use crate::types::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

const SEND_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            chat_id: None,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl TelegramConfig {
    /// Token and chat id, or the name of the first one that is missing.
    fn credentials(&self) -> Result<(&str, &str)> {
        let token = non_empty(self.bot_token.as_deref())
            .ok_or(RelayError::ConfigMissing("TELEGRAM_BOT_TOKEN"))?;
        let chat_id = non_empty(self.chat_id.as_deref())
            .ok_or(RelayError::ConfigMissing("TELEGRAM_CHANNEL_ID"))?;
        Ok((token, chat_id))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Serialize)]
pub struct SendMessageBody<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'static str,
    pub disable_web_page_preview: bool,
}

impl<'a> SendMessageBody<'a> {
    pub fn markdown(chat_id: &'a str, text: &'a str) -> Self {
        Self {
            chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        }
    }
}

/// Sends messages through the Telegram Bot API `sendMessage` method, pausing
/// for `send_delay` after every attempt to stay under the chat rate limit.
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
    send_delay: Duration,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig, send_delay: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            config,
            send_delay,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.credentials().is_ok()
    }

    pub async fn send(&self, text: &str) -> Result<()> {
        let (token, chat_id) = self.config.credentials()?;
        let endpoint = Url::parse(&format!(
            "{}/bot{}/sendMessage",
            self.config.api_base.trim_end_matches('/'),
            token
        ))?;

        let response = self
            .client
            .post(endpoint)
            .json(&SendMessageBody::markdown(chat_id, text))
            .send()
            .await
            // The request URL embeds the bot token.
            .map_err(|e| RelayError::DeliveryFailed(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::DeliveryFailed(format!(
                "Telegram API error {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RelayError::DeliveryFailed(e.without_url().to_string()))?;
        if !json.get("ok").and_then(|v| v.as_bool()).unwrap_or(false) {
            let description = json
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            return Err(RelayError::DeliveryFailed(format!(
                "Telegram API error: {}",
                description
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, text: &str) {
        match self.send(text).await {
            Ok(()) => info!("Message successfully sent to Telegram."),
            Err(RelayError::ConfigMissing(name)) => {
                warn!("{} is not set; skipping Telegram message", name);
                return;
            }
            Err(e) => error!("Error sending message to Telegram: {}", e),
        }

        debug!("Waiting {:?} before the next message", self.send_delay);
        tokio::time::sleep(self.send_delay).await;
    }
}
