use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use super::types::{ApiResponse, SendMessage, Update};
use crate::errors::{BotError, Result};

/// Telegram Bot API client: long polling in, Markdown messages out.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: String,
}

impl TelegramClient {
    /// `poll_timeout` is the server-side long-poll window; the HTTP timeout
    /// is padded so the request outlives it.
    pub fn new(api_url: &str, bot_token: &str, poll_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(poll_timeout + Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), bot_token),
        })
    }

    async fn call<B: Serialize, T: DeserializeOwned>(&self, method: &str, body: &B) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BotError::Telegram(format!("{method}: {}", e.without_url())))?;

        let status = resp.status();
        let payload: ApiResponse<T> = resp
            .json()
            .await
            .map_err(|e| BotError::Telegram(format!("{method}: {status}: {}", e.without_url())))?;

        match payload.result {
            Some(result) if payload.ok => Ok(result),
            _ => Err(BotError::Telegram(format!(
                "{method}: {}",
                payload.description.unwrap_or_else(|| status.to_string())
            ))),
        }
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    /// Send a Markdown message. Failures are logged as warnings and returned.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let body = SendMessage {
            chat_id,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        };

        match self.call::<_, serde_json::Value>("sendMessage", &body).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(chat_id, error = %e, "Failed to send Telegram message");
                Err(e)
            }
        }
    }
}
