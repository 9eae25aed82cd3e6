//! Telegram Bot API transport.
//!
//! Sends plain-text messages to one fixed chat. The bot token is part of every
//! request URL, so request errors are stripped of their URL before they are
//! returned or logged.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use homework_common::error::InitError;
use homework_common::traits::MessageTransport;
use homework_common::types::DeliveryAck;

/// Failure of a single Bot API call.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("Malformed Telegram response: {0}")]
    Malformed(String),
}

/// Envelope shared by every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BotUser {
    id: i64,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
    date: i64,
    chat: Chat,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

/// Client bound to one bot token and one recipient chat.
pub struct TelegramTransport {
    client: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramTransport {
    /// Build the client and verify the token with `getMe`.
    ///
    /// Failures here are not retried by the caller.
    pub async fn connect(
        api_url: &str,
        token: &str,
        chat_id: &str,
        timeout: Duration,
    ) -> Result<Self, InitError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InitError::Client(e.without_url().to_string()))?;

        let transport = Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        };

        let bot = transport.get_me().await?;
        tracing::info!(
            bot_id = bot.id,
            username = bot.username.as_deref().unwrap_or("<none>"),
            "Telegram bot authenticated"
        );

        Ok(transport)
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    async fn get_me(&self) -> Result<BotUser, InitError> {
        let response = self
            .client
            .get(self.method_url("getMe"))
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                if e.is_connect() || e.is_timeout() {
                    InitError::Unreachable(e.to_string())
                } else {
                    InitError::Client(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND {
            return Err(InitError::InvalidCredential(format!(
                "bot token rejected with HTTP {status}"
            )));
        }

        let body: ApiResponse<BotUser> = response
            .json()
            .await
            .map_err(|e| InitError::Client(e.without_url().to_string()))?;

        match body {
            ApiResponse {
                ok: true,
                result: Some(user),
                ..
            } => Ok(user),
            other => Err(InitError::Client(format!(
                "getMe failed with HTTP {status}: {}",
                other.description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    type Error = TelegramError;

    async fn send_text(&self, text: &str) -> Result<DeliveryAck, TelegramError> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let body: ApiResponse<SentMessage> = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !body.ok {
            return Err(TelegramError::Api {
                code: body.error_code.unwrap_or(i64::from(status.as_u16())),
                description: body
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        let message = body
            .result
            .ok_or_else(|| TelegramError::Malformed("`result` missing on success".to_string()))?;

        Ok(DeliveryAck {
            message_id: message.message_id,
            chat_id: message.chat.id.to_string(),
            sent_at: Utc
                .timestamp_opt(message.date, 0)
                .single()
                .unwrap_or_else(Utc::now),
        })
    }
}
