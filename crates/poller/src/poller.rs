use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use thiserror::Error;

use homework_common::error::InitError;
use homework_common::traits::HomeworkSource;
use homework_common::types::{Cursor, PollResult};
use homework_decoders::{SchemaError, decode_poll_result};

/// Longest slice of an error body kept in diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Why a single status poll produced no usable result.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response failed validation: {0}")]
    Schema(#[from] SchemaError),
}

impl PollError {
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Transport(_) => "transport",
            PollError::Status { .. } => "http_status",
            PollError::Json(_) => "json",
            PollError::Schema(_) => "schema",
        }
    }
}

/// Polls the homework status endpoint with an OAuth token.
pub struct StatusPoller {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl StatusPoller {
    /// `timeout` bounds every request, connect included.
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self, InitError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InitError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }

    /// Request changes since `cursor` and validate the response.
    pub async fn fetch(&self, cursor: Cursor) -> Result<PollResult, PollError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("from_date", cursor)])
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PollError::Status {
                status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(decode_poll_result(&value)?)
    }
}

#[async_trait]
impl HomeworkSource for StatusPoller {
    /// Never fails: any error is logged and yields an empty result, so the
    /// caller keeps its cursor and tries again next cycle.
    async fn poll(&self, cursor: Cursor) -> PollResult {
        tracing::debug!(cursor, "Polling homework statuses");

        match self.fetch(cursor).await {
            Ok(result) => result,
            Err(e @ (PollError::Transport(_) | PollError::Status { .. })) => {
                tracing::warn!(cursor, kind = e.kind(), error = %e, "Status poll failed");
                PollResult::empty()
            }
            Err(e) => {
                tracing::error!(
                    cursor,
                    kind = e.kind(),
                    error = %e,
                    "Status response rejected"
                );
                PollResult::empty()
            }
        }
    }
}
