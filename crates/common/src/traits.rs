//! Ports between the polling loop and its collaborators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::{Cursor, DeliveryAck, PollResult};

/// Source of homework status changes.
///
/// Implementations are fail-safe: a failed poll yields `PollResult::empty()`.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    async fn poll(&self, cursor: Cursor) -> PollResult;
}

/// Delivers text to the single configured recipient.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn send_text(&self, text: &str) -> Result<DeliveryAck, Self::Error>;
}

/// Waits between cycles and between delivery attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[async_trait]
impl<T: HomeworkSource + ?Sized> HomeworkSource for Arc<T> {
    async fn poll(&self, cursor: Cursor) -> PollResult {
        (**self).poll(cursor).await
    }
}

#[async_trait]
impl<T: MessageTransport + ?Sized> MessageTransport for Arc<T> {
    type Error = T::Error;

    async fn send_text(&self, text: &str) -> Result<DeliveryAck, Self::Error> {
        (**self).send_text(text).await
    }
}

#[async_trait]
impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}
