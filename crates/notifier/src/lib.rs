//! Notification delivery to the configured chat.
//!
//! `Notifier` wraps a `MessageTransport` and keeps retrying a failed delivery,
//! waiting `RetryPolicy::delay` between attempts, until the transport reports
//! success. The whole process blocks while a delivery is retrying.

pub mod retry;
pub mod telegram;

use thiserror::Error;

use homework_common::traits::{MessageTransport, Sleeper};
use homework_common::types::DeliveryAck;

pub use crate::retry::RetryPolicy;

/// Returned only when the retry policy has an attempt ceiling.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Delivery failed after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// Delivers verdict messages with blocking retry.
pub struct Notifier<T, S> {
    transport: T,
    sleeper: S,
    policy: RetryPolicy,
}

impl<T, S> Notifier<T, S>
where
    T: MessageTransport,
    S: Sleeper,
{
    pub fn new(transport: T, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    /// Send `text`, retrying until the transport acknowledges it.
    pub async fn send(&self, text: &str) -> Result<DeliveryAck, DeliveryError> {
        tracing::info!("Sending notification");

        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);

            match self.transport.send_text(text).await {
                Ok(ack) => {
                    tracing::info!(
                        attempt,
                        message_id = ack.message_id,
                        chat_id = %ack.chat_id,
                        "Notification delivered"
                    );
                    return Ok(ack);
                }
                Err(e) if self.policy.should_retry(attempt) => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        retry_in_secs = self.policy.delay.as_secs(),
                        "Notification delivery failed, retrying"
                    );
                    self.sleeper.sleep(self.policy.delay).await;
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Notification delivery gave up");
                    return Err(DeliveryError::Exhausted {
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
            }
        }
    }
}
