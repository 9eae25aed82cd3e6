//! Main polling loop.
//!
//! Each cycle polls with the current cursor, notifies about the most recently
//! updated homework (if any), and returns the cursor for the next cycle. The
//! cursor is the only state carried between cycles and lives in the caller.

use std::time::Duration;

use homework_common::traits::{HomeworkSource, MessageTransport, Sleeper};
use homework_common::types::{Cursor, DeliveryAck};
use homework_notifier::Notifier;

use crate::verdict::format_verdict;

/// Result of one polling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Cursor to poll with next.
    pub cursor: Cursor,
    /// Acknowledgment of the notification sent this cycle.
    pub delivered: Option<DeliveryAck>,
}

/// Wires the status source, the verdict formatter and the notifier together.
pub struct HomeworkWatcher<P, T, S> {
    source: P,
    notifier: Notifier<T, S>,
    sleeper: S,
    poll_interval: Duration,
}

impl<P, T, S> HomeworkWatcher<P, T, S>
where
    P: HomeworkSource,
    T: MessageTransport,
    S: Sleeper,
{
    pub fn new(source: P, notifier: Notifier<T, S>, sleeper: S, poll_interval: Duration) -> Self {
        Self {
            source,
            notifier,
            sleeper,
            poll_interval,
        }
    }

    /// Run one poll → format → notify cycle.
    pub async fn run_cycle(&self, cursor: Cursor) -> CycleOutcome {
        let result = self.source.poll(cursor).await;

        let delivered = match result.latest() {
            Some(record) => {
                tracing::info!(
                    homework_id = record.id,
                    homework = %record.homework_name,
                    status = %record.status,
                    "Homework status changed"
                );
                tracing::debug!(
                    homework_id = record.id,
                    lesson = %record.lesson_name,
                    schema = %record.schema_version(),
                    reviewer_comment = record.reviewer_comment.as_deref().unwrap_or(""),
                    "Homework details"
                );

                let message = format_verdict(record);
                match self.notifier.send(&message).await {
                    Ok(ack) => Some(ack),
                    Err(e) => {
                        tracing::error!(
                            homework_id = record.id,
                            error = %e,
                            "Notification dropped"
                        );
                        None
                    }
                }
            }
            None => {
                tracing::debug!(cursor, "No homework updates");
                None
            }
        };

        let next = result.next_cursor(cursor);
        if next != cursor {
            tracing::info!(from = cursor, to = next, "Cursor advanced");
        }

        CycleOutcome {
            cursor: next,
            delivered,
        }
    }

    /// Poll forever, sleeping `poll_interval` between cycles.
    pub async fn run(&self, start: Cursor) {
        tracing::info!(
            cursor = start,
            poll_interval_secs = self.poll_interval.as_secs(),
            "Homework watcher started"
        );

        let mut cursor = start;
        loop {
            cursor = self.run_cycle(cursor).await.cursor;
            self.sleeper.sleep(self.poll_interval).await;
        }
    }
}
