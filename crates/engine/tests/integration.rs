//! Integration tests for the polling cycle.
//!
//! The status source, the messaging transport and the sleeper are in-memory
//! fakes, so cycles run instantly and every request and message is observable.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use homework_common::traits::{HomeworkSource, MessageTransport, Sleeper};
use homework_common::types::{Cursor, DeliveryAck, HomeworkRecord, HomeworkStatus, PollResult};
use homework_engine::watcher::HomeworkWatcher;
use homework_notifier::{Notifier, RetryPolicy};

// ============================================================
// Fakes
// ============================================================

/// Replays scripted poll results and records the cursor of every request.
/// Once the script runs out it behaves like a failed poll.
#[derive(Default)]
struct ScriptedSource {
    script: Mutex<VecDeque<PollResult>>,
    requested: Mutex<Vec<Cursor>>,
}

impl ScriptedSource {
    fn new(script: Vec<PollResult>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<Cursor> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HomeworkSource for ScriptedSource {
    async fn poll(&self, cursor: Cursor) -> PollResult {
        self.requested.lock().unwrap().push(cursor);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(PollResult::empty)
    }
}

/// Records sent messages; fails the first `failures` sends.
#[derive(Default)]
struct RecordingTransport {
    failures: u32,
    attempts: Mutex<u32>,
    sent: Mutex<Vec<String>>,
}

impl RecordingTransport {
    fn failing(failures: u32) -> Self {
        Self {
            failures,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    type Error = io::Error;

    async fn send_text(&self, text: &str) -> Result<DeliveryAck, io::Error> {
        let mut attempts = self.attempts.lock().unwrap();
        *attempts += 1;
        if *attempts <= self.failures {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "telegram down"));
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(text.to_string());
        Ok(DeliveryAck {
            message_id: sent.len() as i64,
            chat_id: "777".to_string(),
            sent_at: Utc::now(),
        })
    }
}

#[derive(Clone, Default)]
struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

// ============================================================
// Helpers
// ============================================================

type TestWatcher = HomeworkWatcher<Arc<ScriptedSource>, Arc<RecordingTransport>, RecordingSleeper>;

struct Harness {
    watcher: TestWatcher,
    source: Arc<ScriptedSource>,
    transport: Arc<RecordingTransport>,
    sleeper: RecordingSleeper,
}

fn harness(script: Vec<PollResult>, transport: RecordingTransport, policy: RetryPolicy) -> Harness {
    let source = Arc::new(ScriptedSource::new(script));
    let transport = Arc::new(transport);
    let sleeper = RecordingSleeper::default();

    let notifier = Notifier::new(transport.clone(), sleeper.clone(), policy);
    let watcher = HomeworkWatcher::new(
        source.clone(),
        notifier,
        sleeper.clone(),
        Duration::from_secs(300),
    );

    Harness {
        watcher,
        source,
        transport,
        sleeper,
    }
}

fn homework(id: i64, status: HomeworkStatus, name: &str) -> HomeworkRecord {
    HomeworkRecord {
        id,
        status,
        homework_name: name.to_string(),
        reviewer_comment: None,
        lesson_name: "Итоговый проект".to_string(),
        date_updated: None,
    }
}

fn poll(homeworks: Vec<HomeworkRecord>, current_date: Option<Cursor>) -> PollResult {
    PollResult {
        homeworks,
        current_date,
    }
}

// ============================================================
// Cycle behavior
// ============================================================

#[tokio::test]
async fn test_cycle_notifies_and_advances_cursor() {
    let h = harness(
        vec![poll(
            vec![homework(1, HomeworkStatus::Approved, "Spec")],
            Some(2_000),
        )],
        RecordingTransport::default(),
        RetryPolicy::default(),
    );

    let outcome = h.watcher.run_cycle(1_000).await;

    assert_eq!(outcome.cursor, 2_000);
    assert_eq!(outcome.delivered.map(|ack| ack.message_id), Some(1));
    assert_eq!(h.source.requested(), vec![1_000]);

    let sent = h.transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("У вас проверили работу \"Spec\"!"));
    assert!(sent[0].contains("можно приступать к следующему уроку"));
}

#[tokio::test]
async fn test_only_latest_homework_is_notified() {
    let h = harness(
        vec![poll(
            vec![
                homework(2, HomeworkStatus::Rejected, "newest.zip"),
                homework(1, HomeworkStatus::Approved, "older.zip"),
            ],
            Some(2_000),
        )],
        RecordingTransport::default(),
        RetryPolicy::default(),
    );

    h.watcher.run_cycle(1_000).await;

    assert_eq!(
        h.transport.sent(),
        vec!["У вас проверили работу \"newest.zip\"!\n\nК сожалению в работе нашлись ошибки."]
    );
}

#[tokio::test]
async fn test_cursor_forwarded_even_without_homeworks() {
    let h = harness(
        vec![poll(vec![], Some(1_500)), poll(vec![], Some(1_800))],
        RecordingTransport::default(),
        RetryPolicy::default(),
    );

    let first = h.watcher.run_cycle(1_000).await;
    let second = h.watcher.run_cycle(first.cursor).await;

    assert_eq!(h.source.requested(), vec![1_000, 1_500]);
    assert_eq!(second.cursor, 1_800);
    assert!(h.transport.sent().is_empty());
}

#[tokio::test]
async fn test_failed_polls_keep_cursor_and_stay_silent() {
    // Empty script: every poll degrades to the empty result.
    let h = harness(vec![], RecordingTransport::default(), RetryPolicy::default());

    let first = h.watcher.run_cycle(1_000).await;
    let second = h.watcher.run_cycle(first.cursor).await;

    assert_eq!(first.cursor, 1_000);
    assert_eq!(second.cursor, 1_000);
    assert_eq!(h.source.requested(), vec![1_000, 1_000]);
    assert!(h.transport.sent().is_empty());
    assert!(second.delivered.is_none());
}

#[tokio::test]
async fn test_homeworks_without_cursor_keep_previous() {
    let h = harness(
        vec![poll(vec![homework(5, HomeworkStatus::Reviewing, "hw.zip")], None)],
        RecordingTransport::default(),
        RetryPolicy::default(),
    );

    let outcome = h.watcher.run_cycle(1_000).await;

    assert_eq!(outcome.cursor, 1_000);
    assert_eq!(h.transport.sent(), vec!["Работа hw.zip взята на проверку."]);
}

#[tokio::test]
async fn test_unknown_status_sends_fallback() {
    let h = harness(
        vec![poll(
            vec![homework(
                2,
                HomeworkStatus::Unknown("pending_review".to_string()),
                "hw.zip",
            )],
            Some(2_000),
        )],
        RecordingTransport::default(),
        RetryPolicy::default(),
    );

    h.watcher.run_cycle(1_000).await;

    assert_eq!(
        h.transport.sent(),
        vec!["Статус работы изменился. Ответ содержит неизвестный статус"]
    );
}

// ============================================================
// Delivery retry inside a cycle
// ============================================================

#[tokio::test]
async fn test_cycle_blocks_until_delivery_succeeds() {
    let h = harness(
        vec![poll(
            vec![homework(1, HomeworkStatus::Approved, "Spec")],
            Some(2_000),
        )],
        RecordingTransport::failing(2),
        RetryPolicy::default(),
    );

    let outcome = h.watcher.run_cycle(1_000).await;

    assert!(outcome.delivered.is_some());
    assert_eq!(h.transport.sent().len(), 1);
    assert_eq!(
        h.sleeper.slept(),
        vec![Duration::from_secs(30), Duration::from_secs(30)]
    );
}

#[tokio::test]
async fn test_exhausted_delivery_still_advances_cursor() {
    let h = harness(
        vec![poll(
            vec![homework(1, HomeworkStatus::Approved, "Spec")],
            Some(2_000),
        )],
        RecordingTransport::failing(5),
        RetryPolicy::unlimited(Duration::from_secs(1)).with_max_attempts(Some(2)),
    );

    let outcome = h.watcher.run_cycle(1_000).await;

    assert_eq!(outcome.cursor, 2_000);
    assert!(outcome.delivered.is_none());
    assert!(h.transport.sent().is_empty());
}
