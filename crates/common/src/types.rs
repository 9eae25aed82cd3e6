use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unix timestamp used as the `from_date` of the next status request.
pub type Cursor = i64;

/// Review status of a submitted homework.
///
/// Unrecognized upstream values are kept in `Unknown` instead of failing the
/// whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Rejected,
    Reviewing,
    Unknown(String),
}

impl HomeworkStatus {
    /// Map a raw upstream status string to a variant.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "approved" => HomeworkStatus::Approved,
            "rejected" => HomeworkStatus::Rejected,
            "reviewing" => HomeworkStatus::Reviewing,
            other => HomeworkStatus::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HomeworkStatus::Approved => write!(f, "approved"),
            HomeworkStatus::Rejected => write!(f, "rejected"),
            HomeworkStatus::Reviewing => write!(f, "reviewing"),
            HomeworkStatus::Unknown(raw) => write!(f, "unknown({raw})"),
        }
    }
}

/// Field set a homework record was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    /// `id`, `status`, `homework_name`, `lesson_name` only.
    Legacy,
    /// Also carries `reviewer_comment` and/or `date_updated`.
    Extended,
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaVersion::Legacy => write!(f, "legacy"),
            SchemaVersion::Extended => write!(f, "extended"),
        }
    }
}

/// One reviewed submission, decoded from a status response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeworkRecord {
    pub id: i64,
    pub status: HomeworkStatus,
    pub homework_name: String,
    pub reviewer_comment: Option<String>,
    pub lesson_name: String,
    pub date_updated: Option<DateTime<Utc>>,
}

impl HomeworkRecord {
    pub fn schema_version(&self) -> SchemaVersion {
        if self.reviewer_comment.is_some() || self.date_updated.is_some() {
            SchemaVersion::Extended
        } else {
            SchemaVersion::Legacy
        }
    }
}

/// Decoded and validated response envelope of one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResult {
    /// Most recently updated first.
    pub homeworks: Vec<HomeworkRecord>,
    pub current_date: Option<Cursor>,
}

impl PollResult {
    /// The benign result returned when a poll fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The record a notification is sent for, if any.
    pub fn latest(&self) -> Option<&HomeworkRecord> {
        self.homeworks.first()
    }

    /// Cursor for the next poll: the returned `current_date`, or `previous`
    /// when the response carried none.
    pub fn next_cursor(&self, previous: Cursor) -> Cursor {
        self.current_date.unwrap_or(previous)
    }
}

/// Acknowledgment returned by the messaging transport after a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAck {
    pub message_id: i64,
    pub chat_id: String,
    pub sent_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(reviewer_comment: Option<&str>) -> HomeworkRecord {
        HomeworkRecord {
            id: 1,
            status: HomeworkStatus::Approved,
            homework_name: "hw".to_string(),
            reviewer_comment: reviewer_comment.map(String::from),
            lesson_name: "lesson".to_string(),
            date_updated: None,
        }
    }

    #[test]
    fn test_status_from_raw() {
        assert_eq!(HomeworkStatus::from_raw("approved"), HomeworkStatus::Approved);
        assert_eq!(HomeworkStatus::from_raw("rejected"), HomeworkStatus::Rejected);
        assert_eq!(HomeworkStatus::from_raw("reviewing"), HomeworkStatus::Reviewing);
        assert_eq!(
            HomeworkStatus::from_raw("Approved"),
            HomeworkStatus::Unknown("Approved".to_string())
        );
        assert_eq!(
            HomeworkStatus::from_raw(""),
            HomeworkStatus::Unknown(String::new())
        );
    }

    #[test]
    fn test_schema_version_follows_optional_fields() {
        assert_eq!(record(None).schema_version(), SchemaVersion::Legacy);
        assert_eq!(record(Some("ok")).schema_version(), SchemaVersion::Extended);
    }

    #[test]
    fn test_next_cursor_retains_previous_when_absent() {
        let empty = PollResult::empty();
        assert_eq!(empty.next_cursor(42), 42);

        let moved = PollResult {
            homeworks: vec![],
            current_date: Some(100),
        };
        assert_eq!(moved.next_cursor(42), 100);
    }
}
