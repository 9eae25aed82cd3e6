//! Verdict formatting — turns a homework status into the chat message.
//!
//! The template table is closed. Any status outside it degrades to a fixed
//! fallback text instead of an error.

use homework_common::types::{HomeworkRecord, HomeworkStatus};

const APPROVED_TEMPLATE: &str = "У вас проверили работу \"{name}\"!\n\n\
     Ревьюеру всё понравилось, можно приступать к следующему уроку.";
const REJECTED_TEMPLATE: &str =
    "У вас проверили работу \"{name}\"!\n\nК сожалению в работе нашлись ошибки.";
const REVIEWING_TEMPLATE: &str = "Работа {name} взята на проверку.";

/// Message sent when the status is not in the table.
pub const UNKNOWN_STATUS_MESSAGE: &str =
    "Статус работы изменился. Ответ содержит неизвестный статус";

/// Outcome of looking a status up in the template table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Rejected,
    Reviewing,
    Unknown,
}

impl Verdict {
    pub fn for_status(status: &HomeworkStatus) -> Self {
        match status {
            HomeworkStatus::Approved => Verdict::Approved,
            HomeworkStatus::Rejected => Verdict::Rejected,
            HomeworkStatus::Reviewing => Verdict::Reviewing,
            HomeworkStatus::Unknown(_) => Verdict::Unknown,
        }
    }

    /// Render the message for a homework called `homework_name`.
    pub fn render(self, homework_name: &str) -> String {
        let template = match self {
            Verdict::Approved => APPROVED_TEMPLATE,
            Verdict::Rejected => REJECTED_TEMPLATE,
            Verdict::Reviewing => REVIEWING_TEMPLATE,
            Verdict::Unknown => return UNKNOWN_STATUS_MESSAGE.to_string(),
        };
        template.replace("{name}", homework_name)
    }
}

/// Format the notification text for one homework record.
pub fn format_verdict(record: &HomeworkRecord) -> String {
    Verdict::for_status(&record.status).render(&record.homework_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: HomeworkStatus, homework_name: &str) -> HomeworkRecord {
        HomeworkRecord {
            id: 1,
            status,
            homework_name: homework_name.to_string(),
            reviewer_comment: None,
            lesson_name: String::new(),
            date_updated: None,
        }
    }

    #[test]
    fn test_approved_message() {
        let message = format_verdict(&record(HomeworkStatus::Approved, "Spec"));
        assert_eq!(
            message,
            "У вас проверили работу \"Spec\"!\n\n\
             Ревьюеру всё понравилось, можно приступать к следующему уроку."
        );
        assert!(message.starts_with("У вас проверили работу \"Spec\"!"));
        assert!(message.contains("можно приступать к следующему уроку"));
    }

    #[test]
    fn test_rejected_message() {
        assert_eq!(
            format_verdict(&record(HomeworkStatus::Rejected, "hw05_final.zip")),
            "У вас проверили работу \"hw05_final.zip\"!\n\nК сожалению в работе нашлись ошибки."
        );
    }

    #[test]
    fn test_reviewing_message() {
        assert_eq!(
            format_verdict(&record(HomeworkStatus::Reviewing, "hw05_final.zip")),
            "Работа hw05_final.zip взята на проверку."
        );
    }

    #[test]
    fn test_unknown_status_falls_back() {
        for raw in ["pending_review", "", "APPROVED"] {
            let message =
                format_verdict(&record(HomeworkStatus::Unknown(raw.to_string()), "Spec"));
            assert_eq!(
                message,
                "Статус работы изменился. Ответ содержит неизвестный статус"
            );
        }
    }

    #[test]
    fn test_name_inserted_verbatim() {
        let message = format_verdict(&record(HomeworkStatus::Reviewing, "{name} & \"quotes\""));
        assert_eq!(message, "Работа {name} & \"quotes\" взята на проверку.");
    }
}
