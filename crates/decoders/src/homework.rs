use serde_json::Value;

use homework_common::types::{HomeworkRecord, HomeworkStatus};

use crate::SchemaError;
use crate::fields::FieldReader;

/// Decode the homework at `index` of the `homeworks` array.
///
/// `status` must be a string; its content is never rejected. Values outside
/// the known set decode to `HomeworkStatus::Unknown`.
pub fn decode_homework(value: &Value, index: usize) -> Result<HomeworkRecord, SchemaError> {
    let item = FieldReader::nested(value, format!("homeworks[{index}]"))?;

    let id = item.required_i64("id")?;
    let raw_status = item.required_str("status")?;
    let status = HomeworkStatus::from_raw(raw_status);
    if let HomeworkStatus::Unknown(_) = status {
        tracing::debug!(homework_id = id, status = raw_status, "Unrecognized homework status");
    }

    Ok(HomeworkRecord {
        id,
        status,
        homework_name: item.required_str("homework_name")?.to_string(),
        reviewer_comment: item.optional_str("reviewer_comment")?.map(String::from),
        lesson_name: item.required_str("lesson_name")?.to_string(),
        date_updated: item.optional_timestamp("date_updated")?,
    })
}
