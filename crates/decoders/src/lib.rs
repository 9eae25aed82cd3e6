//! Validation of the homework status response.
//!
//! Turns the raw JSON body into a typed `PollResult` or a `SchemaError`
//! naming the offending field. Unknown status strings are not an error.

pub mod fields;
pub mod homework;


use serde_json::Value;
use thiserror::Error;

use homework_common::types::PollResult;

use crate::fields::FieldReader;

/// Why a response body could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("field `{0}` has the wrong type, expected {1}")]
    TypeMismatch(String, &'static str),
}

/// Decode a full status response.
pub fn decode_poll_result(body: &Value) -> Result<PollResult, SchemaError> {
    let root = FieldReader::root(body, "response")?;

    let items = root.required_array("homeworks")?;
    let mut homeworks = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        homeworks.push(homework::decode_homework(item, index)?);
    }

    let current_date = root.optional_i64("current_date")?;

    tracing::debug!(
        homeworks = homeworks.len(),
        current_date = ?current_date,
        "Decoded status response"
    );

    Ok(PollResult {
        homeworks,
        current_date,
    })
}
