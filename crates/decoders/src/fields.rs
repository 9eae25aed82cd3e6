use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::SchemaError;

/// Typed access to the fields of one JSON object.
///
/// Errors carry the full path of the field (`homeworks[2].status`). An explicit
/// `null` is treated the same as an absent field.
pub struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> FieldReader<'a> {
    /// Reader for the top-level object, named `name` in errors.
    pub fn root(value: &'a Value, name: &str) -> Result<Self, SchemaError> {
        let fields = value
            .as_object()
            .ok_or_else(|| SchemaError::TypeMismatch(name.to_string(), "object"))?;
        Ok(Self {
            fields,
            prefix: String::new(),
        })
    }

    /// Reader for a nested object located at `path`.
    pub fn nested(value: &'a Value, path: String) -> Result<Self, SchemaError> {
        let fields = value
            .as_object()
            .ok_or_else(|| SchemaError::TypeMismatch(path.clone(), "object"))?;
        Ok(Self {
            fields,
            prefix: path,
        })
    }

    pub fn path(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", self.prefix, field)
        }
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    fn required(&self, field: &str) -> Result<&'a Value, SchemaError> {
        self.present(field)
            .ok_or_else(|| SchemaError::MissingField(self.path(field)))
    }

    pub fn required_array(&self, field: &str) -> Result<&'a Vec<Value>, SchemaError> {
        self.required(field)?
            .as_array()
            .ok_or_else(|| SchemaError::TypeMismatch(self.path(field), "array"))
    }

    pub fn required_i64(&self, field: &str) -> Result<i64, SchemaError> {
        self.required(field)?
            .as_i64()
            .ok_or_else(|| SchemaError::TypeMismatch(self.path(field), "integer"))
    }

    pub fn required_str(&self, field: &str) -> Result<&'a str, SchemaError> {
        self.required(field)?
            .as_str()
            .ok_or_else(|| SchemaError::TypeMismatch(self.path(field), "string"))
    }

    pub fn optional_i64(&self, field: &str) -> Result<Option<i64>, SchemaError> {
        self.present(field)
            .map(|v| {
                v.as_i64()
                    .ok_or_else(|| SchemaError::TypeMismatch(self.path(field), "integer"))
            })
            .transpose()
    }

    pub fn optional_str(&self, field: &str) -> Result<Option<&'a str>, SchemaError> {
        self.present(field)
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| SchemaError::TypeMismatch(self.path(field), "string"))
            })
            .transpose()
    }

    /// RFC 3339 timestamp, e.g. `2020-02-13T16:42:47Z`. A timestamp without
    /// an offset (`2020-02-13T16:42:47`) is read as UTC.
    pub fn optional_timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>, SchemaError> {
        let Some(raw) = self.optional_str(field)? else {
            return Ok(None);
        };
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(ts.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Some(naive.and_utc()))
            .map_err(|_| SchemaError::TypeMismatch(self.path(field), "RFC 3339 timestamp"))
    }
}
