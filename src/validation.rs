//! Write-time schema for todo records.
//!
//! Request bodies arrive as loosely shaped JSON. [`TodoFields::from_json`]
//! casts them into a typed partial field set, and [`validate_for_write`]
//! enforces that a new record carries every required field. Both run before
//! any storage call, so a rejected write never persists anything.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use serde_json::{Map, Value};

pub const CONTENT: &str = "content";
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const DATE: &str = "date";

const BODY: &str = "body";

/// Caller-supplied todo fields, any of which may be absent.
///
/// Used as-is for partial updates; [`validate_for_write`] turns it into a
/// [`NewTodo`] for creates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFields {
    pub content: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTimeWithTimeZone>,
}

/// A complete set of caller-supplied fields for a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub content: String,
    pub title: String,
    pub description: String,
    pub date: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    Cast {
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl FieldError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Required,
        }
    }

    fn cast(field: &'static str, expected: &'static str, value: &Value) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Cast {
                expected,
                value: describe_value(value),
            },
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field;
        match &self.kind {
            FieldErrorKind::Required => write!(f, "{field}: Path `{field}` is required."),
            FieldErrorKind::Cast { expected, value } => write!(
                f,
                "{field}: Cast to {expected} failed for value {value} at path \"{field}\""
            ),
        }
    }
}

/// One or more fields failed the write-time schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Todo validation failed: {}", join_errors(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.errors.iter().map(|error| error.field)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl TodoFields {
    /// Casts a JSON request body into typed fields.
    ///
    /// Keys outside the schema are dropped. `null` or an empty string for a
    /// schema field is a required-field violation; a value that cannot be cast
    /// to the field's type is a cast error. Every offending field is reported.
    pub fn from_json(body: Value) -> Result<Self, ValidationError> {
        let map = match body {
            Value::Object(map) => map,
            other => {
                return Err(ValidationError {
                    errors: vec![FieldError::cast(BODY, "object", &other)],
                });
            }
        };

        let mut errors = Vec::new();
        let fields = Self {
            content: cast_field(&map, CONTENT, cast_text, &mut errors),
            title: cast_field(&map, TITLE, cast_text, &mut errors),
            description: cast_field(&map, DESCRIPTION, cast_text, &mut errors),
            date: cast_field(&map, DATE, cast_date, &mut errors),
        };

        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(ValidationError { errors })
        }
    }
}

/// Accepts `fields` as a new record only if every required field is present.
pub fn validate_for_write(fields: TodoFields) -> Result<NewTodo, ValidationError> {
    let TodoFields {
        content,
        title,
        description,
        date,
    } = fields;

    let mut errors = Vec::new();
    for (field, present) in [
        (CONTENT, content.is_some()),
        (TITLE, title.is_some()),
        (DESCRIPTION, description.is_some()),
        (DATE, date.is_some()),
    ] {
        if !present {
            errors.push(FieldError::required(field));
        }
    }

    match (content, title, description, date) {
        (Some(content), Some(title), Some(description), Some(date)) => Ok(NewTodo {
            content,
            title,
            description,
            date,
        }),
        _ => Err(ValidationError { errors }),
    }
}

fn cast_field<T>(
    map: &Map<String, Value>,
    field: &'static str,
    cast: fn(&'static str, &Value) -> Result<T, FieldError>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let value = map.get(field)?;
    if value.is_null() || value.as_str() == Some("") {
        errors.push(FieldError::required(field));
        return None;
    }
    match cast(field, value) {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}

fn cast_text(field: &'static str, value: &Value) -> Result<String, FieldError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(FieldError::cast(field, "string", value)),
    }
}

fn cast_date(field: &'static str, value: &Value) -> Result<DateTimeWithTimeZone, FieldError> {
    let parsed = match value {
        Value::String(text) => parse_date_str(text.trim()),
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|ms| ms.is_finite()).map(|ms| ms as i64))
            .and_then(DateTime::from_timestamp_millis)
            .map(|ts| ts.fixed_offset()),
        _ => None,
    };
    parsed.ok_or_else(|| FieldError::cast(field, "date", value))
}

fn parse_date_str(text: &str) -> Option<DateTimeWithTimeZone> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc2822(text) {
        return Some(ts);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc().fixed_offset())
}

fn describe_value(value: &Value) -> String {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("{value} (type {kind})")
}
