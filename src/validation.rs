use chrono::NaiveDate;
use thiserror::Error;

pub const DEFAULT_COLOR: &str = "primary";
pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_POMODORO_MINUTES: u32 = 25;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn require_text(field: &str, value: Option<String>) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationError::new(format!("{field} must not be empty"))),
    }
}

/// Blank or missing text falls back to `default`.
pub fn text_or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => default.to_string(),
    }
}

pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

pub fn positive_minutes(value: Option<i64>) -> Result<u32, ValidationError> {
    let minutes = value.unwrap_or(i64::from(DEFAULT_POMODORO_MINUTES));
    if minutes <= 0 {
        return Err(ValidationError::new(format!(
            "duration must be a positive number of minutes (got {minutes})"
        )));
    }
    u32::try_from(minutes)
        .map_err(|_| ValidationError::new(format!("duration {minutes} is too large")))
}

pub fn parse_date(field: &str, input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|err| {
        ValidationError::new(format!(
            "{field} '{input}' is not a valid YYYY-MM-DD date: {err}"
        ))
    })
}

pub fn parse_optional_date(
    field: &str,
    input: Option<&str>,
) -> Result<Option<NaiveDate>, ValidationError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(field, text).map(Some),
    }
}
