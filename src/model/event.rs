use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::{self, DEFAULT_COLOR, DEFAULT_TITLE, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    /// Free-text clock label such as `"09:30"`; only used for ordering.
    pub time: Option<String>,
    pub color: String,
}

/// Payload for creating an event. `date` is `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewEvent {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Inclusive date bounds for event queries; `None` leaves a side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

impl NewEvent {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: Some(title.into()),
            date: Some(date.format("%Y-%m-%d").to_string()),
            ..Self::default()
        }
    }

    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Event {
    pub fn from_draft(draft: NewEvent) -> Result<Self, ValidationError> {
        let date_text = draft
            .date
            .ok_or_else(|| ValidationError::new("date is required"))?;
        Ok(Self {
            id: 0,
            title: validation::text_or_default(draft.title, DEFAULT_TITLE),
            description: validation::optional_text(draft.description),
            date: validation::parse_date("date", &date_text)?,
            time: validation::optional_text(draft.time),
            color: validation::text_or_default(draft.color, DEFAULT_COLOR),
        })
    }

    pub fn apply(&mut self, patch: EventPatch) -> Result<(), ValidationError> {
        // Parse first so a bad date leaves the record untouched.
        let date = match patch.date.as_deref() {
            Some(text) => Some(validation::parse_date("date", text)?),
            None => None,
        };
        if patch.title.is_some() {
            self.title = validation::require_text("title", patch.title)?;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = validation::optional_text(Some(description));
        }
        if let Some(time) = patch.time {
            self.time = validation::optional_text(Some(time));
        }
        if patch.color.is_some() {
            self.color = validation::text_or_default(patch.color, DEFAULT_COLOR);
        }
        Ok(())
    }
}
