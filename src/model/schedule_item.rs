use serde::{Deserialize, Serialize};

use crate::validation::{self, DEFAULT_COLOR, ValidationError};

/// A recurring daily slot, ordered by its `time` label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: i64,
    pub title: String,
    pub time: String,
    pub description: Option<String>,
    pub color: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewScheduleItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleItemPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewScheduleItem {
    pub fn new(title: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            time: Some(time.into()),
            description: None,
            color: None,
        }
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

impl ScheduleItem {
    pub fn from_draft(draft: NewScheduleItem) -> Result<Self, ValidationError> {
        Ok(Self {
            id: 0,
            title: validation::require_text("title", draft.title)?,
            time: validation::require_text("time", draft.time)?,
            description: validation::optional_text(draft.description),
            color: validation::text_or_default(draft.color, DEFAULT_COLOR),
        })
    }

    pub fn apply(&mut self, patch: ScheduleItemPatch) -> Result<(), ValidationError> {
        let title = match patch.title {
            Some(title) => Some(validation::require_text("title", Some(title))?),
            None => None,
        };
        let time = match patch.time {
            Some(time) => Some(validation::require_text("time", Some(time))?),
            None => None,
        };
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(time) = time {
            self.time = time;
        }
        if let Some(description) = patch.description {
            self.description = validation::optional_text(Some(description));
        }
        if patch.color.is_some() {
            self.color = validation::text_or_default(patch.color, DEFAULT_COLOR);
        }
        Ok(())
    }
}
