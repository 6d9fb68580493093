use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::validation::{self, DEFAULT_COLOR, DEFAULT_TITLE, ValidationError};

/// A free-form note. `updated_at` never precedes `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub color: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewNote {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Note {
    pub fn from_draft(draft: NewNote, now: NaiveDateTime) -> Result<Self, ValidationError> {
        Ok(Self {
            id: 0,
            title: validation::text_or_default(draft.title, DEFAULT_TITLE),
            content: validation::optional_text(draft.content),
            color: validation::text_or_default(draft.color, DEFAULT_COLOR),
            created_at: Some(now),
            updated_at: Some(now),
        })
    }

    pub fn apply(&mut self, patch: NotePatch, now: NaiveDateTime) -> Result<(), ValidationError> {
        if patch.title.is_some() {
            self.title = validation::require_text("title", patch.title)?;
        }
        if let Some(content) = patch.content {
            self.content = validation::optional_text(Some(content));
        }
        if patch.color.is_some() {
            self.color = validation::text_or_default(patch.color, DEFAULT_COLOR);
        }
        self.touch(now);
        Ok(())
    }

    fn touch(&mut self, now: NaiveDateTime) {
        self.updated_at = match self.created_at {
            Some(created) if created > now => Some(created),
            _ => Some(now),
        };
    }
}
