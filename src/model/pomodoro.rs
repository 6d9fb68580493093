use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub id: i64,
    /// Focus length in minutes, always positive.
    pub duration: u32,
    /// Always `true` for recorded sessions; abandoned sessions are not stored.
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPomodoroSession {
    #[serde(default)]
    pub duration: Option<i64>,
}

impl NewPomodoroSession {
    pub fn minutes(duration: i64) -> Self {
        Self {
            duration: Some(duration),
        }
    }
}

impl PomodoroSession {
    pub fn from_draft(
        draft: NewPomodoroSession,
        now: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: 0,
            duration: validation::positive_minutes(draft.duration)?,
            completed: true,
            created_at: now,
        })
    }
}
