use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub task: String,
    pub completed: bool,
    pub created_at: Option<NaiveDateTime>,
}

/// Payload for creating a to-do item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTodo {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl NewTodo {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: Some(task.into()),
            completed: None,
        }
    }
}

impl Todo {
    /// Builds an unsaved record (id 0) from a draft.
    pub fn from_draft(draft: NewTodo, now: NaiveDateTime) -> Result<Self, ValidationError> {
        Ok(Self {
            id: 0,
            task: validation::require_text("task", draft.task)?,
            completed: draft.completed.unwrap_or(false),
            created_at: Some(now),
        })
    }

    pub fn apply(&mut self, patch: TodoPatch) -> Result<(), ValidationError> {
        if patch.task.is_some() {
            self.task = validation::require_text("task", patch.task)?;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        Ok(())
    }

    pub fn status_label(&self) -> &'static str {
        if self.completed { "Completed" } else { "Pending" }
    }
}
