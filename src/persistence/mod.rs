use crate::model::{
    DateRange, Event, EventPatch, NewEvent, NewNote, NewPomodoroSession, NewScheduleItem,
    NewTodo, Note, NotePatch, PomodoroSession, ScheduleItem, ScheduleItemPatch, Todo, TodoPatch,
};
use crate::validation::ValidationError;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Todo,
    Note,
    Event,
    ScheduleItem,
    PomodoroSession,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Todo,
        RecordKind::Note,
        RecordKind::Event,
        RecordKind::ScheduleItem,
        RecordKind::PomodoroSession,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Todo => "todo",
            RecordKind::Note => "note",
            RecordKind::Event => "event",
            RecordKind::ScheduleItem => "schedule item",
            RecordKind::PomodoroSession => "pomodoro session",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: i64 },
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(Box::new(value))
    }
}

impl PersistenceError {
    pub fn not_found(kind: RecordKind, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Storage for the five dashboard collections.
///
/// Every id is assigned by the store and stays stable for the record's
/// lifetime. Drafts and patches are validated before anything is written, so
/// a rejected call leaves the store unchanged.
pub trait EntityStore {
    /// Newest first.
    fn list_todos(&self) -> PersistenceResult<Vec<Todo>>;
    fn get_todo(&self, id: i64) -> PersistenceResult<Todo>;
    fn create_todo(&self, draft: NewTodo, now: NaiveDateTime) -> PersistenceResult<Todo>;
    fn update_todo(&self, id: i64, patch: TodoPatch) -> PersistenceResult<Todo>;
    fn delete_todo(&self, id: i64) -> PersistenceResult<()>;

    /// Most recently updated first.
    fn list_notes(&self) -> PersistenceResult<Vec<Note>>;
    fn get_note(&self, id: i64) -> PersistenceResult<Note>;
    fn create_note(&self, draft: NewNote, now: NaiveDateTime) -> PersistenceResult<Note>;
    fn update_note(&self, id: i64, patch: NotePatch, now: NaiveDateTime)
    -> PersistenceResult<Note>;
    fn delete_note(&self, id: i64) -> PersistenceResult<()>;

    /// Ordered by date, then time label.
    fn list_events(&self, range: &DateRange) -> PersistenceResult<Vec<Event>>;
    fn get_event(&self, id: i64) -> PersistenceResult<Event>;
    fn create_event(&self, draft: NewEvent) -> PersistenceResult<Event>;
    fn update_event(&self, id: i64, patch: EventPatch) -> PersistenceResult<Event>;
    fn delete_event(&self, id: i64) -> PersistenceResult<()>;

    /// Ordered by time label.
    fn list_schedule_items(&self) -> PersistenceResult<Vec<ScheduleItem>>;
    fn get_schedule_item(&self, id: i64) -> PersistenceResult<ScheduleItem>;
    fn create_schedule_item(&self, draft: NewScheduleItem) -> PersistenceResult<ScheduleItem>;
    fn update_schedule_item(
        &self,
        id: i64,
        patch: ScheduleItemPatch,
    ) -> PersistenceResult<ScheduleItem>;
    fn delete_schedule_item(&self, id: i64) -> PersistenceResult<()>;

    /// Oldest first.
    fn list_sessions(&self) -> PersistenceResult<Vec<PomodoroSession>>;
    fn get_session(&self, id: i64) -> PersistenceResult<PomodoroSession>;
    fn record_session(
        &self,
        draft: NewPomodoroSession,
        now: NaiveDateTime,
    ) -> PersistenceResult<PomodoroSession>;
    fn delete_session(&self, id: i64) -> PersistenceResult<()>;

    fn count(&self, kind: RecordKind) -> PersistenceResult<usize>;
}

pub mod seed;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use seed::{SeedReport, seed_if_empty};
