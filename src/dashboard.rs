use crate::calculations::{ProductivityStats, TodoProgress, aggregate, todo_progress};
use crate::model::{Note, ScheduleItem, Todo};
use crate::persistence::{EntityStore, PersistenceResult};
use crate::quotes::{Quote, random_quote};
use crate::weather::{WeatherSnapshot, generate_weather};
use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::Serialize;

pub const RECENT_TODO_LIMIT: usize = 5;
pub const RECENT_NOTE_LIMIT: usize = 3;

/// Everything the landing view shows, in one document.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub todos: Vec<Todo>,
    pub todo_progress: TodoProgress,
    pub schedule: Vec<ScheduleItem>,
    pub notes: Vec<Note>,
    pub quote: Quote,
    pub weather: WeatherSnapshot,
    pub productivity: ProductivityStats,
}

pub fn build_dashboard<S, R>(
    store: &S,
    now: NaiveDateTime,
    location: &str,
    rng: &mut R,
) -> PersistenceResult<DashboardSummary>
where
    S: EntityStore + ?Sized,
    R: Rng + ?Sized,
{
    let todos = store.list_todos()?;
    let progress = todo_progress(&todos);
    let mut notes = store.list_notes()?;
    notes.truncate(RECENT_NOTE_LIMIT);
    let sessions = store.list_sessions()?;

    Ok(DashboardSummary {
        date: now.date(),
        todos: todos.into_iter().take(RECENT_TODO_LIMIT).collect(),
        todo_progress: progress,
        schedule: store.list_schedule_items()?,
        notes,
        quote: random_quote(rng),
        weather: generate_weather(now, location, rng),
        productivity: aggregate(now, &sessions),
    })
}
