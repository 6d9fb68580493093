pub mod calculations;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod export;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod model;
pub mod persistence;
pub mod quotes;
pub mod validation;
pub mod weather;

pub use calculations::{DailySessions, ProductivityStats, TodoProgress, aggregate, todo_progress};
pub use calendar::{CalendarError, MonthSpan, MonthView, Week, build_month_grid};
pub use config::{ConfigError, DashboardConfig, DatabaseLocation};
pub use dashboard::{DashboardSummary, build_dashboard};
pub use export::{CsvExport, ExportError, ExportKind, to_delimited_text};
pub use model::{
    DateRange, Event, EventPatch, NewEvent, NewNote, NewPomodoroSession, NewScheduleItem,
    NewTodo, Note, NotePatch, PomodoroSession, ScheduleItem, ScheduleItemPatch, Todo, TodoPatch,
};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteEntityStore;
pub use persistence::{
    EntityStore, PersistenceError, PersistenceResult, RecordKind, SeedReport, seed_if_empty,
};
pub use quotes::{Quote, random_quote};
pub use validation::ValidationError;
pub use weather::{WeatherSnapshot, generate_weather};
