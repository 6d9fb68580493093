use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{
        FromRequest, FromRequestParts, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::calculations::{ProductivityStats, aggregate};
use crate::calendar::{CalendarError, MonthSpan, MonthView, build_month_grid};
use crate::config::DEFAULT_LOCATION;
use crate::dashboard::{DashboardSummary, build_dashboard};
use crate::export::{CsvExport, ExportError, to_delimited_text};
use crate::model::{
    DateRange, Event, EventPatch, NewEvent, NewNote, NewPomodoroSession, NewScheduleItem,
    NewTodo, Note, NotePatch, PomodoroSession, ScheduleItem, ScheduleItemPatch, Todo, TodoPatch,
};
use crate::persistence::{EntityStore, PersistenceError};
use crate::quotes::{Quote, random_quote};
use crate::validation;
use crate::weather::{WeatherSnapshot, generate_weather};

type SharedStore = Arc<dyn EntityStore + Send + Sync>;
type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    store: SharedStore,
    clock: Clock,
    location: Arc<str>,
}

impl AppState {
    pub fn new<S>(store: S) -> Self
    where
        S: EntityStore + Send + Sync + 'static,
    {
        Self::with_shared(Arc::new(store))
    }

    pub fn with_shared(store: SharedStore) -> Self {
        Self {
            store,
            clock: Arc::new(|| Local::now().naive_local()),
            location: Arc::from(DEFAULT_LOCATION),
        }
    }

    /// Replaces the wall clock, e.g. with a fixed instant in tests.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDateTime + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Arc::from(location.into());
        self
    }

    fn store(&self) -> &(dyn EntityStore + Send + Sync) {
        self.store.as_ref()
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match &value {
            PersistenceError::NotFound { .. } => ApiError::NotFound(value.to_string()),
            PersistenceError::InvalidInput(err) => ApiError::invalid(err.message()),
            PersistenceError::Storage(_) => {
                tracing::error!(error = %value, "storage failure");
                ApiError::internal(value.to_string())
            }
        }
    }
}

impl From<CalendarError> for ApiError {
    fn from(value: CalendarError) -> Self {
        ApiError::invalid(value.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(value: ExportError) -> Self {
        tracing::error!(error = %value, "csv export failed");
        ApiError::internal(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::invalid(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        ApiError::invalid(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        ApiError::invalid(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

// Extractors whose rejections answer with the same JSON error body as handlers.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
struct ApiJson<T>(T);

#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
struct ApiPath<T>(T);

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
struct ApiQuery<T>(T);

#[derive(Debug, Deserialize)]
struct EventRangeQuery {
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarQuery {
    year: Option<i32>,
    month: Option<i32>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/dashboard", get(dashboard))
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/:id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/api/notes", get(list_notes).post(create_note))
        .route(
            "/api/notes/:id",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route(
            "/api/schedule",
            get(list_schedule_items).post(create_schedule_item),
        )
        .route(
            "/api/schedule/:id",
            get(get_schedule_item)
                .put(update_schedule_item)
                .delete(delete_schedule_item),
        )
        .route("/api/pomodoro/complete", post(complete_pomodoro))
        .route("/api/pomodoro/stats", get(pomodoro_stats))
        .route("/api/calendar", get(month_calendar))
        .route("/api/weather", get(weather))
        .route("/api/quote", get(quote))
        .route("/export/todos/csv", get(export_todos))
        .route("/export/notes/csv", get(export_notes))
        .route("/export/calendar/csv", get(export_events))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "dashboard HTTP API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "message": "Dashboard is running!",
        "timestamp": state.now(),
    }))
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    let now = state.now();
    let summary = build_dashboard(state.store(), now, &state.location, &mut rand::thread_rng())?;
    Ok(Json(summary))
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    Ok(Json(state.store().list_todos()?))
}

async fn get_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.store().get_todo(id)?))
}

async fn create_todo(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let todo = state.store().create_todo(draft, state.now())?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<TodoPatch>,
) -> Result<Json<Todo>, ApiError> {
    Ok(Json(state.store().update_todo(id, patch)?))
}

async fn delete_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.store().delete_todo(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.store().list_notes()?))
}

async fn get_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.store().get_note(id)?))
}

async fn create_note(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewNote>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let note = state.store().create_note(draft, state.now())?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<NotePatch>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(state.store().update_note(id, patch, state.now())?))
}

async fn delete_note(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.store().delete_note(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_events(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EventRangeQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let range = DateRange {
        start: validation::parse_optional_date("start", query.start.as_deref())
            .map_err(|err| ApiError::invalid(err.message()))?,
        end: validation::parse_optional_date("end", query.end.as_deref())
            .map_err(|err| ApiError::invalid(err.message()))?,
    };
    Ok(Json(state.store().list_events(&range)?))
}

async fn get_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.store().get_event(id)?))
}

async fn create_event(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewEvent>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state.store().create_event(draft)?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn update_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<EventPatch>,
) -> Result<Json<Event>, ApiError> {
    Ok(Json(state.store().update_event(id, patch)?))
}

async fn delete_event(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.store().delete_event(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_schedule_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduleItem>>, ApiError> {
    Ok(Json(state.store().list_schedule_items()?))
}

async fn get_schedule_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ScheduleItem>, ApiError> {
    Ok(Json(state.store().get_schedule_item(id)?))
}

async fn create_schedule_item(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewScheduleItem>,
) -> Result<(StatusCode, Json<ScheduleItem>), ApiError> {
    let item = state.store().create_schedule_item(draft)?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_schedule_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<ScheduleItemPatch>,
) -> Result<Json<ScheduleItem>, ApiError> {
    Ok(Json(state.store().update_schedule_item(id, patch)?))
}

async fn delete_schedule_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.store().delete_schedule_item(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_pomodoro(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewPomodoroSession>,
) -> Result<(StatusCode, Json<PomodoroSession>), ApiError> {
    let session = state.store().record_session(draft, state.now())?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn pomodoro_stats(
    State(state): State<AppState>,
) -> Result<Json<ProductivityStats>, ApiError> {
    let sessions = state.store().list_sessions()?;
    Ok(Json(aggregate(state.now(), &sessions)))
}

async fn month_calendar(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CalendarQuery>,
) -> Result<Json<MonthView>, ApiError> {
    let today = state.now().date();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month() as i32);
    let span = MonthSpan::new(year, month)?;
    let events = state.store().list_events(&span.range())?;
    Ok(Json(build_month_grid(span.year, span.month as i32, events)?))
}

async fn weather(State(state): State<AppState>) -> Json<WeatherSnapshot> {
    Json(generate_weather(
        state.now(),
        &state.location,
        &mut rand::thread_rng(),
    ))
}

async fn quote() -> Json<Quote> {
    Json(random_quote(&mut rand::thread_rng()))
}

fn csv_attachment<R: CsvExport>(records: &[R], today: NaiveDate) -> Result<Response, ApiError> {
    let body = to_delimited_text(records)?;
    let disposition = format!("attachment; filename={}", R::KIND.file_name(today));
    let headers = [
        (header::CONTENT_TYPE, "text/csv".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, body).into_response())
}

async fn export_todos(State(state): State<AppState>) -> Result<Response, ApiError> {
    let todos = state.store().list_todos()?;
    csv_attachment(&todos, state.now().date())
}

async fn export_notes(State(state): State<AppState>) -> Result<Response, ApiError> {
    let notes = state.store().list_notes()?;
    csv_attachment(&notes, state.now().date())
}

async fn export_events(State(state): State<AppState>) -> Result<Response, ApiError> {
    let events = state.store().list_events(&DateRange::all())?;
    csv_attachment(&events, state.now().date())
}
