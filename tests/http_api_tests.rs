#![cfg(feature = "http_api")]

use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::{NaiveDate, NaiveDateTime};
use daily_dashboard::{
    EntityStore, NewNote, NewPomodoroSession, SqliteEntityStore, Todo, http_api,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 10)
        .unwrap()
        .and_hms_opt(15, 0, 0)
        .unwrap()
}

fn new_router() -> axum::Router {
    let store = SqliteEntityStore::in_memory().unwrap();
    let state = http_api::AppState::new(store).with_clock(fixed_now);
    http_api::router(state)
}

fn router_with(store: Arc<SqliteEntityStore>) -> axum::Router {
    let state = http_api::AppState::with_shared(store)
        .with_clock(fixed_now)
        .with_location("Test City");
    http_api::router(state)
}

async fn send(app: &axum::Router, method: &str, uri: &str, payload: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match payload {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn todo_lifecycle_via_http_api() {
    let app = new_router();

    let response = send(&app, "POST", "/api/todos", Some(json!({ "task": "HTTP Demo" }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Todo = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(created.task, "HTTP Demo");
    assert!(!created.completed);
    assert_eq!(created.created_at, Some(fixed_now()));

    let uri = format!("/api/todos/{}", created.id);
    let response = send(&app, "PUT", &uri, Some(json!({ "completed": true }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Todo = serde_json::from_value(json_body(response).await).unwrap();
    assert!(updated.completed);

    let response = send(&app, "GET", "/api/todos", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let list = json_body(response).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let response = send(&app, "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], json!("not_found"));
}

#[tokio::test]
async fn invalid_payloads_return_bad_request() {
    let app = new_router();

    let response = send(&app, "POST", "/api/todos", Some(json!({ "task": "" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], json!("invalid_request"));
    assert!(body["message"].as_str().unwrap_or_default().contains("task"));

    let response = send(
        &app,
        "POST",
        "/api/events",
        Some(json!({ "title": "Bad", "date": "10/06/2024" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "POST",
        "/api/pomodoro/complete",
        Some(json!({ "duration": 0 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/events?start=yesterday", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "GET", "/api/calendar?year=2024&month=15", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pomodoro_stats_aggregate_recorded_sessions() {
    let store = Arc::new(SqliteEntityStore::in_memory().unwrap());
    store
        .record_session(
            NewPomodoroSession::minutes(50),
            NaiveDate::from_ymd_opt(2024, 6, 3)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        )
        .unwrap();
    let app = router_with(store);

    let response = send(&app, "POST", "/api/pomodoro/complete", Some(json!({}))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let session = json_body(response).await;
    assert_eq!(session["duration"], json!(25));
    assert_eq!(session["completed"], json!(true));

    let response = send(&app, "GET", "/api/pomodoro/stats", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = json_body(response).await;
    assert_eq!(stats["today_sessions"], json!(1));
    assert_eq!(stats["total_sessions"], json!(2));
    assert_eq!(stats["total_focus_hours"], json!(1));
    let weekly = stats["weekly"].as_array().unwrap();
    assert_eq!(weekly.len(), 7);
    assert_eq!(weekly[6]["day"], json!("Mon"));
    assert_eq!(weekly[6]["sessions"], json!(1));
}

#[tokio::test]
async fn calendar_groups_events_for_requested_month() {
    let app = new_router();
    for (title, date, time) in [
        ("Review", "2024-06-10", "15:00"),
        ("Standup", "2024-06-10", "09:00"),
        ("Outside", "2024-07-02", "09:00"),
    ] {
        let response = send(
            &app,
            "POST",
            "/api/events",
            Some(json!({ "title": title, "date": date, "time": time })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(&app, "GET", "/api/calendar?year=2024&month=6", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = json_body(response).await;
    assert_eq!(view["month_name"], json!("June"));
    let day = view["events_by_date"]["2024-06-10"].as_array().unwrap();
    assert_eq!(day[0]["title"], json!("Standup"));
    assert_eq!(day[1]["title"], json!("Review"));
    assert!(view["events_by_date"].get("2024-07-02").is_none());

    // Month 13 rolls into January of the next year.
    let response = send(&app, "GET", "/api/calendar?year=2023&month=13", None).await;
    let view = json_body(response).await;
    assert_eq!(view["year"], json!(2024));
    assert_eq!(view["month"], json!(1));

    // Without parameters the clock's month is shown.
    let response = send(&app, "GET", "/api/calendar", None).await;
    let view = json_body(response).await;
    assert_eq!(view["month"], json!(6));

    let response = send(&app, "GET", "/api/events?start=2024-07-01", None).await;
    let events = json_body(response).await;
    assert_eq!(events.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn note_export_is_a_csv_attachment() {
    let store = Arc::new(SqliteEntityStore::in_memory().unwrap());
    store
        .create_note(NewNote::new("Ideas", "line1\nline2"), fixed_now())
        .unwrap();
    let app = router_with(store);

    let response = send(&app, "GET", "/export/notes/csv", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "text/csv"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap(),
        "attachment; filename=notes_20240610.csv"
    );
    let text = text_body(response).await;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "ID,Title,Content,Color,Created At,Updated At");
    assert!(lines[1].contains("line1 line2"));
    assert_eq!(lines.len(), 2);

    let response = send(&app, "GET", "/export/calendar/csv", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = text_body(response).await;
    assert_eq!(text.lines().next(), Some("ID,Title,Description,Date,Time,Color"));
}

#[tokio::test]
async fn derived_views_respond() {
    let store = Arc::new(SqliteEntityStore::in_memory().unwrap());
    daily_dashboard::seed_if_empty(&*store, fixed_now()).unwrap();
    let app = router_with(store);

    let response = send(&app, "GET", "/api/weather", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let weather = json_body(response).await;
    assert_eq!(weather["location"], json!("Test City"));
    assert_eq!(weather["condition"], json!("Sunny"));
    assert_eq!(weather["temperature"], json!(32));
    assert_eq!(weather["forecast"].as_array().unwrap().len(), 5);

    let response = send(&app, "GET", "/api/quote", None).await;
    let quote = json_body(response).await;
    assert!(quote["quote"].is_string());
    assert!(quote["author"].is_string());

    let response = send(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = json_body(response).await;
    assert_eq!(summary["todos"].as_array().unwrap().len(), 5);
    assert_eq!(summary["todo_progress"]["completed"], json!(2));
    assert_eq!(summary["notes"].as_array().unwrap().len(), 3);
    assert_eq!(summary["schedule"][0]["time"], json!("09:00"));
    assert_eq!(summary["date"], json!("2024-06-10"));

    let response = send(&app, "GET", "/api/health", None).await;
    let health = json_body(response).await;
    assert_eq!(health["status"], json!("healthy"));
}

#[tokio::test]
async fn extractor_failures_use_the_json_error_body() {
    let app = new_router();

    let response = send(
        &app,
        "POST",
        "/api/pomodoro/complete",
        Some(json!({ "duration": "abc" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], json!("invalid_request"));
    assert!(body["message"].is_string());

    let response = send(&app, "GET", "/api/todos/abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], json!("invalid_request"));

    let response = send(&app, "GET", "/api/calendar?month=abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], json!("invalid_request"));

    let request = Request::builder()
        .method("POST")
        .uri("/api/todos")
        .header("content-type", "application/json")
        .body(Body::from("{\"task\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], json!("invalid_request"));
}
