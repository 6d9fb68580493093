#![cfg(feature = "sqlite")]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use daily_dashboard::{
    DateRange, EntityStore, EventPatch, NewEvent, NewNote, NewPomodoroSession, NewScheduleItem,
    NewTodo, NotePatch, PersistenceError, RecordKind, ScheduleItemPatch, SqliteEntityStore,
    TodoPatch, seed_if_empty,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, day: u32, hour: u32) -> NaiveDateTime {
    d(y, m, day).and_hms_opt(hour, 0, 0).unwrap()
}

fn store() -> SqliteEntityStore {
    SqliteEntityStore::in_memory().expect("open in-memory store")
}

#[test]
fn todo_lifecycle() {
    let store = store();
    let now = at(2024, 6, 10, 9);

    let created = store.create_todo(NewTodo::new("Write tests"), now).unwrap();
    assert!(created.id > 0);
    assert!(!created.completed);
    assert_eq!(created.created_at, Some(now));

    let fetched = store.get_todo(created.id).unwrap();
    assert_eq!(fetched, created);

    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    let updated = store.update_todo(created.id, patch).unwrap();
    assert!(updated.completed);
    assert_eq!(updated.task, "Write tests");
    assert_eq!(updated.created_at, Some(now));

    store.delete_todo(created.id).unwrap();
    let err = store.get_todo(created.id).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::NotFound {
            kind: RecordKind::Todo,
            ..
        }
    ));
    assert!(store.delete_todo(created.id).unwrap_err().is_not_found());
}

#[test]
fn todos_list_newest_first_and_ids_are_not_reused() {
    let store = store();
    let first = store
        .create_todo(NewTodo::new("First"), at(2024, 6, 1, 9))
        .unwrap();
    let second = store
        .create_todo(NewTodo::new("Second"), at(2024, 6, 2, 9))
        .unwrap();
    let titles: Vec<String> = store
        .list_todos()
        .unwrap()
        .into_iter()
        .map(|t| t.task)
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);

    store.delete_todo(second.id).unwrap();
    let third = store
        .create_todo(NewTodo::new("Third"), at(2024, 6, 3, 9))
        .unwrap();
    assert!(third.id > second.id);
    assert!(second.id > first.id);
}

#[test]
fn invalid_input_writes_nothing() {
    let store = store();
    let now = at(2024, 6, 10, 9);

    let err = store.create_todo(NewTodo::new("   "), now).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidInput(_)));
    assert_eq!(store.count(RecordKind::Todo).unwrap(), 0);

    let err = store
        .record_session(NewPomodoroSession::minutes(0), now)
        .unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidInput(_)));
    assert!(
        store
            .record_session(NewPomodoroSession::minutes(-25), now)
            .is_err()
    );
    assert_eq!(store.count(RecordKind::PomodoroSession).unwrap(), 0);

    let bad_date = NewEvent {
        title: Some("Bad".into()),
        date: Some("2024-13-45".into()),
        ..NewEvent::default()
    };
    assert!(store.create_event(bad_date).is_err());
    let missing_date = NewEvent {
        title: Some("No date".into()),
        ..NewEvent::default()
    };
    assert!(store.create_event(missing_date).is_err());
    assert_eq!(store.count(RecordKind::Event).unwrap(), 0);

    let todo = store.create_todo(NewTodo::new("Keep me"), now).unwrap();
    let blank = TodoPatch {
        task: Some(String::new()),
        completed: Some(true),
    };
    assert!(store.update_todo(todo.id, blank).is_err());
    let unchanged = store.get_todo(todo.id).unwrap();
    assert_eq!(unchanged.task, "Keep me");
    assert!(!unchanged.completed);
}

#[test]
fn note_defaults_and_update_timestamps() {
    let store = store();
    let created_at = at(2024, 6, 10, 9);
    let note = store.create_note(NewNote::default(), created_at).unwrap();
    assert_eq!(note.title, "Untitled");
    assert_eq!(note.color, "primary");
    assert_eq!(note.content, None);
    assert_eq!(note.updated_at, Some(created_at));

    let later = created_at + Duration::hours(2);
    let patch = NotePatch {
        content: Some("line1\nline2".into()),
        ..NotePatch::default()
    };
    let updated = store.update_note(note.id, patch, later).unwrap();
    assert_eq!(updated.content.as_deref(), Some("line1\nline2"));
    assert_eq!(updated.created_at, Some(created_at));
    assert_eq!(updated.updated_at, Some(later));

    // A clock reading earlier than creation must not move updated_at before it.
    let earlier = created_at - Duration::days(1);
    let patch = NotePatch {
        color: Some("danger".into()),
        ..NotePatch::default()
    };
    let updated = store.update_note(note.id, patch, earlier).unwrap();
    assert_eq!(updated.color, "danger");
    assert!(updated.updated_at >= updated.created_at);

    let reloaded = store.get_note(note.id).unwrap();
    assert_eq!(reloaded, updated);
}

#[test]
fn notes_list_most_recently_updated_first() {
    let store = store();
    let old = store
        .create_note(NewNote::new("Old", "a"), at(2024, 6, 1, 9))
        .unwrap();
    store
        .create_note(NewNote::new("New", "b"), at(2024, 6, 2, 9))
        .unwrap();
    store
        .update_note(old.id, NotePatch::default(), at(2024, 6, 3, 9))
        .unwrap();
    let titles: Vec<String> = store
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(titles, vec!["Old", "New"]);
}

#[test]
fn events_filter_by_inclusive_range_and_sort() {
    let store = store();
    store
        .create_event(NewEvent::new("Evening", d(2024, 6, 10)).at("18:00"))
        .unwrap();
    store
        .create_event(NewEvent::new("Morning", d(2024, 6, 10)).at("08:00"))
        .unwrap();
    store
        .create_event(NewEvent::new("Start", d(2024, 6, 1)).at("12:00"))
        .unwrap();
    store
        .create_event(NewEvent::new("End", d(2024, 6, 30)))
        .unwrap();
    store
        .create_event(NewEvent::new("July", d(2024, 7, 1)).at("09:00"))
        .unwrap();

    let june = store
        .list_events(&DateRange::between(d(2024, 6, 1), d(2024, 6, 30)))
        .unwrap();
    let titles: Vec<&str> = june.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Start", "Morning", "Evening", "End"]);

    let all = store.list_events(&DateRange::all()).unwrap();
    assert_eq!(all.len(), 5);

    let from_july = store
        .list_events(&DateRange {
            start: Some(d(2024, 7, 1)),
            end: None,
        })
        .unwrap();
    assert_eq!(from_july.len(), 1);
    assert_eq!(from_july[0].title, "July");
}

#[test]
fn event_update_moves_date_and_rejects_bad_dates() {
    let store = store();
    let event = store
        .create_event(NewEvent::new("Review", d(2024, 6, 10)).described("Sprint"))
        .unwrap();
    assert_eq!(event.color, "primary");
    assert_eq!(event.description.as_deref(), Some("Sprint"));

    let patch = EventPatch {
        date: Some("2024-06-12".into()),
        time: Some("15:00".into()),
        ..EventPatch::default()
    };
    let moved = store.update_event(event.id, patch).unwrap();
    assert_eq!(moved.date, d(2024, 6, 12));
    assert_eq!(moved.time.as_deref(), Some("15:00"));

    let patch = EventPatch {
        title: Some("Renamed".into()),
        date: Some("June 12".into()),
        ..EventPatch::default()
    };
    assert!(store.update_event(event.id, patch).is_err());
    assert_eq!(store.get_event(event.id).unwrap().title, "Review");
    assert!(store.update_event(999, EventPatch::default()).unwrap_err().is_not_found());
}

#[test]
fn schedule_items_order_by_time_label() {
    let store = store();
    store
        .create_schedule_item(NewScheduleItem::new("Gym", "17:00"))
        .unwrap();
    let standup = store
        .create_schedule_item(NewScheduleItem::new("Standup", "09:00").with_color("success"))
        .unwrap();
    let titles: Vec<String> = store
        .list_schedule_items()
        .unwrap()
        .into_iter()
        .map(|item| item.title)
        .collect();
    assert_eq!(titles, vec!["Standup", "Gym"]);

    let patch = ScheduleItemPatch {
        time: Some("18:30".into()),
        ..ScheduleItemPatch::default()
    };
    let moved = store.update_schedule_item(standup.id, patch).unwrap();
    assert_eq!(moved.time, "18:30");
    assert_eq!(moved.color, "success");
    assert_eq!(store.list_schedule_items().unwrap()[1].title, "Standup");

    assert!(
        store
            .create_schedule_item(NewScheduleItem::new("No time", ""))
            .is_err()
    );
    store.delete_schedule_item(standup.id).unwrap();
    assert_eq!(store.count(RecordKind::ScheduleItem).unwrap(), 1);
}

#[test]
fn sessions_default_to_twenty_five_minutes() {
    let store = store();
    let now = at(2024, 6, 10, 9);
    let session = store
        .record_session(NewPomodoroSession::default(), now)
        .unwrap();
    assert_eq!(session.duration, 25);
    assert!(session.completed);
    assert_eq!(session.created_at, now);

    store
        .record_session(NewPomodoroSession::minutes(50), now - Duration::days(1))
        .unwrap();
    let sessions = store.list_sessions().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].duration, 50);
    assert_eq!(store.get_session(session.id).unwrap(), session);

    store.delete_session(session.id).unwrap();
    assert!(store.get_session(session.id).unwrap_err().is_not_found());
}

#[test]
fn seeding_is_idempotent() {
    let store = store();
    let now = at(2024, 6, 10, 9);
    let report = seed_if_empty(&store, now).unwrap();
    assert_eq!(report.todos, 5);
    assert_eq!(report.schedule_items, 6);
    assert_eq!(report.notes, 3);
    assert_eq!(report.events, 4);

    let again = seed_if_empty(&store, now).unwrap();
    assert_eq!(again.total(), 0);
    assert_eq!(store.count(RecordKind::Todo).unwrap(), 5);
    assert_eq!(store.count(RecordKind::PomodoroSession).unwrap(), 0);

    let events = store.list_events(&DateRange::all()).unwrap();
    assert_eq!(events[0].date, d(2024, 6, 10));
    assert_eq!(events.last().unwrap().date, d(2024, 6, 15));
}

#[test]
fn seeded_sample_text_is_verbatim() {
    let store = store();
    seed_if_empty(&store, at(2024, 6, 10, 9)).unwrap();

    let notes = store.list_notes().unwrap();
    let tips = notes.iter().find(|note| note.title == "Flask Tips").unwrap();
    assert_eq!(
        tips.content.as_deref(),
        Some("Remember to use blueprints for larger applications. Keep routes organized!")
    );

    let schedule = store.list_schedule_items().unwrap();
    let work = schedule
        .iter()
        .find(|item| item.title == "Project Work")
        .unwrap();
    assert_eq!(work.description.as_deref(), Some("Work on Flask dashboard"));
}

#[test]
fn seeding_only_fills_empty_collections() {
    let store = store();
    let now = at(2024, 6, 10, 9);
    store.create_todo(NewTodo::new("Mine"), now).unwrap();
    let report = seed_if_empty(&store, now).unwrap();
    assert_eq!(report.todos, 0);
    assert_eq!(report.notes, 3);
    assert_eq!(store.count(RecordKind::Todo).unwrap(), 1);
}

#[test]
fn file_backed_store_survives_reopen() {
    let file = NamedTempFile::new().unwrap();
    let now = at(2024, 6, 10, 9);
    let id = {
        let store = SqliteEntityStore::new(file.path()).unwrap();
        store
            .create_note(NewNote::new("Persisted", "body"), now)
            .unwrap()
            .id
    };

    let reopened = SqliteEntityStore::new(file.path()).unwrap();
    let note = reopened.get_note(id).unwrap();
    assert_eq!(note.title, "Persisted");
    assert_eq!(note.created_at, Some(now));
}
