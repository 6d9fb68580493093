use super::{EntityStore, PersistenceResult, RecordKind};
use crate::model::{NewEvent, NewNote, NewScheduleItem, NewTodo};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Number of sample rows inserted per collection by [`seed_if_empty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub todos: usize,
    pub schedule_items: usize,
    pub notes: usize,
    pub events: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.todos + self.schedule_items + self.notes + self.events
    }
}

/// Populates each empty collection with sample data. Collections that already
/// hold records are left alone, so a second call inserts nothing.
pub fn seed_if_empty<S>(store: &S, now: NaiveDateTime) -> PersistenceResult<SeedReport>
where
    S: EntityStore + ?Sized,
{
    let mut report = SeedReport::default();

    if store.count(RecordKind::Todo)? == 0 {
        let todos = [
            ("Complete MIS2001 assignment", false),
            ("Review Flask documentation", true),
            ("Build dashboard project", true),
            ("Practice Python coding", false),
            ("Prepare for midterm exam", false),
        ];
        for (task, completed) in todos {
            let draft = NewTodo {
                task: Some(task.to_string()),
                completed: Some(completed),
            };
            store.create_todo(draft, now)?;
            report.todos += 1;
        }
    }

    if store.count(RecordKind::ScheduleItem)? == 0 {
        let items = [
            ("Morning Standup", "09:00", "Daily team sync", "primary"),
            ("MIS2001 Lecture", "10:30", "Chapter 5: Database Design", "success"),
            ("Lunch Break", "12:00", "", "warning"),
            ("Project Work", "13:00", "Work on Flask dashboard", "info"),
            ("Study Session", "15:30", "Review notes and practice", "secondary"),
            ("Gym", "17:00", "Cardio and weights", "danger"),
        ];
        for (title, time, description, color) in items {
            let draft = NewScheduleItem::new(title, time)
                .described(description)
                .with_color(color);
            store.create_schedule_item(draft)?;
            report.schedule_items += 1;
        }
    }

    if store.count(RecordKind::Note)? == 0 {
        let notes = [
            (
                "Flask Tips",
                "Remember to use blueprints for larger applications. Keep routes organized!",
                "primary",
            ),
            (
                "Meeting Notes",
                "Discussed project timeline. Deadline is next Friday. Need to complete API integration.",
                "success",
            ),
            (
                "Ideas",
                "- Add dark mode\n- Mobile responsive design\n- Pomodoro timer\n- Calendar integration",
                "warning",
            ),
        ];
        for (title, content, color) in notes {
            store.create_note(NewNote::new(title, content).with_color(color), now)?;
            report.notes += 1;
        }
    }

    if store.count(RecordKind::Event)? == 0 {
        let today = now.date();
        let events = [
            ("Team Meeting", 0, "10:00", Some("Weekly sync"), "primary"),
            (
                "Project Deadline",
                3,
                "23:59",
                Some("Submit final project"),
                "danger",
            ),
            ("Study Group", 1, "14:00", Some("Library room 201"), "success"),
            ("Doctor Appointment", 5, "09:30", None, "warning"),
        ];
        for (title, offset, time, description, color) in events {
            let mut draft = NewEvent::new(title, today + Duration::days(offset))
                .at(time)
                .with_color(color);
            if let Some(description) = description {
                draft = draft.described(description);
            }
            store.create_event(draft)?;
            report.events += 1;
        }
    }

    if report.total() > 0 {
        tracing::info!(
            todos = report.todos,
            schedule_items = report.schedule_items,
            notes = report.notes,
            events = report.events,
            "seeded sample data"
        );
    }
    Ok(report)
}
