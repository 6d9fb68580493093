use crate::model::{PomodoroSession, Todo};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

const HISTOGRAM_DAYS: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySessions {
    /// Weekday abbreviation, e.g. `"Mon"`.
    pub day: String,
    pub date: NaiveDate,
    pub sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductivityStats {
    pub today_sessions: usize,
    pub total_sessions: usize,
    pub total_focus_minutes: u64,
    /// Whole hours only; leftover minutes are dropped.
    pub total_focus_hours: u64,
    /// The seven days ending today, oldest first.
    pub weekly: Vec<DailySessions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TodoProgress {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

pub fn aggregate(now: NaiveDateTime, sessions: &[PomodoroSession]) -> ProductivityStats {
    let today = now.date();
    let oldest = today - Duration::days(HISTOGRAM_DAYS as i64 - 1);

    let mut buckets = [0usize; HISTOGRAM_DAYS];
    let mut today_sessions = 0;
    let mut total_focus_minutes: u64 = 0;

    for session in sessions {
        total_focus_minutes += u64::from(session.duration);
        let day = session.created_at.date();
        if day == today {
            today_sessions += 1;
        }
        if day >= oldest && day <= today {
            let index = (day - oldest).num_days() as usize;
            buckets[index] += 1;
        }
    }

    let weekly = buckets
        .iter()
        .enumerate()
        .map(|(offset, &count)| {
            let date = oldest + Duration::days(offset as i64);
            DailySessions {
                day: date.format("%a").to_string(),
                date,
                sessions: count,
            }
        })
        .collect();

    ProductivityStats {
        today_sessions,
        total_sessions: sessions.len(),
        total_focus_minutes,
        total_focus_hours: total_focus_minutes / 60,
        weekly,
    }
}

pub fn todo_progress(todos: &[Todo]) -> TodoProgress {
    let completed = todos.iter().filter(|todo| todo.completed).count();
    TodoProgress {
        total: todos.len(),
        completed,
        pending: todos.len() - completed,
    }
}
