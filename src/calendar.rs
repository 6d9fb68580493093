use crate::model::{DateRange, Event};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid calendar input: year {year}, month {month}")]
    InvalidInput { year: i32, month: i32 },
}

/// One calendar week, Sunday first. Padding days from adjacent months are `None`.
pub type Week = [Option<u32>; 7];

/// A normalized year/month with its first and last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthSpan {
    pub year: i32,
    pub month: u32,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub weeks: Vec<Week>,
    pub events_by_date: BTreeMap<String, Vec<Event>>,
    pub previous: YearMonth,
    pub next: YearMonth,
}

impl MonthSpan {
    /// Month 13 rolls into January of the next year and month 0 into December
    /// of the previous one. Anything further out is rejected.
    pub fn new(year: i32, month: i32) -> Result<Self, CalendarError> {
        let invalid = || CalendarError::InvalidInput { year, month };
        let (norm_year, norm_month) = match month {
            13 => (year.checked_add(1).ok_or_else(invalid)?, 1),
            0 => (year.checked_sub(1).ok_or_else(invalid)?, 12),
            1..=12 => (year, month as u32),
            _ => return Err(invalid()),
        };

        let first_day = NaiveDate::from_ymd_opt(norm_year, norm_month, 1).ok_or_else(invalid)?;
        let following = if norm_month == 12 {
            norm_year
                .checked_add(1)
                .and_then(|next_year| NaiveDate::from_ymd_opt(next_year, 1, 1))
        } else {
            NaiveDate::from_ymd_opt(norm_year, norm_month + 1, 1)
        };
        let last_day = following
            .and_then(|date| date.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self {
            year: norm_year,
            month: norm_month,
            first_day,
            last_day,
        })
    }

    pub fn containing(date: NaiveDate) -> Result<Self, CalendarError> {
        Self::new(date.year(), date.month() as i32)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day.day()
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    pub fn range(&self) -> DateRange {
        DateRange::between(self.first_day, self.last_day)
    }

    pub fn previous(&self) -> YearMonth {
        if self.month == 1 {
            YearMonth {
                year: self.year - 1,
                month: 12,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> YearMonth {
        if self.month == 12 {
            YearMonth {
                year: self.year + 1,
                month: 1,
            }
        } else {
            YearMonth {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Week rows covering the whole month, starting on Sunday.
    pub fn weeks(&self) -> Vec<Week> {
        let leading = self.first_day.weekday().num_days_from_sunday() as usize;
        let mut weeks = Vec::with_capacity(6);
        let mut week: Week = [None; 7];
        let mut column = leading;

        for day in 1..=self.days_in_month() {
            week[column] = Some(day);
            column += 1;
            if column == 7 {
                weeks.push(week);
                week = [None; 7];
                column = 0;
            }
        }
        if column > 0 {
            weeks.push(week);
        }
        weeks
    }
}

/// Orders events by date then time label and groups them under their ISO
/// date. Events outside `span` are dropped.
pub fn group_events_by_date(span: &MonthSpan, events: Vec<Event>) -> BTreeMap<String, Vec<Event>> {
    let range = span.range();
    let mut in_range: Vec<Event> = events
        .into_iter()
        .filter(|event| range.contains(event.date))
        .collect();
    in_range.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.time.cmp(&b.time))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut grouped: BTreeMap<String, Vec<Event>> = BTreeMap::new();
    for event in in_range {
        grouped
            .entry(event.date.format("%Y-%m-%d").to_string())
            .or_default()
            .push(event);
    }
    grouped
}

pub fn build_month_grid(
    year: i32,
    month: i32,
    events: Vec<Event>,
) -> Result<MonthView, CalendarError> {
    let span = MonthSpan::new(year, month)?;
    Ok(MonthView {
        year: span.year,
        month: span.month,
        month_name: span.month_name(),
        first_day: span.first_day,
        last_day: span.last_day,
        weeks: span.weeks(),
        events_by_date: group_events_by_date(&span, events),
        previous: span.previous(),
        next: span.next(),
    })
}
