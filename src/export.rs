use crate::model::{Event, Note, Todo};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::string::FromUtf8Error;
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";
const MISSING: &str = "N/A";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export produced invalid utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Todos,
    Notes,
    Events,
}

impl ExportKind {
    pub fn header(self) -> &'static [&'static str] {
        match self {
            ExportKind::Todos => &["ID", "Task", "Status", "Created At"],
            ExportKind::Notes => &["ID", "Title", "Content", "Color", "Created At", "Updated At"],
            ExportKind::Events => &["ID", "Title", "Description", "Date", "Time", "Color"],
        }
    }

    pub fn file_stem(self) -> &'static str {
        match self {
            ExportKind::Todos => "todos",
            ExportKind::Notes => "notes",
            ExportKind::Events => "events",
        }
    }

    /// Download name such as `todos_20240610.csv`.
    pub fn file_name(self, date: NaiveDate) -> String {
        format!("{}_{}.csv", self.file_stem(), date.format("%Y%m%d"))
    }
}

/// A record type with a fixed CSV layout.
pub trait CsvExport {
    const KIND: ExportKind;
    type Row<'a>: Serialize
    where
        Self: 'a;

    fn csv_row(&self) -> Self::Row<'_>;
}

#[derive(Serialize)]
pub struct TodoCsvRow<'a> {
    id: i64,
    task: &'a str,
    status: &'static str,
    created_at: String,
}

#[derive(Serialize)]
pub struct NoteCsvRow<'a> {
    id: i64,
    title: &'a str,
    content: String,
    color: &'a str,
    created_at: String,
    updated_at: String,
}

#[derive(Serialize)]
pub struct EventCsvRow<'a> {
    id: i64,
    title: &'a str,
    description: String,
    date: String,
    time: &'a str,
    color: &'a str,
}

impl CsvExport for Todo {
    const KIND: ExportKind = ExportKind::Todos;
    type Row<'a> = TodoCsvRow<'a>;

    fn csv_row(&self) -> TodoCsvRow<'_> {
        TodoCsvRow {
            id: self.id,
            task: &self.task,
            status: self.status_label(),
            created_at: format_timestamp(self.created_at),
        }
    }
}

impl CsvExport for Note {
    const KIND: ExportKind = ExportKind::Notes;
    type Row<'a> = NoteCsvRow<'a>;

    fn csv_row(&self) -> NoteCsvRow<'_> {
        NoteCsvRow {
            id: self.id,
            title: &self.title,
            content: single_line(self.content.as_deref()),
            color: &self.color,
            created_at: format_timestamp(self.created_at),
            updated_at: format_timestamp(self.updated_at),
        }
    }
}

impl CsvExport for Event {
    const KIND: ExportKind = ExportKind::Events;
    type Row<'a> = EventCsvRow<'a>;

    fn csv_row(&self) -> EventCsvRow<'_> {
        EventCsvRow {
            id: self.id,
            title: &self.title,
            description: single_line(self.description.as_deref()),
            date: self.date.format(DATE_FORMAT).to_string(),
            time: self.time.as_deref().unwrap_or_default(),
            color: &self.color,
        }
    }
}

/// Renders `records` as CSV with the kind's header row, which is written even
/// when there are no records.
pub fn to_delimited_text<R: CsvExport>(records: &[R]) -> ExportResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(R::KIND.header())?;
    for record in records {
        writer.serialize(record.csv_row())?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn format_timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Each CR and LF becomes one space so a record stays on one line.
fn single_line(value: Option<&str>) -> String {
    value
        .map(|text| text.replace(['\r', '\n'], " "))
        .unwrap_or_default()
}
