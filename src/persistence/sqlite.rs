use super::{EntityStore, PersistenceError, PersistenceResult, RecordKind};
use crate::config::DatabaseLocation;
use crate::model::{
    DateRange, Event, EventPatch, NewEvent, NewNote, NewPomodoroSession, NewScheduleItem,
    NewTodo, Note, NotePatch, PomodoroSession, ScheduleItem, ScheduleItemPatch, Todo, TodoPatch,
};
use chrono::NaiveDateTime;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Params, Row, params};
use std::path::Path;

const TODO_COLUMNS: &str = "id, task, completed, created_at";
const NOTE_COLUMNS: &str = "id, title, content, color, created_at, updated_at";
const EVENT_COLUMNS: &str = "id, title, description, date, time, color";
const SCHEDULE_COLUMNS: &str = "id, title, time, description, color";
const SESSION_COLUMNS: &str = "id, duration, completed, created_at";

pub struct SqliteEntityStore {
    connection: Mutex<Connection>,
}

impl SqliteEntityStore {
    pub fn new<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn open(location: &DatabaseLocation) -> PersistenceResult<Self> {
        match location {
            DatabaseLocation::InMemory => Self::in_memory(),
            DatabaseLocation::File(path) => Self::new(path),
        }
    }

    fn from_connection(connection: Connection) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        // AUTOINCREMENT keeps ids of deleted rows from being handed out again.
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT
            );
            CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT,
                color TEXT NOT NULL DEFAULT 'primary',
                created_at TEXT,
                updated_at TEXT
            );
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                date TEXT NOT NULL,
                time TEXT,
                color TEXT NOT NULL DEFAULT 'primary'
            );
            CREATE INDEX IF NOT EXISTS events_date_time ON events (date, time);
            CREATE TABLE IF NOT EXISTS schedule_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                time TEXT NOT NULL,
                description TEXT,
                color TEXT NOT NULL DEFAULT 'primary'
            );
            CREATE TABLE IF NOT EXISTS pomodoro_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                duration INTEGER NOT NULL CHECK (duration > 0),
                completed INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

fn table_name(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Todo => "todos",
        RecordKind::Note => "notes",
        RecordKind::Event => "events",
        RecordKind::ScheduleItem => "schedule_items",
        RecordKind::PomodoroSession => "pomodoro_sessions",
    }
}

fn todo_from_row(row: &Row) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get("id")?,
        task: row.get("task")?,
        completed: row.get("completed")?,
        created_at: row.get("created_at")?,
    })
}

fn note_from_row(row: &Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        color: row.get("color")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn event_from_row(row: &Row) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        date: row.get("date")?,
        time: row.get("time")?,
        color: row.get("color")?,
    })
}

fn schedule_item_from_row(row: &Row) -> rusqlite::Result<ScheduleItem> {
    Ok(ScheduleItem {
        id: row.get("id")?,
        title: row.get("title")?,
        time: row.get("time")?,
        description: row.get("description")?,
        color: row.get("color")?,
    })
}

fn session_from_row(row: &Row) -> rusqlite::Result<PomodoroSession> {
    Ok(PomodoroSession {
        id: row.get("id")?,
        duration: row.get("duration")?,
        completed: row.get("completed")?,
        created_at: row.get("created_at")?,
    })
}

fn fetch_one<T>(
    conn: &Connection,
    kind: RecordKind,
    columns: &str,
    id: i64,
    map: fn(&Row) -> rusqlite::Result<T>,
) -> PersistenceResult<T> {
    let sql = format!("SELECT {columns} FROM {} WHERE id = ?1", table_name(kind));
    conn.query_row(&sql, params![id], map)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found(kind, id))
}

fn fetch_all<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: fn(&Row) -> rusqlite::Result<T>,
) -> PersistenceResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?;
    let mut records = Vec::new();
    for record in rows {
        records.push(record?);
    }
    Ok(records)
}

fn delete_row(conn: &Connection, kind: RecordKind, id: i64) -> PersistenceResult<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", table_name(kind));
    let affected = conn.execute(&sql, params![id])?;
    if affected == 0 {
        return Err(PersistenceError::not_found(kind, id));
    }
    tracing::debug!(%kind, id, "deleted record");
    Ok(())
}

impl EntityStore for SqliteEntityStore {
    fn list_todos(&self) -> PersistenceResult<Vec<Todo>> {
        let conn = self.connection.lock();
        let sql = format!("SELECT {TODO_COLUMNS} FROM todos ORDER BY created_at DESC, id DESC");
        fetch_all(&conn, &sql, [], todo_from_row)
    }

    fn get_todo(&self, id: i64) -> PersistenceResult<Todo> {
        let conn = self.connection.lock();
        fetch_one(&conn, RecordKind::Todo, TODO_COLUMNS, id, todo_from_row)
    }

    fn create_todo(&self, draft: NewTodo, now: NaiveDateTime) -> PersistenceResult<Todo> {
        let mut todo = Todo::from_draft(draft, now)?;
        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO todos (task, completed, created_at) VALUES (?1, ?2, ?3)",
            params![todo.task, todo.completed, todo.created_at],
        )?;
        todo.id = conn.last_insert_rowid();
        tracing::debug!(id = todo.id, "created todo");
        Ok(todo)
    }

    fn update_todo(&self, id: i64, patch: TodoPatch) -> PersistenceResult<Todo> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        let mut todo = fetch_one(&tx, RecordKind::Todo, TODO_COLUMNS, id, todo_from_row)?;
        todo.apply(patch)?;
        tx.execute(
            "UPDATE todos SET task = ?1, completed = ?2 WHERE id = ?3",
            params![todo.task, todo.completed, id],
        )?;
        tx.commit()?;
        tracing::debug!(id, "updated todo");
        Ok(todo)
    }

    fn delete_todo(&self, id: i64) -> PersistenceResult<()> {
        let conn = self.connection.lock();
        delete_row(&conn, RecordKind::Todo, id)
    }

    fn list_notes(&self) -> PersistenceResult<Vec<Note>> {
        let conn = self.connection.lock();
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY updated_at DESC, id DESC");
        fetch_all(&conn, &sql, [], note_from_row)
    }

    fn get_note(&self, id: i64) -> PersistenceResult<Note> {
        let conn = self.connection.lock();
        fetch_one(&conn, RecordKind::Note, NOTE_COLUMNS, id, note_from_row)
    }

    fn create_note(&self, draft: NewNote, now: NaiveDateTime) -> PersistenceResult<Note> {
        let mut note = Note::from_draft(draft, now)?;
        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO notes (title, content, color, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                note.title,
                note.content,
                note.color,
                note.created_at,
                note.updated_at
            ],
        )?;
        note.id = conn.last_insert_rowid();
        tracing::debug!(id = note.id, "created note");
        Ok(note)
    }

    fn update_note(
        &self,
        id: i64,
        patch: NotePatch,
        now: NaiveDateTime,
    ) -> PersistenceResult<Note> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        let mut note = fetch_one(&tx, RecordKind::Note, NOTE_COLUMNS, id, note_from_row)?;
        note.apply(patch, now)?;
        tx.execute(
            "UPDATE notes SET title = ?1, content = ?2, color = ?3, updated_at = ?4 WHERE id = ?5",
            params![note.title, note.content, note.color, note.updated_at, id],
        )?;
        tx.commit()?;
        tracing::debug!(id, "updated note");
        Ok(note)
    }

    fn delete_note(&self, id: i64) -> PersistenceResult<()> {
        let conn = self.connection.lock();
        delete_row(&conn, RecordKind::Note, id)
    }

    fn list_events(&self, range: &DateRange) -> PersistenceResult<Vec<Event>> {
        let conn = self.connection.lock();
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
             ORDER BY date ASC, time ASC, id ASC"
        );
        fetch_all(&conn, &sql, params![range.start, range.end], event_from_row)
    }

    fn get_event(&self, id: i64) -> PersistenceResult<Event> {
        let conn = self.connection.lock();
        fetch_one(&conn, RecordKind::Event, EVENT_COLUMNS, id, event_from_row)
    }

    fn create_event(&self, draft: NewEvent) -> PersistenceResult<Event> {
        let mut event = Event::from_draft(draft)?;
        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO events (title, description, date, time, color)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.title,
                event.description,
                event.date,
                event.time,
                event.color
            ],
        )?;
        event.id = conn.last_insert_rowid();
        tracing::debug!(id = event.id, date = %event.date, "created event");
        Ok(event)
    }

    fn update_event(&self, id: i64, patch: EventPatch) -> PersistenceResult<Event> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        let mut event = fetch_one(&tx, RecordKind::Event, EVENT_COLUMNS, id, event_from_row)?;
        event.apply(patch)?;
        tx.execute(
            "UPDATE events SET title = ?1, description = ?2, date = ?3, time = ?4, color = ?5
             WHERE id = ?6",
            params![
                event.title,
                event.description,
                event.date,
                event.time,
                event.color,
                id
            ],
        )?;
        tx.commit()?;
        tracing::debug!(id, "updated event");
        Ok(event)
    }

    fn delete_event(&self, id: i64) -> PersistenceResult<()> {
        let conn = self.connection.lock();
        delete_row(&conn, RecordKind::Event, id)
    }

    fn list_schedule_items(&self) -> PersistenceResult<Vec<ScheduleItem>> {
        let conn = self.connection.lock();
        let sql = format!("SELECT {SCHEDULE_COLUMNS} FROM schedule_items ORDER BY time ASC, id ASC");
        fetch_all(&conn, &sql, [], schedule_item_from_row)
    }

    fn get_schedule_item(&self, id: i64) -> PersistenceResult<ScheduleItem> {
        let conn = self.connection.lock();
        fetch_one(
            &conn,
            RecordKind::ScheduleItem,
            SCHEDULE_COLUMNS,
            id,
            schedule_item_from_row,
        )
    }

    fn create_schedule_item(&self, draft: NewScheduleItem) -> PersistenceResult<ScheduleItem> {
        let mut item = ScheduleItem::from_draft(draft)?;
        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO schedule_items (title, time, description, color)
             VALUES (?1, ?2, ?3, ?4)",
            params![item.title, item.time, item.description, item.color],
        )?;
        item.id = conn.last_insert_rowid();
        tracing::debug!(id = item.id, "created schedule item");
        Ok(item)
    }

    fn update_schedule_item(
        &self,
        id: i64,
        patch: ScheduleItemPatch,
    ) -> PersistenceResult<ScheduleItem> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        let mut item = fetch_one(
            &tx,
            RecordKind::ScheduleItem,
            SCHEDULE_COLUMNS,
            id,
            schedule_item_from_row,
        )?;
        item.apply(patch)?;
        tx.execute(
            "UPDATE schedule_items SET title = ?1, time = ?2, description = ?3, color = ?4
             WHERE id = ?5",
            params![item.title, item.time, item.description, item.color, id],
        )?;
        tx.commit()?;
        tracing::debug!(id, "updated schedule item");
        Ok(item)
    }

    fn delete_schedule_item(&self, id: i64) -> PersistenceResult<()> {
        let conn = self.connection.lock();
        delete_row(&conn, RecordKind::ScheduleItem, id)
    }

    fn list_sessions(&self) -> PersistenceResult<Vec<PomodoroSession>> {
        let conn = self.connection.lock();
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM pomodoro_sessions ORDER BY created_at ASC, id ASC"
        );
        fetch_all(&conn, &sql, [], session_from_row)
    }

    fn get_session(&self, id: i64) -> PersistenceResult<PomodoroSession> {
        let conn = self.connection.lock();
        fetch_one(
            &conn,
            RecordKind::PomodoroSession,
            SESSION_COLUMNS,
            id,
            session_from_row,
        )
    }

    fn record_session(
        &self,
        draft: NewPomodoroSession,
        now: NaiveDateTime,
    ) -> PersistenceResult<PomodoroSession> {
        let mut session = PomodoroSession::from_draft(draft, now)?;
        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO pomodoro_sessions (duration, completed, created_at) VALUES (?1, ?2, ?3)",
            params![session.duration, session.completed, session.created_at],
        )?;
        session.id = conn.last_insert_rowid();
        tracing::debug!(id = session.id, minutes = session.duration, "recorded pomodoro session");
        Ok(session)
    }

    fn delete_session(&self, id: i64) -> PersistenceResult<()> {
        let conn = self.connection.lock();
        delete_row(&conn, RecordKind::PomodoroSession, id)
    }

    fn count(&self, kind: RecordKind) -> PersistenceResult<usize> {
        let conn = self.connection.lock();
        let sql = format!("SELECT COUNT(*) FROM {}", table_name(kind));
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
