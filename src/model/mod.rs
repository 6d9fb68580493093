pub mod event;
pub mod note;
pub mod pomodoro;
pub mod schedule_item;
pub mod todo;

pub use event::{DateRange, Event, EventPatch, NewEvent};
pub use note::{NewNote, Note, NotePatch};
pub use pomodoro::{NewPomodoroSession, PomodoroSession};
pub use schedule_item::{NewScheduleItem, ScheduleItem, ScheduleItemPatch};
pub use todo::{NewTodo, Todo, TodoPatch};
