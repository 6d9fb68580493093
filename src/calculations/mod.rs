pub mod productivity;

pub use productivity::{DailySessions, ProductivityStats, TodoProgress, aggregate, todo_progress};
