pub mod enums;
pub mod task;
pub mod time_format;

pub use enums::{ActionLabel, SyncMode};
pub use task::{Task, TaskId};
pub use time_format::{format_hms, format_hms_blink};
