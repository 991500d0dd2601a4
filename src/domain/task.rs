use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a task, kept across edits of the same logical task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A tracked task
///
/// `elapsed` holds the time committed while the task was not running; the
/// in-progress interval of the active task lives in the timing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    /// Committed seconds, never negative
    pub elapsed: f64,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
}

impl Task {
    pub fn new(name: impl Into<String>, elapsed: f64) -> Self {
        Self {
            id: TaskId::new(),
            name: name.into(),
            elapsed: elapsed.max(0.0),
            is_completed: false,
        }
    }

    pub fn completed(mut self) -> Self {
        self.is_completed = true;
        self
    }

    /// Add a finished running interval to the committed time
    pub fn accumulate(&mut self, seconds: f64) {
        if seconds > 0.0 {
            self.elapsed += seconds;
        }
    }
}
