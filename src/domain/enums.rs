use serde::{Deserialize, Serialize};
use std::fmt;

/// How incoming text is merged into the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// The text becomes the whole list
    Replace,
    /// The text updates tasks by name and appends the rest
    Add,
}

/// Human-readable name of a mutation, handed to the history collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionLabel {
    ReplaceTasks,
    AddTasks,
    DeleteTask,
    CutAllTasks,
    FinishTask,
    RestartTask,
}

impl ActionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReplaceTasks => "Replace tasks",
            Self::AddTasks => "Add tasks",
            Self::DeleteTask => "Delete task",
            Self::CutAllTasks => "Cut all tasks",
            Self::FinishTask => "Finish task",
            Self::RestartTask => "Restart task",
        }
    }

    pub fn for_sync(mode: SyncMode) -> Self {
        match mode {
            SyncMode::Replace => Self::ReplaceTasks,
            SyncMode::Add => Self::AddTasks,
        }
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
