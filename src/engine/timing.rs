use super::clock::seconds_between;
use super::collection::TaskCollection;
use crate::domain::{Task, TaskId};
use chrono::{DateTime, Local};

/// The task currently accumulating time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTask {
    pub id: TaskId,
    pub started_at: DateTime<Local>,
}

/// Exclusive activation state machine: Idle or Running(task, start)
///
/// Only pausing commits time into a task's `elapsed`; reads combine the
/// committed value with the live interval. Every operation whose
/// preconditions do not hold is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimingEngine {
    active: Option<ActiveTask>,
    last_paused: Option<TaskId>,
}

impl TimingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from saved session state
    pub fn from_parts(active: Option<ActiveTask>, last_paused: Option<TaskId>) -> Self {
        Self { active, last_paused }
    }

    pub fn active(&self) -> Option<ActiveTask> {
        self.active
    }

    pub fn active_id(&self) -> Option<TaskId> {
        self.active.map(|a| a.id)
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_active(&self, id: TaskId) -> bool {
        self.active_id() == Some(id)
    }

    pub fn last_paused_id(&self) -> Option<TaskId> {
        self.last_paused
    }

    /// Start `id`, or stop it if it is the one running
    ///
    /// Stopping remembers the task for [`restart_last_paused`]. Starting a
    /// different task commits the running one first. Completed tasks are
    /// never activated.
    ///
    /// [`restart_last_paused`]: TimingEngine::restart_last_paused
    pub fn toggle(&mut self, tasks: &mut TaskCollection, id: TaskId, now: DateTime<Local>) {
        let Some(task) = tasks.get(id) else {
            return;
        };

        if self.is_active(id) {
            self.pause_active(tasks, now);
        } else if !task.is_completed {
            self.commit_active(tasks, now);
            self.activate(id, now);
        }
    }

    /// Stop the running task, commit its interval and remember it
    pub fn pause_active(&mut self, tasks: &mut TaskCollection, now: DateTime<Local>) -> Option<TaskId> {
        let paused = self.commit_active(tasks, now)?;
        self.last_paused = Some(paused);
        Some(paused)
    }

    /// Resume the remembered task, stopping whatever runs now
    ///
    /// Returns false when nothing is remembered, the task is gone, or it has
    /// been completed since.
    pub fn restart_last_paused(&mut self, tasks: &mut TaskCollection, now: DateTime<Local>) -> bool {
        let Some(paused) = self.last_paused else {
            return false;
        };
        match tasks.get(paused) {
            Some(task) if !task.is_completed => {}
            _ => return false,
        }

        self.commit_active(tasks, now);
        self.activate(paused, now);
        self.last_paused = None;
        true
    }

    /// Commit the running interval without stopping the timer
    ///
    /// Used before the committed value of the running task is overwritten.
    pub fn checkpoint(&mut self, tasks: &mut TaskCollection, now: DateTime<Local>) {
        if let Some(id) = self.commit_active(tasks, now) {
            self.activate(id, now);
        }
    }

    /// Stop the running task without remembering it
    ///
    /// Returns the id that was running, if any.
    pub fn commit_active(&mut self, tasks: &mut TaskCollection, now: DateTime<Local>) -> Option<TaskId> {
        let active = self.active.take()?;
        let interval = seconds_between(active.started_at, now);
        if let Some(task) = tasks.get_mut(active.id) {
            task.accumulate(interval);
            tracing::debug!(task = %active.id, seconds = interval, "committed running interval");
        }
        Some(active.id)
    }

    /// Forget references to tasks that no longer exist
    pub fn drop_stale(&mut self, tasks: &TaskCollection) {
        if let Some(active) = self.active {
            if !tasks.contains(active.id) {
                tracing::debug!(task = %active.id, "dropping activation of removed task");
                self.active = None;
            }
        }
        if let Some(paused) = self.last_paused {
            if !tasks.contains(paused) {
                self.last_paused = None;
            }
        }
    }

    /// Committed time plus the live interval when `task` is running
    pub fn current_elapsed(&self, task: &Task, now: DateTime<Local>) -> f64 {
        match self.active {
            Some(active) if active.id == task.id => task.elapsed + seconds_between(active.started_at, now),
            _ => task.elapsed,
        }
    }

    pub fn total_elapsed(&self, tasks: &[Task], now: DateTime<Local>) -> f64 {
        tasks.iter().map(|t| self.current_elapsed(t, now)).sum()
    }

    fn activate(&mut self, id: TaskId, now: DateTime<Local>) {
        tracing::debug!(task = %id, "task activated");
        self.active = Some(ActiveTask { id, started_at: now });
    }
}
