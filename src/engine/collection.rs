use crate::domain::{Task, TaskId};
use crate::text::ParsedLine;
use std::collections::HashSet;

/// Ordered task list
///
/// Completed tasks always sit after incomplete ones; within each group the
/// order is otherwise preserved. Names are only a merge key and may repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted tasks, re-applying completed-last ordering
    ///
    /// Negative elapsed values are clamped to zero and a repeated id is
    /// replaced with a fresh one.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut seen = HashSet::new();
        let tasks = tasks
            .into_iter()
            .map(|mut task| {
                if task.elapsed.is_nan() || task.elapsed < 0.0 {
                    tracing::warn!(task = %task.id, elapsed = task.elapsed, "clamping invalid elapsed time");
                    task.elapsed = 0.0;
                }
                if !seen.insert(task.id) {
                    let fresh = TaskId::new();
                    tracing::warn!(task = %task.id, replacement = %fresh, "duplicate task id");
                    task.id = fresh;
                    seen.insert(fresh);
                }
                task
            })
            .collect();

        let mut collection = Self { tasks };
        collection.move_completed_to_end();
        collection
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// First task with exactly this name
    pub fn find_by_name(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Value copy of the current list
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Swap in a snapshot wholesale (undo/redo)
    pub fn restore(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.move_completed_to_end();
    }

    /// Remove a task; returns whether anything was removed
    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Rebuild the list from `lines`, in their order
    ///
    /// A line whose name matches a task of the previous list keeps that
    /// task's id; everything else gets a fresh id. Each previous task is
    /// claimed by at most one line, so repeated names get distinct ids.
    pub fn merge_replace(&mut self, lines: Vec<ParsedLine>) {
        let mut previous = std::mem::take(&mut self.tasks);
        self.tasks = lines
            .into_iter()
            .map(|line| match previous.iter().position(|t| t.name == line.name) {
                Some(index) => Task {
                    id: previous.remove(index).id,
                    name: line.name,
                    elapsed: line.elapsed,
                    is_completed: line.is_completed,
                },
                None => line.into_task(),
            })
            .collect();
        self.move_completed_to_end();
    }

    /// Update tasks in place by name and append the lines that match nothing
    pub fn merge_add(&mut self, lines: Vec<ParsedLine>) {
        for line in lines {
            match self.tasks.iter_mut().find(|t| t.name == line.name) {
                Some(existing) => {
                    existing.elapsed = line.elapsed;
                    existing.is_completed = line.is_completed;
                }
                None => self.tasks.push(line.into_task()),
            }
        }
        self.move_completed_to_end();
    }

    /// Mark a task completed and move it behind everything else
    pub fn finish(&mut self, id: TaskId) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return false;
        };
        let mut finished = self.tasks.remove(index);
        finished.is_completed = true;
        self.tasks.push(finished);
        self.move_completed_to_end();
        true
    }

    /// Clear the completed flag of a task
    pub fn restart(&mut self, id: TaskId) -> bool {
        let Some(task) = self.get_mut(id) else {
            return false;
        };
        task.is_completed = false;
        self.move_completed_to_end();
        true
    }

    /// Stable partition: incomplete first, completed last
    fn move_completed_to_end(&mut self) {
        let (incomplete, complete): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| !t.is_completed);
        self.tasks = incomplete;
        self.tasks.extend(complete);
    }
}
