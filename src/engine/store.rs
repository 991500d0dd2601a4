use super::clock::Clock;
use super::collection::TaskCollection;
use super::history::{History, HistoryEntry};
use super::timing::{ActiveTask, TimingEngine};
use crate::clipboard::TextChannel;
use crate::domain::{ActionLabel, SyncMode, Task, TaskId};
use crate::persistence::{SessionMetadata, TaskPersistence};
use crate::text::{parse_line, render_editor_text, render_summary, resolve_symbol, ParsedLine, SummaryLabels};
use anyhow::Result;

/// Task list, timer and item symbol behind one explicit context
///
/// Every mutation of the list hands a before/after snapshot to the history
/// collaborator and saves through the persistence collaborator. Single
/// threaded; callers sharing a store across threads must put it behind one
/// lock.
pub struct TaskStore {
    tasks: TaskCollection,
    timing: TimingEngine,
    item_symbol: String,
    labels: SummaryLabels,
    /// Set while the editor holds a task it paused itself
    editor_paused: bool,
    clock: Box<dyn Clock>,
    history: Box<dyn History>,
    persistence: Box<dyn TaskPersistence>,
}

impl TaskStore {
    /// Empty store; nothing is loaded
    pub fn new(
        clock: Box<dyn Clock>,
        history: Box<dyn History>,
        persistence: Box<dyn TaskPersistence>,
    ) -> Self {
        Self {
            tasks: TaskCollection::new(),
            timing: TimingEngine::new(),
            item_symbol: String::new(),
            labels: SummaryLabels::default(),
            editor_paused: false,
            clock,
            history,
            persistence,
        }
    }

    /// Store hydrated from persistence
    ///
    /// Corrupt stored data is logged and the store starts empty.
    pub fn open(
        clock: Box<dyn Clock>,
        history: Box<dyn History>,
        persistence: Box<dyn TaskPersistence>,
    ) -> Self {
        let mut store = Self::new(clock, history, persistence);
        match store.persistence.load() {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "hydrated task list");
                store.tasks = TaskCollection::from_tasks(tasks);
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not load saved tasks, starting with an empty list");
            }
        }
        store
    }

    pub fn with_labels(mut self, labels: SummaryLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Apply saved session state, ignoring references to unknown tasks
    pub fn restore_session(&mut self, metadata: &SessionMetadata) {
        let active = match (metadata.active_task_id, metadata.active_started_at) {
            (Some(id), Some(started_at)) if self.tasks.get(id).is_some_and(|t| !t.is_completed) => {
                Some(ActiveTask { id, started_at })
            }
            _ => None,
        };
        self.timing = TimingEngine::from_parts(active, metadata.last_paused_task_id);
        self.timing.drop_stale(&self.tasks);
        self.item_symbol = metadata.item_symbol.clone();
        self.reset_symbol_if_empty();
    }

    pub fn session_metadata(&self) -> SessionMetadata {
        let active = self.timing.active();
        SessionMetadata {
            active_task_id: active.map(|a| a.id),
            active_started_at: active.map(|a| a.started_at),
            last_paused_task_id: self.timing.last_paused_id(),
            item_symbol: self.item_symbol.clone(),
        }
    }

    // --- Queries ---

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Task> {
        self.tasks.find_by_name(name)
    }

    pub fn item_symbol(&self) -> &str {
        &self.item_symbol
    }

    pub fn labels(&self) -> &SummaryLabels {
        &self.labels
    }

    pub fn active_task_id(&self) -> Option<TaskId> {
        self.timing.active_id()
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.timing.active_id().and_then(|id| self.tasks.get(id))
    }

    pub fn has_active_task(&self) -> bool {
        self.timing.has_active()
    }

    pub fn is_active(&self, id: TaskId) -> bool {
        self.timing.is_active(id)
    }

    pub fn last_paused_task_id(&self) -> Option<TaskId> {
        self.timing.last_paused_id()
    }

    /// Committed time plus the live interval for the running task
    pub fn current_elapsed(&self, task: &Task) -> f64 {
        self.timing.current_elapsed(task, self.clock.now())
    }

    pub fn total_elapsed(&self) -> f64 {
        self.timing.total_elapsed(self.tasks.tasks(), self.clock.now())
    }

    /// Clipboard summary with live elapsed values
    pub fn summary(&self) -> String {
        let now = self.clock.now();
        render_summary(self.tasks.tasks(), &self.item_symbol, &self.labels, |t| {
            self.timing.current_elapsed(t, now)
        })
    }

    /// Text the task editor is seeded with
    pub fn editor_text(&self) -> String {
        let now = self.clock.now();
        render_editor_text(self.tasks.tasks(), |t| self.timing.current_elapsed(t, now))
    }

    // --- List mutations ---

    /// Merge multi-line text into the list
    pub fn sync(&mut self, raw: &str, mode: SyncMode) {
        let lines: Vec<&str> = raw.lines().collect();
        let parsed: Vec<ParsedLine> = lines.iter().filter_map(|line| parse_line(line)).collect();

        // The running interval is committed before the merge overwrites the
        // running task's elapsed value, and before the undo snapshot.
        // A running task marked completed by the text stops for good.
        let active_update = self.active_task().and_then(|active| {
            parsed
                .iter()
                .find(|line| line.name == active.name)
                .map(|line| line.is_completed)
        });
        if let Some(completes) = active_update {
            let now = self.clock.now();
            match (mode, completes) {
                (_, true) => {
                    self.timing.commit_active(&mut self.tasks, now);
                }
                (SyncMode::Replace, false) => self.timing.checkpoint(&mut self.tasks, now),
                (SyncMode::Add, false) => {
                    self.timing.pause_active(&mut self.tasks, now);
                }
            }
        }

        self.mutate(ActionLabel::for_sync(mode), |store| {
            store.item_symbol = resolve_symbol(&lines, &store.item_symbol, mode);
            match mode {
                SyncMode::Replace => store.tasks.merge_replace(parsed),
                SyncMode::Add => store.tasks.merge_add(parsed),
            }
        });
    }

    pub fn replace_tasks(&mut self, raw: &str) {
        self.sync(raw, SyncMode::Replace);
    }

    pub fn add_tasks(&mut self, raw: &str) {
        self.sync(raw, SyncMode::Add);
    }

    pub fn delete_task(&mut self, id: TaskId) {
        self.mutate(ActionLabel::DeleteTask, |store| {
            store.tasks.delete(id);
        });
    }

    /// Complete a task, committing its time first if it is running
    pub fn finish_task(&mut self, id: TaskId) {
        if !self.tasks.contains(id) {
            return;
        }
        if self.timing.is_active(id) {
            let now = self.clock.now();
            self.timing.commit_active(&mut self.tasks, now);
        }
        self.mutate(ActionLabel::FinishTask, |store| {
            store.tasks.finish(id);
        });
    }

    pub fn finish_active_task(&mut self) {
        if let Some(id) = self.timing.active_id() {
            self.finish_task(id);
        }
    }

    /// Mark a completed task as not completed again
    pub fn restart_task(&mut self, id: TaskId) {
        if !self.tasks.get(id).is_some_and(|t| t.is_completed) {
            return;
        }
        self.mutate(ActionLabel::RestartTask, |store| {
            store.tasks.restart(id);
        });
    }

    /// Empty the list after handing the summary to `channel`
    ///
    /// Returns false (and changes nothing) when the list is already empty.
    pub fn cut_all(&mut self, channel: &mut dyn TextChannel) -> Result<bool> {
        if self.tasks.is_empty() {
            return Ok(false);
        }
        channel.write_text(&self.summary())?;
        self.mutate(ActionLabel::CutAllTasks, |store| {
            store.tasks.clear();
            store.item_symbol.clear();
        });
        Ok(true)
    }

    pub fn copy_summary(&self, channel: &mut dyn TextChannel) -> Result<()> {
        channel.write_text(&self.summary())
    }

    /// Replace the list with the channel's text; returns whether there was any
    pub fn paste_replace(&mut self, channel: &mut dyn TextChannel) -> Result<bool> {
        self.paste(channel, SyncMode::Replace)
    }

    /// Merge the channel's text into the list; returns whether there was any
    pub fn paste_append(&mut self, channel: &mut dyn TextChannel) -> Result<bool> {
        self.paste(channel, SyncMode::Add)
    }

    fn paste(&mut self, channel: &mut dyn TextChannel, mode: SyncMode) -> Result<bool> {
        match channel.read_text()? {
            Some(text) if !text.trim().is_empty() => {
                self.sync(&text, mode);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // --- Timer ---

    pub fn toggle(&mut self, id: TaskId) {
        let now = self.clock.now();
        let was_running = self.timing.active_id();
        self.timing.toggle(&mut self.tasks, id, now);
        if was_running.is_some() {
            self.save();
        }
    }

    pub fn pause_active(&mut self) {
        let now = self.clock.now();
        if self.timing.pause_active(&mut self.tasks, now).is_some() {
            self.save();
        }
    }

    pub fn restart_last_paused(&mut self) {
        let now = self.clock.now();
        let was_running = self.timing.active_id();
        if self.timing.restart_last_paused(&mut self.tasks, now) && was_running.is_some() {
            self.save();
        }
    }

    /// Pause (remembering) the running task and save; used before exit
    pub fn pause_active_and_save(&mut self) {
        let now = self.clock.now();
        match self.timing.pause_active(&mut self.tasks, now) {
            Some(id) => tracing::debug!(task = %id, "paused running task before exit"),
            None => tracing::debug!("no running task to pause before exit"),
        }
        self.save();
    }

    // --- Editor session ---

    /// Pause the running task for editing and return the editor text
    pub fn begin_edit(&mut self) -> String {
        let now = self.clock.now();
        self.editor_paused = self.timing.pause_active(&mut self.tasks, now).is_some();
        if self.editor_paused {
            self.save();
        }
        self.editor_text()
    }

    /// Apply the edited text and resume the task the editor paused
    ///
    /// A task paused by the user before the editor opened stays paused.
    pub fn end_edit(&mut self, text: &str) {
        if !text.trim().is_empty() {
            self.sync(text, SyncMode::Add);
        }
        if std::mem::take(&mut self.editor_paused) {
            self.restart_last_paused();
        }
    }

    // --- History ---

    /// Revert the latest mutation; returns its label
    pub fn undo(&mut self) -> Option<ActionLabel> {
        let entry = self.history.undo()?;
        self.apply_snapshot(entry.before);
        Some(entry.label)
    }

    /// Re-apply the latest reverted mutation; returns its label
    pub fn redo(&mut self) -> Option<ActionLabel> {
        let entry = self.history.redo()?;
        self.apply_snapshot(entry.after);
        Some(entry.label)
    }

    /// The running task keeps its start instant, so its live interval is
    /// added on top of the restored committed value.
    fn apply_snapshot(&mut self, tasks: Vec<Task>) {
        let now = self.clock.now();
        self.tasks.restore(tasks);
        self.timing.drop_stale(&self.tasks);
        if self.active_task().is_some_and(|t| t.is_completed) {
            self.timing.commit_active(&mut self.tasks, now);
        }
        self.reset_symbol_if_empty();
        self.save();
    }

    // --- Internals ---

    fn mutate<F>(&mut self, label: ActionLabel, mutation: F)
    where
        F: FnOnce(&mut Self),
    {
        let before = self.tasks.snapshot();
        mutation(self);
        self.timing.drop_stale(&self.tasks);
        self.reset_symbol_if_empty();
        let after = self.tasks.snapshot();
        tracing::debug!(action = %label, before = before.len(), after = after.len(), "task list changed");
        self.history.record(HistoryEntry { label, before, after });
        self.save();
    }

    fn reset_symbol_if_empty(&mut self) {
        if self.tasks.is_empty() {
            self.item_symbol.clear();
        }
    }

    fn save(&mut self) {
        if let Err(err) = self.persistence.save(self.tasks.tasks()) {
            tracing::warn!(error = %err, "failed to save tasks");
        }
    }
}
