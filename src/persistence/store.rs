use super::files::{atomic_write, read_file};
use crate::domain::Task;
use crate::error::StoreResult;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Key-value blob store for the task list
pub trait TaskPersistence {
    fn save(&mut self, tasks: &[Task]) -> StoreResult<()>;
    /// Stored tasks, or an empty list when nothing was saved yet
    fn load(&mut self) -> StoreResult<Vec<Task>>;
}

/// Serialize tasks as the JSON array `[{id, name, elapsed, isCompleted}, ...]`
pub fn encode_tasks(tasks: &[Task]) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

pub fn decode_tasks(content: &str) -> StoreResult<Vec<Task>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(content)?)
}

/// tasks.json on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskPersistence for JsonFileStore {
    fn save(&mut self, tasks: &[Task]) -> StoreResult<()> {
        atomic_write(&self.path, &encode_tasks(tasks)?)?;
        tracing::debug!(count = tasks.len(), path = %self.path.display(), "saved tasks");
        Ok(())
    }

    fn load(&mut self) -> StoreResult<Vec<Task>> {
        let tasks = match read_file(&self.path)? {
            Some(content) => decode_tasks(&content)?,
            None => Vec::new(),
        };
        tracing::debug!(count = tasks.len(), path = %self.path.display(), "loaded tasks");
        Ok(tasks)
    }
}

/// In-memory JSON blob; clones share the blob
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw stored content (possibly corrupt)
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            blob: Rc::new(RefCell::new(Some(content.into()))),
        }
    }

    pub fn content(&self) -> Option<String> {
        self.blob.borrow().clone()
    }

    pub fn has_data(&self) -> bool {
        self.blob.borrow().is_some()
    }
}

impl TaskPersistence for MemoryStore {
    fn save(&mut self, tasks: &[Task]) -> StoreResult<()> {
        *self.blob.borrow_mut() = Some(encode_tasks(tasks)?);
        Ok(())
    }

    fn load(&mut self) -> StoreResult<Vec<Task>> {
        match self.blob.borrow().as_deref() {
            Some(content) => decode_tasks(content),
            None => Ok(Vec::new()),
        }
    }
}
