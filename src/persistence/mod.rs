pub mod files;
pub mod metadata;
pub mod store;

pub use files::{
    atomic_write, ensure_cliptimer_dir, get_cliptimer_dir, history_file, init_local_dir, meta_file, read_file,
    tasks_file, DIR_ENV_VAR,
};
pub use metadata::{load_history, load_metadata, save_history, save_metadata, SessionMetadata};
pub use store::{decode_tasks, encode_tasks, JsonFileStore, MemoryStore, TaskPersistence};
