pub mod clock;
pub mod collection;
pub mod history;
pub mod store;
pub mod timing;

pub use clock::{seconds_between, Clock, ManualClock, SystemClock};
pub use collection::TaskCollection;
pub use history::{History, HistoryEntry, SharedHistory, UndoHistory, DEFAULT_UNDO_LIMIT};
pub use store::TaskStore;
pub use timing::{ActiveTask, TimingEngine};
