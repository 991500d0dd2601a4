//! Clipboard-driven task timer.
//!
//! Tasks arrive as pasted text (`"• Review Code: 1:05"`), one of them runs
//! at a time, and the list goes back to the clipboard as a summary with a
//! working-time total. [`engine::TaskStore`] owns the list, the timer and the
//! item symbol; clock, history and persistence are injected.

pub mod clipboard;
pub mod domain;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod text;
pub mod ticker;
