//! Dialogue backlog
//!
//! Captures in-game dialogue messages as replayable snapshots and re-renders
//! them on demand, control sequences and all, for a scrollable history
//! browser.

pub mod assets;
pub mod browser;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod markup;
pub mod render;
pub mod sound;
pub mod transition;

pub use error::{Error, Result};
pub use history::{HistoryEntry, MessageHistory, MAX_ENTRIES};
