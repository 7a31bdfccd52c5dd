//! Bounded message history storage.
//!
//! Every displayed message is captured as a self-sufficient snapshot
//! (`HistoryEntry`) holding the raw text with its control sequences and the
//! names of the resources that were active when it was shown. Re-rendering
//! later looks those resources up again by name, so no pixels are stored.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum number of history entries to keep.
pub const MAX_ENTRIES: usize = 100;

/// Vertical placement of the message window when it was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowPosition {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// Face graphic descriptor.
///
/// `index < 0` or an empty `name` means the message had no face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRef {
    pub name: String,
    pub index: i32,
    /// Horizontally mirrored when drawn.
    pub flipped: bool,
    /// Face sits at the right edge instead of the left.
    pub right_aligned: bool,
}

impl Default for FaceRef {
    fn default() -> Self {
        Self {
            name: String::new(),
            index: -1,
            flipped: false,
            right_aligned: false,
        }
    }
}

impl FaceRef {
    /// Whether this descriptor actually names a face.
    pub fn is_present(&self) -> bool {
        !self.name.is_empty() && self.index >= 0
    }
}

/// One captured message, complete enough to re-render on its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Raw message text, control sequences included.
    pub text: String,

    pub face: FaceRef,

    /// Window-skin sheet that was active when the message was shown.
    /// Re-rendering must use this skin, not whatever is current.
    pub skin_name: String,

    pub position: WindowPosition,
    pub transparent: bool,
    pub position_fixed: bool,
    pub stretch: i32,

    /// Choice options, when the message ended in a choice.
    pub choices: Vec<String>,
    /// Index of the option the player picked; -1 if none or unresolved.
    pub selected_choice: i32,

    /// Frame counter at capture time, monotonically non-decreasing.
    pub timestamp: u32,
}

impl HistoryEntry {
    /// Plain text entry with a skin, no face.
    pub fn new(text: impl Into<String>, skin_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            skin_name: skin_name.into(),
            selected_choice: -1,
            ..Self::default()
        }
    }
}

/// FIFO store of the last [`MAX_ENTRIES`] messages, oldest first.
#[derive(Debug, Default)]
pub struct MessageHistory {
    entries: VecDeque<HistoryEntry>,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry, evicting the oldest when full.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// All stored entries, oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries. Idempotent.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: u32) -> HistoryEntry {
        HistoryEntry {
            timestamp: n,
            ..HistoryEntry::new(format!("message {n}"), "Skin")
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let mut history = MessageHistory::new();
        for n in 0..5 {
            history.push(entry(n));
        }
        let stamps: Vec<u32> = history.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut history = MessageHistory::new();
        for n in 0..(MAX_ENTRIES as u32 + 3) {
            history.push(entry(n));
        }
        assert_eq!(history.len(), MAX_ENTRIES);
        assert_eq!(history.iter().next().unwrap().timestamp, 3);
        assert_eq!(history.iter().last().unwrap().timestamp, 102);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut history = MessageHistory::new();
        history.push(entry(0));
        history.clear();
        history.clear();
        assert!(history.is_empty());
    }
}
