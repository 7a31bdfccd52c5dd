//! Sound-effect collaborator contract.
//!
//! The backlog never plays audio itself; it reports which system sound
//! should fire and the host's player does the rest. Calls are
//! fire-and-forget.

/// System sound effects the browser can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemSound {
    /// Browser opened.
    Decision,
    /// Browser closed.
    Cancel,
    /// Scroll position changed.
    Cursor,
}

/// Host-side sound playback.
pub trait SoundPlayer {
    fn play(&mut self, sound: SystemSound);
}

/// Player that discards every request.
#[derive(Debug, Default)]
pub struct NullSound;

impl SoundPlayer for NullSound {
    fn play(&mut self, _sound: SystemSound) {}
}
