//! Scene-transition collaborator contract.
//!
//! The pixel effect lives in the host's scene framework; the browser only
//! issues fade directives with a tick duration.

/// Host-side screen fade primitive.
pub trait ScreenFade {
    fn fade_in(&mut self, ticks: u32);
    fn fade_out(&mut self, ticks: u32);
}

/// Fade that does nothing.
#[derive(Debug, Default)]
pub struct NullFade;

impl ScreenFade for NullFade {
    fn fade_in(&mut self, _ticks: u32) {}
    fn fade_out(&mut self, _ticks: u32) {}
}
