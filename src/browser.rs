//! Scrollable history browser.
//!
//! One frame record exists per stored entry (at least one, so an empty
//! history still shows a blank window). Frames are stacked vertically and
//! slide together when the scroll index changes; the visible window is
//! simply whichever frames overlap the screen. All animation is plain
//! `(from, to, remaining)` data advanced one tick per update.

use crate::assets::AssetCache;
use crate::history::{HistoryEntry, MessageHistory};
use crate::input::{Button, InputState};
use crate::markup::DEFAULT_ESCAPE;
use crate::render::entry as entry_render;
use crate::render::font::FontLibrary;
use crate::render::skin::{arrow_rect, background_rect};
use crate::render::surface::Surface;
use crate::sound::{SoundPlayer, SystemSound};
use crate::transition::ScreenFade;

/// Frames that fit on screen at once.
pub const VISIBLE_FRAMES: usize = 3;
/// Logical screen size.
pub const SCREEN_WIDTH: u32 = 320;
pub const SCREEN_HEIGHT: u32 = 240;
/// Full frame size; contents are inset by an 8 px border on each side.
pub const FRAME_WIDTH: u32 = SCREEN_WIDTH;
pub const FRAME_HEIGHT: i32 = 80;
const FRAME_BORDER: i32 = 8;
/// Scroll slide duration in ticks.
pub const SCROLL_TICKS: u32 = 7;
/// Arrow blink half-period in ticks.
pub const ARROW_BLINK_TICKS: u32 = 20;
/// Fade duration handed to the transition collaborator.
pub const FADE_TICKS: u32 = 6;

/// Whether the browser is still running after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserStatus {
    Open,
    Closed,
}

/// One on-screen frame: a bordered surface plus movement state.
#[derive(Debug)]
pub struct FrameSlot {
    /// Entry contents, frame-sized; the window border area stays untouched
    /// by entry painting.
    pub contents: Surface,
    pub x: i32,
    y: i32,
    move_from: i32,
    move_to: i32,
    remaining: u32,
    total: u32,
    pub visible: bool,
}

impl FrameSlot {
    fn new(x: i32, y: i32) -> Self {
        Self {
            contents: Surface::new(FRAME_WIDTH, FRAME_HEIGHT as u32),
            x,
            y,
            move_from: y,
            move_to: y,
            remaining: 0,
            total: 0,
            visible: true,
        }
    }

    /// Current vertical position, mid-animation positions included.
    pub fn y(&self) -> i32 {
        self.y
    }

    fn start_move(&mut self, dy: i32, ticks: u32) {
        self.move_from = self.y;
        self.move_to = self.y + dy;
        self.remaining = ticks;
        self.total = ticks;
    }

    fn tick(&mut self) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        self.y = self.move_to
            - (self.move_to - self.move_from) * self.remaining as i32 / self.total as i32;
    }

    pub fn is_moving(&self) -> bool {
        self.remaining > 0
    }
}

/// Blinking scroll indicator cut from a skin sheet.
#[derive(Debug)]
struct ArrowSprite {
    surface: Surface,
    x: i32,
    y: i32,
}

/// Scene-scoped controller over the captured history.
pub struct HistoryBrowser {
    entries: Vec<HistoryEntry>,
    frames: Vec<FrameSlot>,
    top_index: usize,
    arrow_frame: u32,
    up_arrow: Option<ArrowSprite>,
    down_arrow: Option<ArrowSprite>,
    up_arrow_visible: bool,
    down_arrow_visible: bool,
    escape: char,
    sound: Box<dyn SoundPlayer>,
    fade: Box<dyn ScreenFade>,
    closed: bool,
}

impl std::fmt::Debug for HistoryBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryBrowser")
            .field("entries", &self.entries.len())
            .field("top_index", &self.top_index)
            .field("closed", &self.closed)
            .finish()
    }
}

impl HistoryBrowser {
    /// Open the browser over the current history.
    ///
    /// Reads the store once (entries are immutable snapshots), builds one
    /// frame per entry positioned so the newest [`VISIBLE_FRAMES`] are on
    /// screen, paints everything, and fires the open sound and fade-in.
    pub fn open(
        store: &MessageHistory,
        assets: &mut AssetCache,
        fonts: &mut FontLibrary,
        mut sound: Box<dyn SoundPlayer>,
        mut fade: Box<dyn ScreenFade>,
    ) -> Self {
        let entries: Vec<HistoryEntry> = store.iter().cloned().collect();
        let top_index = entries.len().saturating_sub(VISIBLE_FRAMES);

        let frame_count = entries.len().max(1);
        let frames = (0..frame_count)
            .map(|i| FrameSlot::new(0, (i as i32 - top_index as i32) * FRAME_HEIGHT))
            .collect();

        sound.play(SystemSound::Decision);
        fade.fade_in(FADE_TICKS);

        let skin_name = entries.last().map(|e| e.skin_name.clone()).unwrap_or_default();
        let mut browser = Self {
            entries,
            frames,
            top_index,
            arrow_frame: 0,
            up_arrow: make_arrow(assets, &skin_name, false),
            down_arrow: make_arrow(assets, &skin_name, true),
            up_arrow_visible: false,
            down_arrow_visible: false,
            escape: DEFAULT_ESCAPE,
            sound,
            fade,
            closed: false,
        };

        browser.refresh_frames(assets, fonts);
        browser.update_arrows();
        browser
    }

    /// Override the escape introducer used when replaying entries.
    pub fn set_escape_char(&mut self, escape: char) {
        self.escape = escape;
    }

    /// Advance one tick: blink, animation, then input.
    ///
    /// Close input is honored even while frames are sliding; scroll input is
    /// suspended until every frame has settled.
    pub fn update(
        &mut self,
        input: &InputState,
        assets: &mut AssetCache,
        fonts: &mut FontLibrary,
    ) -> BrowserStatus {
        if self.closed {
            return BrowserStatus::Closed;
        }

        self.arrow_frame = (self.arrow_frame + 1) % (ARROW_BLINK_TICKS * 2);
        self.update_arrows();

        for frame in &mut self.frames {
            frame.tick();
        }

        if input.is_triggered(Button::Cancel) || input.is_triggered(Button::History) {
            self.sound.play(SystemSound::Cancel);
            self.fade.fade_out(FADE_TICKS);
            self.closed = true;
            return BrowserStatus::Closed;
        }

        if self.is_scrolling() || self.entries.is_empty() {
            return BrowserStatus::Open;
        }

        let max_top = self.entries.len().saturating_sub(VISIBLE_FRAMES);
        let old_top = self.top_index;

        if input.is_repeated(Button::Up) && self.top_index > 0 {
            self.top_index -= 1;
            self.sound.play(SystemSound::Cursor);
        }
        if input.is_repeated(Button::Down) && self.top_index < max_top {
            self.top_index += 1;
            self.sound.play(SystemSound::Cursor);
        }

        if old_top != self.top_index {
            let dy = (old_top as i32 - self.top_index as i32) * FRAME_HEIGHT;
            for frame in &mut self.frames {
                frame.start_move(dy, SCROLL_TICKS);
            }
            self.refresh_frames(assets, fonts);
        }

        BrowserStatus::Open
    }

    /// Repaint every frame from its assigned entry.
    fn refresh_frames(&mut self, assets: &mut AssetCache, fonts: &mut FontLibrary) {
        for (i, frame) in self.frames.iter_mut().enumerate() {
            frame.contents.clear();
            // With an empty history the single placeholder frame stays blank.
            if let Some(entry) = self.entries.get(i) {
                paint_frame(entry, self.escape, assets, fonts, &mut frame.contents);
            }
            frame.visible = true;
        }
    }

    fn update_arrows(&mut self) {
        let blink_on = self.arrow_frame < ARROW_BLINK_TICKS;
        self.up_arrow_visible = self.top_index > 0 && blink_on;
        self.down_arrow_visible =
            self.top_index + VISIBLE_FRAMES < self.entries.len() && blink_on;
    }

    pub fn is_scrolling(&self) -> bool {
        self.frames.iter().any(FrameSlot::is_moving)
    }

    pub fn top_index(&self) -> usize {
        self.top_index
    }

    pub fn frames(&self) -> &[FrameSlot] {
        &self.frames
    }

    pub fn up_arrow_visible(&self) -> bool {
        self.up_arrow_visible
    }

    pub fn down_arrow_visible(&self) -> bool {
        self.down_arrow_visible
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Arrow sprite pixels with their screen positions, for hosts that
    /// composite the scene themselves.
    pub fn arrow_surfaces(&self) -> [Option<(&Surface, i32, i32)>; 2] {
        let up = match &self.up_arrow {
            Some(a) if self.up_arrow_visible => Some((&a.surface, a.x, a.y)),
            _ => None,
        };
        let down = match &self.down_arrow {
            Some(a) if self.down_arrow_visible => Some((&a.surface, a.x, a.y)),
            _ => None,
        };
        [up, down]
    }
}

/// Paint one entry into a frame surface: skin background under the border,
/// then the entry replay inset by the border.
fn paint_frame(
    entry: &HistoryEntry,
    escape: char,
    assets: &mut AssetCache,
    fonts: &mut FontLibrary,
    surface: &mut Surface,
) {
    if !entry.skin_name.is_empty() {
        if let Some(skin) = assets.system(&entry.skin_name) {
            surface.tile(skin, background_rect());
        }
    }

    let mut contents = Surface::new(
        FRAME_WIDTH - 2 * FRAME_BORDER as u32,
        FRAME_HEIGHT as u32 - 2 * FRAME_BORDER as u32,
    );
    entry_render::render(entry, escape, assets, fonts, &mut contents);

    // Composite the contents into the bordered frame.
    for y in 0..contents.height() {
        for x in 0..contents.width() {
            if let Some([r, g, b, a]) = contents.pixel(x, y) {
                if a > 0 {
                    surface.blend_pixel(
                        x as i32 + FRAME_BORDER,
                        y as i32 + FRAME_BORDER,
                        crate::render::Rgba::new(r, g, b, a),
                    );
                }
            }
        }
    }
}

/// Cut a 16x8 arrow sprite out of the skin sheet.
fn make_arrow(assets: &mut AssetCache, skin_name: &str, down: bool) -> Option<ArrowSprite> {
    if skin_name.is_empty() {
        return None;
    }
    let skin = assets.system(skin_name)?;
    let rect = arrow_rect(down);
    let mut surface = Surface::new(rect.width, rect.height);
    surface.blit(0, 0, skin, rect, false);

    Some(ArrowSprite {
        surface,
        x: SCREEN_WIDTH as i32 / 2 - rect.width as i32 / 2,
        y: if down {
            SCREEN_HEIGHT as i32 - rect.height as i32
        } else {
            0
        },
    })
}
