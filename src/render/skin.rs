//! Window-skin sheet conventions.
//!
//! A skin sheet is a 160x80 image with fixed sub-regions: the tiled window
//! background in the top-left 32x32 cell, the scroll arrows at (40, 8) and
//! (40, 16), and a 20-color text palette as two rows of ten 16x16 cells
//! starting at (0, 48). All lookups degrade to defined fallbacks when the
//! sheet is missing or undersized.

use crate::assets::TextureData;
use crate::render::{Rect, Rgba};

/// Nominal skin sheet size.
pub const SKIN_WIDTH: u32 = 160;
pub const SKIN_HEIGHT: u32 = 80;

/// Number of selectable text colors.
pub const PALETTE_COLORS: u32 = 20;

/// Palette index drawn when no color escape is active.
pub const DEFAULT_COLOR: u32 = 0;

const PALETTE_CELL: u32 = 16;
const PALETTE_TOP: u32 = 48;
const PALETTE_PER_ROW: u32 = 10;

/// Tiled window background cell.
pub fn background_rect() -> Rect {
    Rect::new(0, 0, 32, 32)
}

/// Scroll arrow cell, 16x8.
pub fn arrow_rect(down: bool) -> Rect {
    Rect::new(40, if down { 16 } else { 8 }, 16, 8)
}

/// Representative color for a palette index, sampled from the center of its
/// cell. Out-of-range indices and missing pixels fall back to opaque white.
pub fn palette_color(skin: Option<&TextureData>, index: u32) -> Rgba {
    let Some(skin) = skin else {
        return Rgba::WHITE;
    };
    if index >= PALETTE_COLORS {
        return Rgba::WHITE;
    }
    let x = (index % PALETTE_PER_ROW) * PALETTE_CELL + PALETTE_CELL / 2;
    let y = PALETTE_TOP + (index / PALETTE_PER_ROW) * PALETTE_CELL + PALETTE_CELL / 2;
    match skin.pixel(x, y) {
        Some([r, g, b, _]) => Rgba::new(r, g, b, 255),
        None => Rgba::WHITE,
    }
}
