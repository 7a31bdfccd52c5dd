//! Deferred paint operations.
//!
//! The entry renderer interprets a message into a flat list of ops; the
//! rasterize pass then resolves sheets and glyph masks against the asset
//! cache and font library. Resource misses surface only during
//! rasterization, where they skip the affected op.

use crate::assets::AssetCache;
use crate::render::font::{FontLibrary, ShapedGlyph};
use crate::render::surface::Surface;
use crate::render::{Rect, Rgba};

/// Which sheet a sprite op reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetRef {
    Face(String),
    Skin(String),
    Icons,
    ExFont,
}

/// One drawing operation.
#[derive(Debug, Clone)]
pub enum PaintOp {
    /// Blit a sheet region to (x, y), optionally mirrored.
    Sprite {
        sheet: SheetRef,
        src: Rect,
        x: i32,
        y: i32,
        hflip: bool,
    },
    /// Draw one glyph with its pen at (x, y) on the line's baseline.
    Glyph {
        glyph: ShapedGlyph,
        x: i32,
        y: i32,
        color: Rgba,
    },
}

/// Ordered list of paint operations for one entry.
#[derive(Debug, Clone, Default)]
pub struct PaintBatch {
    pub ops: Vec<PaintOp>,
}

impl PaintBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_sprite(&mut self, sheet: SheetRef, src: Rect, x: i32, y: i32, hflip: bool) {
        self.ops.push(PaintOp::Sprite {
            sheet,
            src,
            x,
            y,
            hflip,
        });
    }

    pub fn push_glyph(&mut self, glyph: ShapedGlyph, x: i32, y: i32, color: Rgba) {
        self.ops.push(PaintOp::Glyph { glyph, x, y, color });
    }

    /// Resolve every op against the caches and blend it into `surface`.
    ///
    /// Missing sheets and unrasterizable glyphs are skipped; nothing here
    /// fails.
    pub fn rasterize(
        &self,
        surface: &mut Surface,
        assets: &mut AssetCache,
        fonts: &mut FontLibrary,
    ) {
        for op in &self.ops {
            match op {
                PaintOp::Sprite {
                    sheet,
                    src,
                    x,
                    y,
                    hflip,
                } => {
                    let tex = match sheet {
                        SheetRef::Face(name) => assets.faceset(name),
                        SheetRef::Skin(name) => assets.system(name),
                        SheetRef::Icons => assets.icons(),
                        SheetRef::ExFont => assets.exfont(),
                    };
                    if let Some(tex) = tex {
                        surface.blit(*x, *y, tex, *src, *hflip);
                    }
                }
                PaintOp::Glyph { glyph, x, y, color } => {
                    let Some(key) = glyph.cache_key else {
                        continue;
                    };
                    if let Some(raster) = fonts.rasterize(key) {
                        surface.blend_mask(
                            x + raster.left,
                            y - raster.top,
                            &raster.mask,
                            raster.width,
                            *color,
                        );
                    }
                }
            }
        }
    }
}
