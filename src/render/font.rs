//! Font shaping and glyph rasterization via cosmic-text.
//!
//! `FontLibrary` owns a cosmic-text `FontSystem` loaded with the TTF files
//! found in the asset tree's `font/` directory and a `SwashCache` for
//! rasterization. When no font file is available the library still answers
//! measurement queries from fixed-advance fallback metrics (6 px half-width,
//! 12 px full-width), so text layout stays defined while glyph pixels are
//! omitted.

use std::path::Path;

use cosmic_text::{Attrs, Buffer, CacheKey, Metrics, Shaping, SwashContent};
use unicode_width::UnicodeWidthChar;

/// Nominal glyph size in pixels.
pub const FONT_SIZE: f32 = 12.0;
/// Line box height handed to the shaper.
pub const SHAPE_LINE_HEIGHT: f32 = 16.0;

/// Fallback advance for a half-width character when no font is loaded.
const FALLBACK_HALF_WIDTH: i32 = 6;

/// One positioned glyph out of a shaped run.
#[derive(Debug, Clone, Copy)]
pub struct ShapedGlyph {
    /// Horizontal advance to apply after drawing this glyph.
    pub advance: i32,
    /// Rasterization key; `None` when no font backend is available.
    pub cache_key: Option<CacheKey>,
}

/// Alpha mask for one rasterized glyph.
#[derive(Debug, Clone)]
pub struct RasterGlyph {
    pub mask: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Placement offsets relative to the pen position.
    pub left: i32,
    pub top: i32,
}

/// Shaping, measurement and rasterization for backlog text.
pub struct FontLibrary {
    font_system: Option<cosmic_text::FontSystem>,
    swash_cache: cosmic_text::SwashCache,
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("can_shape", &self.can_shape())
            .finish()
    }
}

impl FontLibrary {
    /// Load every font file found under `font_dir`.
    ///
    /// An unreadable or empty directory yields a library running on fallback
    /// metrics only.
    pub fn load(font_dir: &Path) -> Self {
        let mut db = cosmic_text::fontdb::Database::new();
        let mut loaded = 0usize;

        if let Ok(dir) = std::fs::read_dir(font_dir) {
            for entry in dir.flatten() {
                let path = entry.path();
                let is_font = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
                if !is_font {
                    continue;
                }
                match std::fs::read(&path) {
                    Ok(data) => {
                        db.load_font_data(data);
                        loaded += 1;
                        tracing::debug!("loaded font {}", path.display());
                    }
                    Err(err) => {
                        tracing::warn!("failed to read font {}: {err}", path.display());
                    }
                }
            }
        }

        let font_system = if loaded > 0 {
            Some(cosmic_text::FontSystem::new_with_locale_and_db(
                "en-US".to_string(),
                db,
            ))
        } else {
            tracing::debug!("no font files in {}; using fallback metrics", font_dir.display());
            None
        };

        Self {
            font_system,
            swash_cache: cosmic_text::SwashCache::new(),
        }
    }

    /// Library with no font backend at all (fallback metrics only).
    pub fn empty() -> Self {
        Self {
            font_system: None,
            swash_cache: cosmic_text::SwashCache::new(),
        }
    }

    /// Whether the backend can shape runs of text.
    pub fn can_shape(&self) -> bool {
        self.font_system.is_some()
    }

    /// Shape a run of plain text into positioned glyphs.
    ///
    /// Returns one `ShapedGlyph` per output glyph in visual order. With no
    /// font backend the run degrades to one fallback-metric glyph per char.
    pub fn shape_run(&mut self, text: &str) -> Vec<ShapedGlyph> {
        let Some(font_system) = self.font_system.as_mut() else {
            return text
                .chars()
                .map(|ch| ShapedGlyph {
                    advance: fallback_advance(ch),
                    cache_key: None,
                })
                .collect();
        };

        let metrics = Metrics::new(FONT_SIZE, SHAPE_LINE_HEIGHT);
        let mut buffer = Buffer::new(font_system, metrics);
        buffer.set_size(font_system, Some(10000.0), Some(SHAPE_LINE_HEIGHT));
        buffer.set_text(font_system, text, &Attrs::new(), Shaping::Advanced, None);
        buffer.shape_until_scroll(font_system, true);

        let mut shaped = Vec::new();
        for run in buffer.layout_runs() {
            let glyphs = run.glyphs;
            for (i, glyph) in glyphs.iter().enumerate() {
                // Advance to the next glyph origin, or to the run end for
                // the last one, so kerning survives the queue round-trip.
                let advance = match glyphs.get(i + 1) {
                    Some(next) => next.x - glyph.x,
                    None => run.line_w - glyph.x,
                };
                let physical = glyph.physical((0.0, 0.0), 1.0);
                shaped.push(ShapedGlyph {
                    advance: advance.round() as i32,
                    cache_key: Some(physical.cache_key),
                });
            }
        }
        shaped
    }

    /// Measured advance of a single character.
    pub fn measure_char(&mut self, ch: char) -> i32 {
        if self.font_system.is_some() {
            let mut buf = [0u8; 4];
            self.shape_run(ch.encode_utf8(&mut buf))
                .iter()
                .map(|g| g.advance)
                .sum()
        } else {
            fallback_advance(ch)
        }
    }

    /// Measured advance of one space glyph.
    pub fn space_width(&mut self) -> i32 {
        self.measure_char(' ')
    }

    /// Rasterize a glyph previously returned by [`Self::shape_run`].
    pub fn rasterize(&mut self, key: CacheKey) -> Option<RasterGlyph> {
        let font_system = self.font_system.as_mut()?;
        let image = self.swash_cache.get_image(font_system, key).as_ref()?;

        let width = image.placement.width;
        let height = image.placement.height;
        if width == 0 || height == 0 {
            return None;
        }

        let mask = match image.content {
            SwashContent::Mask => image.data.clone(),
            SwashContent::Color => image
                .data
                .chunks_exact(4)
                .map(|px| px[3])
                .collect(),
            SwashContent::SubpixelMask => image
                .data
                .chunks_exact(3)
                .map(|px| px[0])
                .collect(),
        };

        Some(RasterGlyph {
            mask,
            width,
            height,
            left: image.placement.left,
            top: image.placement.top,
        })
    }
}

/// Fixed advance classes used when no font is loaded: zero for combining
/// or control characters, half-width for narrow, full-width for wide.
fn fallback_advance(ch: char) -> i32 {
    match ch.width() {
        Some(w) => w as i32 * FALLBACK_HALF_WIDTH,
        None => 0,
    }
}
