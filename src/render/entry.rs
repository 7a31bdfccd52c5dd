//! Re-rendering of one captured message.
//!
//! `compose` replays an entry's face and text into a [`PaintBatch`];
//! `render` additionally rasterizes the batch into a surface. Both take the
//! entry's own recorded window skin for text colors, so a later skin change
//! in the running game never alters how history is reproduced.
//!
//! Text interpretation is a single pass per line: a pending queue of shaped
//! glyphs is drained first, then the next unit is decoded and dispatched as
//! an ExFont sprite, an escape command, a discarded control character, or a
//! plain glyph that (when the backend shapes) greedily extends into a
//! maximal plain-text run.

use crate::assets::AssetCache;
use crate::history::HistoryEntry;
use crate::markup::{TextScanner, Unit};
use crate::render::batch::{PaintBatch, SheetRef};
use crate::render::font::{FontLibrary, ShapedGlyph};
use crate::render::skin::{palette_color, PALETTE_COLORS};
use crate::render::surface::Surface;
use crate::render::{Rect, Rgba};

/// Face cell edge length.
pub const FACE_SIZE: u32 = 48;
/// Columns in a face sheet.
pub const FACE_COLS: i32 = 4;
/// Margin between the face and the surface edge.
const FACE_MARGIN: i32 = 8;
/// Text origin when a left-aligned face is present: margin + face + gap.
const TEXT_X_AFTER_FACE: i32 = 72;
/// Icon cell edge length.
pub const ICON_SIZE: u32 = 16;
/// ExFont glyph edge length.
pub const EXFONT_SIZE: u32 = 12;
/// First text line offset from the surface top.
const TEXT_TOP: i32 = 2;
/// Vertical distance between lines.
pub const LINE_PITCH: i32 = 16;
/// Glyph baseline offset within a line box.
const BASELINE: i32 = 12;
/// Color parameters above this clamp to palette index 0.
const PALETTE_MAX: u32 = 19;

/// Interpret `entry` into paint operations for a surface `width` px wide.
pub fn compose(
    entry: &HistoryEntry,
    width: u32,
    escape: char,
    assets: &mut AssetCache,
    fonts: &mut FontLibrary,
) -> PaintBatch {
    let mut batch = PaintBatch::new();

    compose_face(entry, width, &mut batch);

    let palette = resolve_palette(entry, assets);
    let icon_grid = sheet_columns(assets.icons(), ICON_SIZE);
    let exfont_grid = sheet_columns(assets.exfont(), EXFONT_SIZE);

    let text_x = if entry.face.is_present() && !entry.face.right_aligned {
        TEXT_X_AFTER_FACE
    } else {
        0
    };

    for (i, line) in entry.text.split('\n').enumerate() {
        let line_top = TEXT_TOP + i as i32 * LINE_PITCH;
        compose_line(
            line, text_x, line_top, escape, &palette, icon_grid, exfont_grid, fonts, &mut batch,
        );
    }

    batch
}

/// Replay `entry` into `surface`: clear, compose, rasterize.
pub fn render(
    entry: &HistoryEntry,
    escape: char,
    assets: &mut AssetCache,
    fonts: &mut FontLibrary,
    surface: &mut Surface,
) {
    surface.clear();
    let batch = compose(entry, surface.width(), escape, assets, fonts);
    batch.rasterize(surface, assets, fonts);
}

fn compose_face(entry: &HistoryEntry, width: u32, batch: &mut PaintBatch) {
    if !entry.face.is_present() {
        return;
    }

    let src = Rect::new(
        entry.face.index % FACE_COLS * FACE_SIZE as i32,
        entry.face.index / FACE_COLS * FACE_SIZE as i32,
        FACE_SIZE,
        FACE_SIZE,
    );
    let dest_x = if entry.face.right_aligned {
        width as i32 - FACE_SIZE as i32 - FACE_MARGIN
    } else {
        FACE_MARGIN
    };

    batch.push_sprite(
        SheetRef::Face(entry.face.name.clone()),
        src,
        dest_x,
        FACE_MARGIN,
        entry.face.flipped,
    );
}

/// Text colors of the entry's recorded skin, pre-sampled once per repaint.
fn resolve_palette(entry: &HistoryEntry, assets: &mut AssetCache) -> [Rgba; PALETTE_COLORS as usize] {
    let skin = assets.system(&entry.skin_name);
    core::array::from_fn(|i| palette_color(skin, i as u32))
}

/// Cells per row of a sheet, or `None` when the sheet is missing or narrower
/// than one cell.
fn sheet_columns(sheet: Option<&crate::assets::TextureData>, cell: u32) -> Option<u32> {
    sheet.map(|t| t.width / cell).filter(|&n| n > 0)
}

#[allow(clippy::too_many_arguments)]
fn compose_line(
    line: &str,
    start_x: i32,
    line_top: i32,
    escape: char,
    palette: &[Rgba; PALETTE_COLORS as usize],
    icon_grid: Option<u32>,
    exfont_grid: Option<u32>,
    fonts: &mut FontLibrary,
    batch: &mut PaintBatch,
) {
    let mut cursor_x = start_x;
    let mut color = palette[0];
    let baseline = line_top + BASELINE;

    let mut scanner = TextScanner::new(line, escape);
    let mut pending: std::collections::VecDeque<ShapedGlyph> = Default::default();

    loop {
        if let Some(glyph) = pending.pop_front() {
            batch.push_glyph(glyph, cursor_x, baseline, color);
            cursor_x += glyph.advance;
            continue;
        }

        let Some(unit) = scanner.next_unit() else {
            break;
        };

        match unit {
            Unit::ExFont(index) => {
                if let Some(per_row) = exfont_grid {
                    let src = Rect::new(
                        (index as u32 % per_row * EXFONT_SIZE) as i32,
                        (index as u32 / per_row * EXFONT_SIZE) as i32,
                        EXFONT_SIZE,
                        EXFONT_SIZE,
                    );
                    let glyph_top = line_top + (LINE_PITCH - EXFONT_SIZE as i32) / 2;
                    batch.push_sprite(SheetRef::ExFont, src, cursor_x, glyph_top, false);
                }
                cursor_x += EXFONT_SIZE as i32;
            }

            Unit::Control(_) => {}

            Unit::Escape(command) => match command.to_ascii_lowercase() {
                'c' => {
                    let value = scanner.read_param();
                    let index = if value > PALETTE_MAX { 0 } else { value };
                    color = palette[index as usize];
                }
                'i' => {
                    let id = scanner.read_param();
                    if let Some(per_row) = icon_grid {
                        let src = Rect::new(
                            (id % per_row * ICON_SIZE) as i32,
                            (id / per_row * ICON_SIZE) as i32,
                            ICON_SIZE,
                            ICON_SIZE,
                        );
                        batch.push_sprite(SheetRef::Icons, src, cursor_x, line_top, false);
                    }
                    cursor_x += ICON_SIZE as i32;
                }
                '_' => {
                    cursor_x += fonts.space_width() / 2;
                }
                // Unknown commands are consumed and ignored.
                _ => {}
            },

            Unit::Glyph(ch) => {
                if fonts.can_shape() {
                    let mut run = String::new();
                    run.push(ch);
                    // Extend the run over consecutive plain glyphs; the
                    // stopping unit stays unconsumed for the next turn.
                    loop {
                        let mut lookahead = scanner.clone();
                        match lookahead.next_unit() {
                            Some(Unit::Glyph(next)) => {
                                run.push(next);
                                scanner = lookahead;
                            }
                            _ => break,
                        }
                    }
                    pending = fonts.shape_run(&run).into();
                } else {
                    let glyph = ShapedGlyph {
                        advance: fonts.measure_char(ch),
                        cache_key: None,
                    };
                    batch.push_glyph(glyph, cursor_x, baseline, color);
                    cursor_x += glyph.advance;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::DEFAULT_ESCAPE;
    use crate::render::batch::PaintOp;

    fn compose_plain(text: &str) -> PaintBatch {
        let entry = HistoryEntry::new(text, "");
        let mut assets = AssetCache::new("/nonexistent");
        let mut fonts = FontLibrary::empty();
        compose(&entry, 304, DEFAULT_ESCAPE, &mut assets, &mut fonts)
    }

    fn glyph_positions(batch: &PaintBatch) -> Vec<i32> {
        batch
            .ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Glyph { x, .. } => Some(*x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn plain_text_advances_monotonically() {
        let batch = compose_plain("abc");
        let xs = glyph_positions(&batch);
        assert_eq!(xs, vec![0, 6, 12]);
    }

    #[test]
    fn newline_starts_a_new_line() {
        let entry = HistoryEntry::new("a\nb", "");
        let mut assets = AssetCache::new("/nonexistent");
        let mut fonts = FontLibrary::empty();
        let batch = compose(&entry, 304, DEFAULT_ESCAPE, &mut assets, &mut fonts);
        let ys: Vec<i32> = batch
            .ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Glyph { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys, vec![TEXT_TOP + BASELINE, TEXT_TOP + LINE_PITCH + BASELINE]);
    }

    #[test]
    fn icon_advances_sixteen_without_sheet() {
        let batch = compose_plain("\\I[3]a");
        let xs = glyph_positions(&batch);
        assert_eq!(xs, vec![16]);
    }

    #[test]
    fn exfont_advances_twelve_without_sheet() {
        let batch = compose_plain("$Aa");
        let xs = glyph_positions(&batch);
        assert_eq!(xs, vec![12]);
    }

    #[test]
    fn half_space_is_half_a_space() {
        let batch = compose_plain("\\_a");
        let xs = glyph_positions(&batch);
        assert_eq!(xs, vec![3]);
    }

    #[test]
    fn unknown_escape_is_ignored() {
        let batch = compose_plain("\\Xa");
        let xs = glyph_positions(&batch);
        assert_eq!(xs, vec![0]);
    }

    #[test]
    fn control_characters_are_discarded() {
        let batch = compose_plain("a\u{7}b");
        let xs = glyph_positions(&batch);
        assert_eq!(xs, vec![0, 6]);
    }

    #[test]
    fn literal_introducer_renders_one_glyph() {
        let batch = compose_plain("\\\\");
        assert_eq!(glyph_positions(&batch).len(), 1);
    }

    #[test]
    fn left_face_shifts_text_origin() {
        let mut entry = HistoryEntry::new("a", "");
        entry.face = crate::history::FaceRef {
            name: "Hero".into(),
            index: 0,
            flipped: false,
            right_aligned: false,
        };
        let mut assets = AssetCache::new("/nonexistent");
        let mut fonts = FontLibrary::empty();
        let batch = compose(&entry, 304, DEFAULT_ESCAPE, &mut assets, &mut fonts);
        assert_eq!(glyph_positions(&batch), vec![TEXT_X_AFTER_FACE]);
    }

    #[test]
    fn face_source_cell_from_index() {
        let mut entry = HistoryEntry::new("", "");
        entry.face = crate::history::FaceRef {
            name: "Hero".into(),
            index: 5,
            flipped: false,
            right_aligned: false,
        };
        let mut assets = AssetCache::new("/nonexistent");
        let mut fonts = FontLibrary::empty();
        let batch = compose(&entry, 304, DEFAULT_ESCAPE, &mut assets, &mut fonts);
        match &batch.ops[0] {
            PaintOp::Sprite { src, x, y, .. } => {
                assert_eq!(*src, Rect::new(48, 48, 48, 48));
                assert_eq!((*x, *y), (8, 8));
            }
            other => panic!("expected face sprite, got {other:?}"),
        }
    }
}
