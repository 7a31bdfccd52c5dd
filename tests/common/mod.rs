//! Shared test helpers.
//!
//! Builds a throwaway asset tree (skins, a face sheet, the icon and ExFont
//! sheets) so rendering tests run against real files, plus recording
//! implementations of the sound and fade collaborators.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

use dialogue_backlog::assets::AssetCache;
use dialogue_backlog::render::font::FontLibrary;
use dialogue_backlog::sound::{SoundPlayer, SystemSound};
use dialogue_backlog::transition::ScreenFade;

/// Asset tree on disk for one test.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp asset dir");
        let root = dir.path();

        std::fs::create_dir_all(root.join("system")).unwrap();
        std::fs::create_dir_all(root.join("faceset")).unwrap();

        make_skin("Skin1").save(root.join("system/Skin1.png")).unwrap();
        make_skin("Skin2").save(root.join("system/Skin2.png")).unwrap();
        make_faceset().save(root.join("faceset/Hero.png")).unwrap();
        make_icons().save(root.join("system2.png")).unwrap();
        make_exfont().save(root.join("exfont.png")).unwrap();

        Self { dir }
    }

    pub fn assets(&self) -> AssetCache {
        AssetCache::new(self.dir.path())
    }

    /// No font files are written, so this library runs on fallback metrics.
    pub fn fonts(&self) -> FontLibrary {
        FontLibrary::load(&self.dir.path().join("font"))
    }
}

/// Expected palette color for `index` in a fixture skin.
pub fn skin_palette(skin: &str, index: u32) -> [u8; 4] {
    let seed = if skin == "Skin1" { 0u32 } else { 100 };
    [
        (seed + index * 12 + 5) as u8,
        (seed + index * 7 + 3) as u8,
        (seed + index * 3 + 1) as u8,
        255,
    ]
}

/// Face cell colors: left and right halves differ so mirroring is visible.
pub fn face_cell_colors(col: u32, row: u32) -> ([u8; 4], [u8; 4]) {
    let base = [(col * 50 + 10) as u8, (row * 50 + 10) as u8, 200, 255];
    (base, [base[0], base[1], 100, 255])
}

/// Uniform fill color of an icon cell.
pub fn icon_color(id: u32) -> [u8; 4] {
    [(id * 30 + 15) as u8, (id * 20 + 10) as u8, (id * 10 + 5) as u8, 255]
}

fn make_skin(name: &str) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(160, 80, Rgba([40, 40, 40, 255]));

    // Window background cell.
    fill(&mut img, 0, 0, 32, 32, [30, 30, 60, 255]);
    // Scroll arrows.
    fill(&mut img, 40, 8, 16, 8, [250, 250, 0, 255]);
    fill(&mut img, 40, 16, 16, 8, [0, 250, 250, 255]);
    // Text palette: two rows of ten 16x16 cells from (0, 48).
    for index in 0..20u32 {
        let x = index % 10 * 16;
        let y = 48 + index / 10 * 16;
        fill(&mut img, x, y, 16, 16, skin_palette(name, index));
    }

    img
}

fn make_faceset() -> RgbaImage {
    // 4 columns x 2 rows of 48x48 cells.
    let mut img = RgbaImage::new(192, 96);
    for row in 0..2u32 {
        for col in 0..4u32 {
            let (left, right) = face_cell_colors(col, row);
            fill(&mut img, col * 48, row * 48, 24, 48, left);
            fill(&mut img, col * 48 + 24, row * 48, 24, 48, right);
        }
    }
    img
}

fn make_icons() -> RgbaImage {
    // 4 icons per row.
    let mut img = RgbaImage::new(64, 32);
    for id in 0..8u32 {
        fill(&mut img, id % 4 * 16, id / 4 * 16, 16, 16, icon_color(id));
    }
    img
}

fn make_exfont() -> RgbaImage {
    // 13 glyphs per row, 4 rows.
    let mut img = RgbaImage::new(156, 48);
    for glyph in 0..52u32 {
        let shade = (glyph * 4 + 40) as u8;
        fill(
            &mut img,
            glyph % 13 * 12,
            glyph / 13 * 12,
            12,
            12,
            [shade, shade, shade, 255],
        );
    }
    img
}

fn fill(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: [u8; 4]) {
    for dy in 0..h {
        for dx in 0..w {
            img.put_pixel(x + dx, y + dy, Rgba(color));
        }
    }
}

/// Sound player that records every request.
#[derive(Clone, Default)]
pub struct RecordingSound {
    pub played: Rc<RefCell<Vec<SystemSound>>>,
}

impl SoundPlayer for RecordingSound {
    fn play(&mut self, sound: SystemSound) {
        self.played.borrow_mut().push(sound);
    }
}

/// Fade collaborator that records every directive.
#[derive(Clone, Default)]
pub struct RecordingFade {
    pub calls: Rc<RefCell<Vec<(bool, u32)>>>,
}

impl ScreenFade for RecordingFade {
    fn fade_in(&mut self, ticks: u32) {
        self.calls.borrow_mut().push((true, ticks));
    }

    fn fade_out(&mut self, ticks: u32) {
        self.calls.borrow_mut().push((false, ticks));
    }
}
