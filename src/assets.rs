//! Loading and caching of backlog image assets.
//!
//! Assets are looked up by name against a fixed directory layout under one
//! asset root:
//!
//! ```text
//! <root>/faceset/<name>.png   face sheets, 4 columns of 48x48 cells
//! <root>/system/<name>.png    window-skin sheets, 160x80
//! <root>/system2.png          icon sheet, 16x16 cells
//! <root>/exfont.png           ExFont glyph sheet, 12x12 cells
//! <root>/font/*.ttf           fonts, loaded by FontLibrary
//! ```
//!
//! A missing asset is never an error here: lookups return `None` and the
//! caller omits the visual element.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Decoded RGBA sheet.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    /// RGBA, row-major.
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Pixel at (x, y); `None` outside the sheet.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }
}

/// Name-keyed loader and cache for backlog sheets.
///
/// Failed loads are cached too, so a sheet missing from disk costs one
/// probe rather than one per repaint.
#[derive(Debug)]
pub struct AssetCache {
    root: PathBuf,
    cache: HashMap<String, Option<TextureData>>,
}

impl AssetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Face sheet by name.
    pub fn faceset(&mut self, name: &str) -> Option<&TextureData> {
        if name.is_empty() {
            return None;
        }
        self.load("faceset", name)
    }

    /// Window-skin sheet by name.
    pub fn system(&mut self, name: &str) -> Option<&TextureData> {
        if name.is_empty() {
            return None;
        }
        self.load("system", name)
    }

    /// The fixed icon sheet.
    pub fn icons(&mut self) -> Option<&TextureData> {
        self.load("", "system2")
    }

    /// The fixed ExFont glyph sheet.
    pub fn exfont(&mut self) -> Option<&TextureData> {
        self.load("", "exfont")
    }

    /// Directory holding font files.
    pub fn font_dir(&self) -> PathBuf {
        self.root.join("font")
    }

    fn load(&mut self, category: &str, name: &str) -> Option<&TextureData> {
        let key = cache_key(category, name);
        if !self.cache.contains_key(&key) {
            let loaded = self.probe(category, name);
            if loaded.is_none() {
                tracing::debug!(category, name, "asset not found");
            }
            self.cache.insert(key.clone(), loaded);
        }
        self.cache.get(&key).and_then(|t| t.as_ref())
    }

    fn probe(&self, category: &str, name: &str) -> Option<TextureData> {
        let dir = if category.is_empty() {
            self.root.clone()
        } else {
            self.root.join(category)
        };

        for candidate in [
            dir.join(format!("{name}.png")),
            dir.join(format!("{name}.PNG")),
            dir.join(format!("{}.png", name.to_lowercase())),
        ] {
            if candidate.exists() {
                match load_texture_file(&candidate) {
                    Ok(data) => return Some(data),
                    Err(err) => {
                        tracing::warn!("failed to decode {}: {err}", candidate.display());
                        return None;
                    }
                }
            }
        }
        None
    }
}

fn cache_key(category: &str, name: &str) -> String {
    format!("{category}/{}", name.to_lowercase())
}

fn load_texture_file(path: &Path) -> Result<TextureData, image::ImageError> {
    let img = image::open(path)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureData {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}
