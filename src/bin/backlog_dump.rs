//! Backlog dump tool - replays a captured history into PNG files.
//!
//! Usage:
//!   backlog-dump capture.json                 # one PNG per entry into .
//!   backlog-dump capture.json -o out/         # choose output directory
//!   backlog-dump capture.json --assets data/  # override the asset root
//!
//! The capture file is a JSON array of history entries, as produced by a
//! host serializing its `MessageHistory` contents.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dialogue_backlog::assets::AssetCache;
use dialogue_backlog::browser::{FRAME_HEIGHT, FRAME_WIDTH};
use dialogue_backlog::config::BacklogConfig;
use dialogue_backlog::render::entry::render;
use dialogue_backlog::render::surface::Surface;
use dialogue_backlog::{HistoryEntry, Result};

#[derive(Parser)]
#[command(name = "backlog-dump")]
#[command(about = "Replay a captured dialogue backlog into PNG files")]
struct Cli {
    /// JSON capture of history entries.
    capture: PathBuf,

    /// Output directory for rendered PNGs.
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Asset root; defaults to the configured one.
    #[arg(long)]
    assets: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = BacklogConfig::load();
    let assets_dir = cli.assets.unwrap_or_else(|| config.assets_dir.clone());

    let mut assets = AssetCache::new(&assets_dir);
    let mut fonts =
        dialogue_backlog::render::font::FontLibrary::load(&assets.font_dir());

    let entries: Vec<HistoryEntry> =
        serde_json::from_str(&std::fs::read_to_string(&cli.capture)?)?;
    tracing::info!(
        "replaying {} entries with assets from {}",
        entries.len(),
        assets_dir.display()
    );

    std::fs::create_dir_all(&cli.out)?;

    let border = 8u32;
    let mut surface = Surface::new(FRAME_WIDTH - 2 * border, FRAME_HEIGHT as u32 - 2 * border);
    for (i, entry) in entries.iter().enumerate() {
        render(entry, config.escape_char, &mut assets, &mut fonts, &mut surface);

        let image = image::RgbaImage::from_raw(
            surface.width(),
            surface.height(),
            surface.pixels().to_vec(),
        )
        .expect("surface buffer matches its dimensions");

        let path = cli.out.join(format!("entry-{i:03}.png"));
        image.save(&path)?;
        println!("{}", path.display());
    }

    Ok(())
}
