mod caption_cmds;
mod config_cmds;
mod curate;
mod feed_cmds;
mod palette_cmds;

pub use caption_cmds::{cmd_caption, cmd_mood};
pub use config_cmds::cmd_config;
pub use feed_cmds::{cmd_feed, FeedOptions};
pub use palette_cmds::{cmd_palette, cmd_rank};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::MatchArgs;
use crate::config::Config;
use crate::ingest::{self, DecodedImage};
use crate::matching::MatchParams;

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn match_params(config: &Config, args: MatchArgs) -> MatchParams {
    let defaults = config.match_params();
    MatchParams {
        threshold: args.threshold.unwrap_or(defaults.threshold),
        dominant_count: args.dominant.unwrap_or(defaults.dominant_count),
    }
}

fn image_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_image(path: &Path, palette_size: usize) -> Result<DecodedImage> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut decoded = ingest::decode_image(&image_name(path), bytes, palette_size)?;
    decoded.path = Some(path.to_path_buf());
    Ok(decoded)
}

/// Decode every image in `dir`, leaving out `exclude` (the reference).
fn load_candidates(config: &Config, dir: &Path, exclude: Option<&Path>) -> Result<Vec<DecodedImage>> {
    let paths = ingest::collect_image_paths(dir, config.images.recursive, &config.images.extensions)?;

    let exclude = exclude.and_then(|p| p.canonicalize().ok());
    let paths: Vec<PathBuf> = paths
        .into_iter()
        .filter(|p| match &exclude {
            Some(ex) => p.canonicalize().ok().as_ref() != Some(ex),
            None => true,
        })
        .collect();

    let report = ingest::load_paths(&paths, config.palette.size);
    if !report.failures.is_empty() {
        eprintln!("Skipped {} unreadable image(s)", report.failures.len());
    }
    Ok(report.images)
}
