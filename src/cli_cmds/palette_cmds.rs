use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::{load_candidates, load_image, match_params};
use crate::cli::MatchArgs;
use crate::config::Config;
use crate::error::FeedError;
use crate::matching::Ranking;
use crate::palette::poppiness;
use crate::session::{ImageId, Session};

#[derive(Serialize)]
struct PaletteRow<'a> {
    hex: &'a str,
    name: &'static str,
    poppiness: f64,
}

pub fn cmd_palette(config: &Config, path: &Path, size: Option<usize>, json: bool) -> Result<()> {
    let size = size.unwrap_or(config.palette.preview_size);
    let image = load_image(path, size)?;
    if image.palette.is_empty() {
        anyhow::bail!("No colors found in {}", path.display());
    }

    let rows: Vec<PaletteRow> = image
        .palette
        .colors()
        .iter()
        .map(|c| PaletteRow {
            hex: c.hex(),
            name: c.name(),
            poppiness: poppiness(c),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Palette for {} ({} colors):", path.display(), image.palette.len());
    for row in &rows {
        println!("  {}  {:<7} {:>5.1}", row.hex, row.name, row.poppiness);
    }

    Ok(())
}

#[derive(Serialize)]
struct RankRow<'a> {
    id: ImageId,
    name: &'a str,
    score: f64,
}

#[derive(Serialize)]
struct RankReport<'a> {
    matched: bool,
    threshold: f64,
    results: Vec<RankRow<'a>>,
}

pub fn cmd_rank(
    config: &Config,
    image_dir: &Path,
    reference: &Path,
    matching: MatchArgs,
    json: bool,
) -> Result<()> {
    let mut session = Session::new(match_params(config, matching));
    session.add_images(load_candidates(config, image_dir, Some(reference))?);

    if session.images().is_empty() {
        return Err(FeedError::no_candidates().into());
    }

    session.set_reference(load_image(reference, config.palette.size)?);

    let Some(ranking) = session.ranking() else {
        return Ok(());
    };
    let params = session.params();
    let scored = match ranking {
        Ranking::Matches(matches) => matches,
        Ranking::NoMatch { scores } => scores,
    };
    let rows: Vec<RankRow> = scored
        .iter()
        .filter_map(|m| {
            session.image(m.id).map(|img| RankRow {
                id: m.id,
                name: &img.name,
                score: m.score,
            })
        })
        .collect();

    if json {
        let report = RankReport {
            matched: !ranking.is_no_match(),
            threshold: params.threshold,
            results: rows,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Ranking against: {}", reference.display());
    println!();
    if ranking.is_no_match() {
        println!(
            "No images match the reference colors (threshold {:.0}). Showing all images:",
            params.threshold
        );
    } else {
        println!("Matching images (lower is closer):");
    }
    for row in &rows {
        println!("  {:>6.1}  {}", row.score, row.name);
    }

    Ok(())
}
