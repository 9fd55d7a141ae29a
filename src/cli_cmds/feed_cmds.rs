use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{curate, load_candidates, load_image, make_rng, match_params};
use crate::captioner::{CaptionService, HttpCaptioner};
use crate::cli::MatchArgs;
use crate::config::Config;
use crate::export::export_feed;
use crate::feed::PIN_CAPACITY;
use crate::matching::Ranking;
use crate::mood::validate_theme;
use crate::session::{ImageId, Session};

pub struct FeedOptions {
    pub theme: String,
    pub reference: Option<PathBuf>,
    pub matching: MatchArgs,
    pub seed: Option<u64>,
    pub remote: bool,
    pub interactive: bool,
    pub export: Option<Option<PathBuf>>,
    pub json: bool,
}

pub async fn cmd_feed(config: &Config, image_dir: &Path, options: FeedOptions) -> Result<()> {
    validate_theme(&options.theme)?;

    let mut session = Session::new(match_params(config, options.matching));
    session.add_images(load_candidates(config, image_dir, options.reference.as_deref())?);
    if let Some(reference) = &options.reference {
        session.set_reference(load_image(reference, config.palette.size)?);
    }

    let service: Option<Arc<dyn CaptionService>> = if options.remote || config.captioner.enabled {
        let http: Arc<dyn CaptionService> =
            Arc::new(HttpCaptioner::with_env_token(config.captioner.endpoint.clone()));
        Some(http)
    } else {
        None
    };

    let mut rng = make_rng(options.seed);
    session
        .generate(&options.theme, service.clone(), config.caption_limits(), &mut rng)
        .await?;

    if session.ranking().is_some_and(Ranking::is_no_match) {
        eprintln!("No images match the reference colors. Using all images instead.");
    }

    if options.interactive {
        let end = curate::run_curation(&mut session, config, service, &mut rng).await?;
        if end == curate::CurationEnd::Cleared {
            println!("Session cleared.");
            return Ok(());
        }
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&FeedReport::new(&session))?);
    } else {
        print_feed(&session);
    }

    if let Some(dest) = options.export {
        let dir = dest.unwrap_or_else(|| config.export_dir());
        let summary = export_feed(&session, &dir)?;
        println!(
            "Exported {} entries to {}",
            summary.entries,
            summary.directory.display()
        );
        println!("Manifest: {}", summary.manifest.display());
    }

    Ok(())
}

#[derive(Serialize)]
struct FeedReport<'a> {
    theme: Option<&'a str>,
    mood: Option<&'a str>,
    hashtags: Option<&'a str>,
    no_match: bool,
    entries: Vec<FeedRow<'a>>,
}

#[derive(Serialize)]
struct FeedRow<'a> {
    position: usize,
    id: ImageId,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    pinned: bool,
    caption: &'a str,
}

impl<'a> FeedReport<'a> {
    fn new(session: &'a Session) -> Self {
        let generation = session.generation();
        let entries = session
            .feed()
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let image = session.image(entry.image_id);
                FeedRow {
                    position: index + 1,
                    id: entry.image_id,
                    name: image.map(|img| img.name.as_str()).unwrap_or("?"),
                    score: image.and_then(|img| img.score),
                    pinned: entry.pinned,
                    caption: &entry.caption,
                }
            })
            .collect();

        Self {
            theme: generation.map(|g| g.theme.as_str()),
            mood: generation.map(|g| g.mood.mood.tag()),
            hashtags: generation.map(|g| g.mood.hashtags.as_str()),
            no_match: session.ranking().is_some_and(Ranking::is_no_match),
            entries,
        }
    }
}

pub(super) fn entry_label(session: &Session, id: ImageId) -> String {
    let name = session.image(id).map(|img| img.name.as_str()).unwrap_or("?");
    let pinned = session.feed().get(id).is_some_and(|e| e.pinned);
    let selected = session.feed().selection() == Some(id);
    format!(
        "{}{}{}",
        name,
        if pinned { " [pinned]" } else { "" },
        if selected { " [selected]" } else { "" }
    )
}

pub(super) fn print_feed(session: &Session) {
    if let Some(generation) = session.generation() {
        println!("Mood: {}  {}", generation.mood.mood, generation.mood.hashtags);
    }
    println!();

    let feed = session.feed();
    if feed.is_empty() {
        println!("(feed is empty)");
        return;
    }
    println!(
        "{} entries, {}/{} pinned",
        feed.len(),
        feed.pinned().len(),
        PIN_CAPACITY
    );

    for (index, entry) in session.feed().entries().iter().enumerate() {
        let score = session
            .image(entry.image_id)
            .and_then(|img| img.score)
            .map(|s| format!(" ({s:.1})"))
            .unwrap_or_default();
        println!("{:>2}. {}{}", index + 1, entry_label(session, entry.image_id), score);
        println!("    {}", entry.caption);
    }
}
