use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;

use super::feed_cmds::{entry_label, print_feed};
use crate::captioner::{CaptionLimits, CaptionService};
use crate::config::Config;
use crate::error::FeedError;
use crate::export::export_feed;
use crate::feed::{PinOutcome, SelectOutcome, PIN_CAPACITY};
use crate::session::{ImageId, Session};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Action {
    Pin,
    Select,
    Remove,
    Regenerate,
    Retheme,
    DropReference,
    Export,
    StartOver,
    Done,
}

const ACTIONS: [(Action, &str); 9] = [
    (Action::Pin, "Pin / unpin an image"),
    (Action::Select, "Select an image (two selections swap)"),
    (Action::Remove, "Remove an image"),
    (Action::Regenerate, "Regenerate a caption"),
    (Action::Retheme, "Regenerate a caption with a new theme"),
    (Action::DropReference, "Drop the reference and rebuild"),
    (Action::Export, "Export feed"),
    (Action::StartOver, "Clear the session and quit"),
    (Action::Done, "Done"),
];

/// How the curation loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurationEnd {
    Done,
    Cleared,
}

/// Interactive curation loop over the generated feed.
pub async fn run_curation<R: Rng>(
    session: &mut Session,
    config: &Config,
    service: Option<Arc<dyn CaptionService>>,
    rng: &mut R,
) -> Result<CurationEnd> {
    let theme = ColorfulTheme::default();
    let labels: Vec<&str> = ACTIONS.iter().map(|(_, label)| *label).collect();

    loop {
        print_feed(session);
        println!();

        let idx = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match ACTIONS[idx].0 {
            Action::Done => break,
            Action::StartOver => {
                session.clear();
                return Ok(CurationEnd::Cleared);
            }
            Action::DropReference => {
                let outcome =
                    rebuild_without_reference(session, service.clone(), config.caption_limits(), rng)
                        .await
                        .map(|count| format!("Rebuilt the feed from all {count} images"));
                report(outcome);
                continue;
            }
            Action::Export => {
                let default_dir = config.export_dir();
                let dir: String = Input::with_theme(&theme)
                    .with_prompt("Export directory")
                    .default(default_dir.to_string_lossy().to_string())
                    .interact_text()?;
                match export_feed(session, &PathBuf::from(dir)) {
                    Ok(summary) => println!(
                        "✓ Exported {} entries to {} ({})",
                        summary.entries,
                        summary.directory.display(),
                        summary.manifest.display()
                    ),
                    Err(e) => println!("⚠ {e:#}"),
                }
                continue;
            }
            _ => {}
        }

        if session.feed().is_empty() {
            println!("The feed is empty.");
            continue;
        }

        let action = ACTIONS[idx].0;
        let id = pick_entry(session, &theme)?;
        let outcome = match action {
            Action::Pin => session.pin(id).map(|o| describe_pin(session, o)),
            Action::Select => session.select(id).map(|o| describe_select(session, o)),
            Action::Remove => session
                .remove_entry(id)
                .map(|_| format!("Removed {}", name_of(session, id))),
            Action::Regenerate => session
                .regenerate_caption(id, rng)
                .map(|c| format!("New caption: {c}")),
            Action::Retheme => {
                let new_theme: String = Input::with_theme(&theme)
                    .with_prompt("New theme")
                    .interact_text()?;
                session
                    .regenerate_with_theme(id, &new_theme, rng)
                    .map(|c| format!("New caption: {c}"))
            }
            Action::DropReference | Action::Export | Action::StartOver | Action::Done => continue,
        };

        report(outcome);
    }

    Ok(CurationEnd::Done)
}

/// Forget the reference and caption every stored image again under the
/// current theme. Returns the new feed length.
async fn rebuild_without_reference<R: Rng>(
    session: &mut Session,
    service: Option<Arc<dyn CaptionService>>,
    limits: CaptionLimits,
    rng: &mut R,
) -> Result<usize, FeedError> {
    if session.reference().is_none() {
        return Err(FeedError::Validation("There is no reference image to drop".to_string()));
    }
    let theme = session
        .generation()
        .map(|g| g.theme.clone())
        .ok_or_else(FeedError::empty_theme)?;
    session.clear_reference();
    let feed = session.generate(&theme, service, limits, rng).await?;
    Ok(feed.len())
}

fn report(outcome: Result<String, FeedError>) {
    match outcome {
        Ok(message) => println!("✓ {message}"),
        Err(e) => println!("⚠ {e}"),
    }
}

fn pick_entry(session: &Session, theme: &ColorfulTheme) -> Result<ImageId> {
    let ids: Vec<ImageId> = session.feed().entries().iter().map(|e| e.image_id).collect();
    let items: Vec<String> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| format!("{:>2}. {}", i + 1, entry_label(session, *id)))
        .collect();

    let idx = Select::with_theme(theme)
        .with_prompt("Which image?")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(ids[idx])
}

fn name_of(session: &Session, id: ImageId) -> String {
    session
        .image(id)
        .map(|img| img.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn describe_pin(session: &Session, outcome: PinOutcome) -> String {
    match outcome {
        PinOutcome::Pinned { id, evicted: None } => format!("Pinned {}", name_of(session, id)),
        PinOutcome::Pinned {
            id,
            evicted: Some(old),
        } => format!(
            "Pinned {}; unpinned {} (max {} pins)",
            name_of(session, id),
            name_of(session, old),
            PIN_CAPACITY
        ),
        PinOutcome::Unpinned(id) => format!("Unpinned {}", name_of(session, id)),
    }
}

fn describe_select(session: &Session, outcome: SelectOutcome) -> String {
    match outcome {
        SelectOutcome::Selected(id) => {
            format!("Selected {}. Select another image to swap.", name_of(session, id))
        }
        SelectOutcome::Deselected(id) => format!("Deselected {}", name_of(session, id)),
        SelectOutcome::Swapped(a, b) => {
            format!("Swapped {} and {}", name_of(session, a), name_of(session, b))
        }
    }
}
