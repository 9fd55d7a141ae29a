//! Write the curated feed to disk: numbered image copies, caption files and
//! a JSON manifest.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FeedError;
use crate::session::{ImageId, Session};
use crate::utils::{file_extension, file_stem};

pub const MANIFEST_FILE: &str = "feed.json";

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mood: Option<&'a str>,
    entries: Vec<ManifestEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    position: usize,
    id: ImageId,
    source: &'a str,
    image: String,
    caption_file: String,
    caption: &'a str,
    pinned: bool,
}

/// Where an export landed.
#[derive(Debug)]
pub struct ExportSummary {
    pub directory: PathBuf,
    pub entries: usize,
    pub manifest: PathBuf,
}

/// `NN_<stem>` for the entry at 1-based `position`.
pub fn entry_base_name(position: usize, name: &str) -> String {
    format!("{:02}_{}", position, file_stem(name))
}

/// Export the session feed in its current order. Image bytes are copied as
/// they were ingested.
pub fn export_feed(session: &Session, dir: &Path) -> Result<ExportSummary> {
    let items = session.feed_items()?;
    if items.is_empty() {
        return Err(FeedError::Validation("No feed to save!".to_string()).into());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let mut entries = Vec::with_capacity(items.len());
    for (index, (image, entry)) in items.iter().enumerate() {
        let position = index + 1;
        let base = entry_base_name(position, &image.name);
        let ext = file_extension(&image.name).unwrap_or_else(|| "jpg".to_string());
        let image_file = format!("{base}.{ext}");
        let caption_file = format!("{base}.txt");

        fs::write(dir.join(&image_file), &image.raw)
            .with_context(|| format!("Failed to write {image_file}"))?;
        fs::write(dir.join(&caption_file), &entry.caption)
            .with_context(|| format!("Failed to write {caption_file}"))?;

        entries.push(ManifestEntry {
            position,
            id: image.id,
            source: &image.name,
            image: image_file,
            caption_file,
            caption: &entry.caption,
            pinned: entry.pinned,
        });
    }

    let generation = session.generation();
    let manifest = Manifest {
        generated_at: Utc::now(),
        theme: generation.map(|g| g.theme.as_str()),
        mood: generation.map(|g| g.mood.mood.tag()),
        entries,
    };

    let manifest_path = dir.join(MANIFEST_FILE);
    let data = serde_json::to_string_pretty(&manifest)?;
    fs::write(&manifest_path, data)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    tracing::info!(dir = %dir.display(), entries = items.len(), "exported feed");

    Ok(ExportSummary {
        directory: dir.to_path_buf(),
        entries: items.len(),
        manifest: manifest_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captioner::CaptionLimits;
    use crate::ingest::DecodedImage;
    use crate::matching::MatchParams;
    use crate::palette::Palette;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn decoded(name: &str, bytes: &[u8]) -> DecodedImage {
        DecodedImage {
            name: name.to_string(),
            path: None,
            raw: Arc::from(bytes.to_vec()),
            palette: Palette::from_hex(&["#FF8800"]).unwrap(),
        }
    }

    async fn session() -> Session {
        let mut session = Session::new(MatchParams::default());
        session.add_images(vec![
            decoded("beach.png", b"beach-bytes"),
            decoded("city.jpeg", b"city-bytes"),
            decoded("noext", b"raw"),
        ]);
        session
            .generate(
                "playful",
                None,
                CaptionLimits::default(),
                &mut StdRng::seed_from_u64(8),
            )
            .await
            .unwrap();
        session
    }

    #[test]
    fn test_entry_base_name() {
        assert_eq!(entry_base_name(1, "beach.png"), "01_beach");
        assert_eq!(entry_base_name(12, "a.b.jpg"), "12_a.b");
    }

    #[tokio::test]
    async fn test_export_writes_files_in_feed_order() {
        let mut session = session().await;
        session.pin(ImageId(2)).unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("Feedle_Export");

        let summary = export_feed(&session, &out).unwrap();
        assert_eq!(summary.entries, 3);

        assert_eq!(fs::read(out.join("01_city.jpeg")).unwrap(), b"city-bytes");
        assert_eq!(fs::read(out.join("02_beach.png")).unwrap(), b"beach-bytes");
        assert_eq!(fs::read(out.join("03_noext.jpg")).unwrap(), b"raw");

        let caption = fs::read_to_string(out.join("01_city.txt")).unwrap();
        assert_eq!(caption, session.feed().entries()[0].caption);
    }

    #[tokio::test]
    async fn test_export_manifest() {
        let session = session().await;
        let tmp = tempfile::tempdir().unwrap();
        let summary = export_feed(&session, tmp.path()).unwrap();

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(summary.manifest).unwrap()).unwrap();
        assert_eq!(manifest["theme"], "playful");
        assert_eq!(manifest["mood"], "playful");
        assert!(manifest["generated_at"].is_string());
        let entries = manifest["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["id"], "img_1");
        assert_eq!(entries[0]["image"], "01_beach.png");
        assert_eq!(entries[2]["caption_file"], "03_noext.txt");
    }

    #[test]
    fn test_export_empty_feed_fails() {
        let session = Session::default();
        let tmp = tempfile::tempdir().unwrap();
        let err = export_feed(&session, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("No feed to save"));
        assert!(!tmp.path().join(MANIFEST_FILE).exists());
    }
}
