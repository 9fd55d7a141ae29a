//! Image ingestion: files on disk to decoded palettes.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::error::IngestError;
use crate::palette::{extract_palette, Palette};
use crate::utils::has_extension;

/// An image that decoded cleanly, before it gets an id.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub name: String,
    pub path: Option<PathBuf>,
    pub raw: Arc<[u8]>,
    pub palette: Palette,
}

/// Decode one image from memory and extract its palette.
pub fn decode_image(name: &str, bytes: Vec<u8>, palette_size: usize) -> Result<DecodedImage, IngestError> {
    let img = image::load_from_memory(&bytes).map_err(|source| IngestError::Decode {
        name: name.to_string(),
        source,
    })?;
    let palette = extract_palette(&img, palette_size);
    Ok(DecodedImage {
        name: name.to_string(),
        path: None,
        raw: Arc::from(bytes),
        palette,
    })
}

/// Encoded bytes waiting to be decoded.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub name: String,
    pub path: Option<PathBuf>,
    pub bytes: Vec<u8>,
}

fn read_file(path: &Path) -> Result<RawImage, IngestError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let bytes = fs::read(path).map_err(|source| IngestError::Read {
        name: name.clone(),
        source,
    })?;
    Ok(RawImage {
        name,
        path: Some(path.to_path_buf()),
        bytes,
    })
}

/// Image files in `dir`, sorted by path for a stable order.
pub fn collect_image_paths(dir: &Path, recursive: bool, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = if recursive {
        WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.path().to_path_buf())
            .filter(|p| p.is_file() && has_extension(p, extensions))
            .collect()
    } else {
        fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && has_extension(p, extensions))
            .collect()
    };
    paths.sort();
    Ok(paths)
}

/// Result of ingesting a batch: successes in input order plus isolated failures.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub images: Vec<DecodedImage>,
    pub failures: Vec<IngestError>,
}

/// Read and decode files. A failing file is logged and skipped; the rest of
/// the batch is unaffected.
pub fn load_paths(paths: &[PathBuf], palette_size: usize) -> IngestReport {
    let reads: Vec<Result<RawImage, IngestError>> = paths.par_iter().map(|p| read_file(p)).collect();

    let mut raws = Vec::with_capacity(reads.len());
    let mut unreadable = Vec::new();
    for read in reads {
        match read {
            Ok(raw) => raws.push(raw),
            Err(e) => {
                tracing::warn!("{e}");
                unreadable.push(e);
            }
        }
    }

    let mut report = decode_batch(raws, palette_size);
    report.failures.extend(unreadable);
    report
}

/// Decode in-memory images in parallel, keeping input order.
pub fn decode_batch(items: Vec<RawImage>, palette_size: usize) -> IngestReport {
    let total = items.len();
    let processed = AtomicUsize::new(0);

    let results: Vec<Result<DecodedImage, IngestError>> = items
        .into_par_iter()
        .map(|raw| -> Result<DecodedImage, IngestError> {
            let count = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if count % 10 == 0 || count == total {
                eprint!("\rExtracting palettes... {}/{}", count, total);
            }
            let mut decoded = decode_image(&raw.name, raw.bytes, palette_size)?;
            decoded.path = raw.path;
            Ok(decoded)
        })
        .collect();

    if total > 0 {
        eprintln!(" done!");
    }

    let mut report = IngestReport::default();
    for result in results {
        match result {
            Ok(image) => report.images.push(image),
            Err(e) => {
                tracing::warn!("{e}");
                report.failures.push(e);
            }
        }
    }
    report
}
