use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::captioner::CaptionLimits;
use crate::matching::{MatchParams, DEFAULT_DOMINANT_COUNT, DEFAULT_THRESHOLD};
use crate::palette::{DEFAULT_PALETTE_SIZE, PREVIEW_PALETTE_SIZE};
use crate::utils::{expand_tilde, IMAGE_EXTENSIONS};

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "FEEDLE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub captioner: CaptionerConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    pub directory: PathBuf,
    pub extensions: Vec<String>,
    pub recursive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Colors kept per stored image
    pub size: usize,
    /// Colors shown for the reference preview
    pub preview_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Mean RGB distance at or above which a candidate is dropped
    pub threshold: f64,
    /// Leading palette colors compared
    pub dominant_count: usize,
}

/// Remote captioning. Off unless enabled; the local synthesizer always backs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionerConfig {
    pub enabled: bool,
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_concurrency() -> usize {
    4
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub directory: PathBuf,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir().unwrap_or_else(|| PathBuf::from("~/Pictures")),
            extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            recursive: false,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_PALETTE_SIZE,
            preview_size: PREVIEW_PALETTE_SIZE,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            dominant_count: DEFAULT_DOMINANT_COUNT,
        }
    }
}

impl Default for CaptionerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint:
                "https://api-inference.huggingface.co/models/Salesforce/blip-image-captioning-large"
                    .to_string(),
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir()
                .map(|p| p.join("Feedle_Export"))
                .unwrap_or_else(|| PathBuf::from("~/Pictures/Feedle_Export")),
        }
    }
}

impl Config {
    /// Return the path to the configuration file.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        directories::ProjectDirs::from("com", "feedle", "feedle")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Load config from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, writing defaults if missing. A corrupt file
    /// falls back to defaults and is left untouched.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            match toml::from_str::<Config>(&data) {
                Ok(config) => Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    eprintln!("Warning: Invalid config at {}, using defaults.", path.display());
                    Ok(Config::default())
                }
            }
        } else {
            let config = Config::default();
            if let Err(e) = config.save_to(path) {
                tracing::warn!("Could not write default config: {e:#}");
            }
            Ok(config)
        }
    }

    /// Save config to file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = toml::to_string_pretty(self)?;
        fs::write(path, data)?;

        Ok(())
    }

    /// Image directory, expanding ~ if needed.
    pub fn image_dir(&self) -> PathBuf {
        expand_tilde(&self.images.directory)
    }

    pub fn export_dir(&self) -> PathBuf {
        expand_tilde(&self.export.directory)
    }

    pub fn match_params(&self) -> MatchParams {
        MatchParams {
            threshold: self.matching.threshold,
            dominant_count: self.matching.dominant_count,
        }
    }

    pub fn caption_limits(&self) -> CaptionLimits {
        CaptionLimits {
            timeout: Duration::from_secs(self.captioner.timeout_secs),
            concurrency: self.captioner.concurrency.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.palette.size, 8);
        assert_eq!(config.palette.preview_size, 6);
        assert_eq!(config.match_params(), MatchParams::default());
        assert!(!config.captioner.enabled);
        assert_eq!(config.caption_limits().timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.matching.dominant_count, 3);
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "[matching]\nthreshold = 55.5\ndominant_count = 2\n\n[captioner]\nenabled = true\nendpoint = \"http://localhost:9000\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.matching.threshold, 55.5);
        assert_eq!(config.match_params().dominant_count, 2);
        assert!(config.captioner.enabled);
        assert_eq!(config.captioner.concurrency, 4);
        assert_eq!(config.palette.size, 8);
    }

    #[test]
    fn test_corrupt_file_falls_back_without_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is [not toml").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.palette.size, DEFAULT_PALETTE_SIZE);
        assert_eq!(fs::read_to_string(&path).unwrap(), "this is [not toml");
    }

    #[test]
    fn test_round_trip_through_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let mut config = Config::default();
        config.images.recursive = true;
        config.save_to(&path).unwrap();
        assert!(Config::load_from(&path).unwrap().images.recursive);
    }
}
