use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "feedle")]
#[command(version)]
#[command(about = "Palette-matched image feeds with generated captions")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Image directory
    #[arg(short, long, global = true)]
    pub(crate) dir: Option<PathBuf>,

    /// Include subdirectories when reading the image directory
    #[arg(short, long, global = true)]
    pub(crate) recursive: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the color palette of an image
    Palette {
        /// Path to image
        path: PathBuf,
        /// Number of colors (defaults to the preview size)
        #[arg(short, long)]
        size: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Rank the image directory against a reference image
    Rank {
        /// Reference image
        reference: PathBuf,
        #[command(flatten)]
        matching: MatchArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Interpret a theme as a mood and hashtags
    Mood {
        /// Free-text theme, e.g. "romantic sunset"
        theme: String,
        /// Dominant color used when no keyword matches (e.g. "#40C040")
        #[arg(short, long)]
        color: Option<String>,
        /// Seed for the random fallback
        #[arg(long)]
        seed: Option<u64>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Synthesize captions for a theme
    Caption {
        /// Free-text theme
        theme: String,
        /// Number of captions
        #[arg(short = 'n', long, default_value = "3")]
        count: usize,
        /// Dominant color used when no keyword matches
        #[arg(short, long)]
        color: Option<String>,
        /// Seed for template and mood choice
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Build a captioned feed from the image directory
    Feed {
        /// Free-text theme for the captions
        theme: String,
        /// Reference image to rank against
        #[arg(long = "reference", short = 'R')]
        reference: Option<PathBuf>,
        #[command(flatten)]
        matching: MatchArgs,
        /// Seed for mood and caption choice
        #[arg(long)]
        seed: Option<u64>,
        /// Ask the remote captioning service first
        #[arg(long)]
        remote: bool,
        /// Curate the feed interactively before finishing
        #[arg(short, long)]
        interactive: bool,
        /// Export the feed (to DIR, or the configured export directory)
        #[arg(short, long, value_name = "DIR", num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show configuration
    Config {
        /// Only print the config file path
        #[arg(long)]
        path: bool,
    },
}

/// Matcher overrides shared by `rank` and `feed`.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct MatchArgs {
    /// Distance at or above which candidates are dropped
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Number of leading palette colors compared
    #[arg(long)]
    pub dominant: Option<usize>,
}
