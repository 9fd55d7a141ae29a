use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use super::{Cli, Commands};
use crate::cli_cmds::*;
use crate::config::Config;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(crate) async fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if cli.recursive {
        config.images.recursive = true;
    }
    let image_dir = cli.dir.unwrap_or_else(|| config.image_dir());

    match cli.command {
        Commands::Palette { path, size, json } => {
            cmd_palette(&config, &path, size, json)?;
        }
        Commands::Rank {
            reference,
            matching,
            json,
        } => {
            cmd_rank(&config, &image_dir, &reference, matching, json)?;
        }
        Commands::Mood {
            theme,
            color,
            seed,
            json,
        } => {
            cmd_mood(&theme, color.as_deref(), seed, json)?;
        }
        Commands::Caption {
            theme,
            count,
            color,
            seed,
        } => {
            cmd_caption(&theme, count, color.as_deref(), seed)?;
        }
        Commands::Feed {
            theme,
            reference,
            matching,
            seed,
            remote,
            interactive,
            export,
            json,
        } => {
            let options = FeedOptions {
                theme,
                reference,
                matching,
                seed,
                remote,
                interactive,
                export,
                json,
            };
            cmd_feed(&config, &image_dir, options).await?;
        }
        Commands::Config { path } => {
            cmd_config(&config, path)?;
        }
    }

    Ok(())
}
