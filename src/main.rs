mod caption;
mod captioner;
mod cli;
mod cli_cmds;
mod color;
mod config;
mod error;
mod export;
mod feed;
mod ingest;
mod matching;
mod mood;
mod palette;
mod session;
mod utils;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
