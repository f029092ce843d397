//! Panelcraft CLI binary.

use clap::Parser;
use panelcraft::{ComicConfig, init_console_tracing};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cli::{Cli, Commands, read_comic};

    dotenvy::dotenv().ok();
    init_console_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ComicConfig::from_file(path)?,
        None => ComicConfig::load()?,
    };

    match cli.command {
        Commands::Read(args) => read_comic(&config, args).await?,
    }

    Ok(())
}
