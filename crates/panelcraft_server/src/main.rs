use anyhow::Result;
use clap::Parser;
use panelcraft_core::{ComicConfig, init_console_tracing};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Panelcraft generation proxy", long_about = None)]
struct Args {
    /// Address to listen on (overrides proxy.bind)
    #[arg(short, long)]
    bind: Option<String>,

    /// Configuration file layered over the bundled defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_console_tracing();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ComicConfig::from_file(path)?,
        None => ComicConfig::load()?,
    };
    if let Some(bind) = args.bind {
        let proxy = config.proxy().clone().with_bind(bind);
        config = config.with_proxy(proxy);
    }

    info!(
        bind = %config.proxy().bind(),
        fallback_text_model = %config.proxy().fallback_text_model(),
        "Starting Panelcraft generation proxy"
    );
    panelcraft_server::run(&config).await?;
    Ok(())
}
