//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Panelcraft - endless AI-written comics in the terminal
#[derive(Parser, Debug)]
#[command(name = "panelcraft")]
#[command(about = "Endless AI-written comics in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read a comic panel by panel
    Read(ReadArgs),
}

/// Options for `panelcraft read`.
#[derive(Args, Debug, Clone)]
pub struct ReadArgs {
    /// Premise of the story; asked for when omitted
    pub premise: Option<String>,

    /// Text service
    #[arg(long, default_value = "Google AI Studio")]
    pub text_service: String,

    /// Text model
    #[arg(long, default_value = "gemini-2.5-flash")]
    pub text_model: String,

    /// Text service credential; empty uses the proxy pool
    #[arg(long, env = "PANELCRAFT_TEXT_KEY", default_value = "", hide_env_values = true)]
    pub text_key: String,

    /// Image service
    #[arg(long, default_value = "TensorOpera")]
    pub image_service: String,

    /// Image model
    #[arg(long, default_value = "Flux/Dev")]
    pub image_model: String,

    /// Image service credential; empty uses the proxy pool
    #[arg(long, env = "PANELCRAFT_IMAGE_KEY", default_value = "", hide_env_values = true)]
    pub image_key: String,

    /// Style prefix prepended to every image prompt
    #[arg(long, default_value = "Comic book panel, bold ink lines, flat colors. ")]
    pub style: String,

    /// Directory panel images are written to
    #[arg(long)]
    pub image_dir: Option<PathBuf>,

    /// Seconds to wait for a panel's image before moving on
    #[arg(long, default_value = "20")]
    pub image_wait: u64,
}
