//! Terminal comic reader.

use super::ReadArgs;
use anyhow::{Context, Result};
use panelcraft::{
    ComicConfig, ContinuationFetcher, GenerationSettings, ImageFetcher, ImageState,
    LookAheadOrchestrator, Panel, ServiceSelection, decode_image, panel_file_name, status_line,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info, warn};

const HELP: &str = "[enter] next panel   [text] rewrite this caption   [r] retry image   [q] quit";

/// What the reader asked for after looking at a panel.
enum Choice {
    /// Advance, showing this caption for the current panel
    Next(String),
    Quit,
}

struct Reader {
    orchestrator: LookAheadOrchestrator,
    settings: GenerationSettings,
    image_dir: Option<PathBuf>,
    image_wait: Duration,
    lines: Lines<BufReader<Stdin>>,
}

/// Run the interactive reader until the user quits or stdin closes.
pub async fn read_comic(config: &ComicConfig, args: ReadArgs) -> Result<()> {
    if let Some(dir) = &args.image_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating image directory {}", dir.display()))?;
    }

    let orchestrator = LookAheadOrchestrator::new(
        Arc::new(ContinuationFetcher::from_config(config)),
        Arc::new(ImageFetcher::from_config(config)),
        *config.horizons(),
    );
    let settings = GenerationSettings::new(
        ServiceSelection::new(&args.text_service, &args.text_model, &args.text_key),
        ServiceSelection::new(&args.image_service, &args.image_model, &args.image_key),
        &args.style,
    );
    info!(
        text = %args.text_service,
        image = %args.image_service,
        "Starting reader"
    );

    let mut reader = Reader {
        orchestrator,
        settings,
        image_dir: args.image_dir,
        image_wait: Duration::from_secs(args.image_wait),
        lines: BufReader::new(tokio::io::stdin()).lines(),
    };

    let premise = match args.premise {
        Some(premise) if !premise.trim().is_empty() => premise,
        _ => match reader.ask("What is your story about?").await? {
            Some(premise) => premise,
            None => return Ok(()),
        },
    };
    reader.run(premise).await
}

impl Reader {
    async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        loop {
            println!("{}", question);
            match self.lines.next_line().await? {
                None => return Ok(None),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some(line.trim().to_string())),
            }
        }
    }

    async fn run(&mut self, premise: String) -> Result<()> {
        let mut shown = premise;
        loop {
            let panel = match self.orchestrator.advance(&self.settings, &shown).await {
                Ok(panel) => panel,
                Err(e) => {
                    warn!(error = %e, "Could not continue the story");
                    println!("\nThe story could not continue: {}", e);
                    match self.ask("Start over with a new premise:").await? {
                        Some(premise) => {
                            shown = premise;
                            continue;
                        }
                        None => return Ok(()),
                    }
                }
            };

            self.show(&panel).await?;
            match self.choose(&panel).await? {
                Choice::Next(caption) => shown = caption,
                Choice::Quit => return Ok(()),
            }
        }
    }

    async fn show(&self, panel: &Panel) -> Result<()> {
        println!("\n--- Panel {} ---", panel.index() + 1);
        println!("{}", panel.beat().caption);

        let state = self
            .orchestrator
            .wait_for_image(&panel.beat().depiction, self.image_wait)
            .await;
        self.show_image(*panel.index(), state.as_ref()).await
    }

    async fn show_image(&self, index: usize, state: Option<&ImageState>) -> Result<()> {
        match (state, &self.image_dir) {
            (Some(ImageState::Ready(payload)), Some(dir)) => {
                let path = save_image(dir, index, payload).await?;
                println!("image: {}", path.display());
            }
            _ => println!("{}", status_line(state)),
        }
        Ok(())
    }

    async fn choose(&mut self, panel: &Panel) -> Result<Choice> {
        loop {
            println!("{}", HELP);
            let Some(line) = self.lines.next_line().await? else {
                return Ok(Choice::Quit);
            };
            match line.trim() {
                "q" | "quit" => return Ok(Choice::Quit),
                "r" | "retry" => {
                    let state = self
                        .orchestrator
                        .retry_image(&self.settings, &panel.beat().depiction)
                        .await;
                    self.show_image(*panel.index(), state.as_ref()).await?;
                }
                "" => return Ok(Choice::Next(panel.beat().caption.clone())),
                edited => {
                    debug!(index = *panel.index(), "Caption rewritten");
                    return Ok(Choice::Next(edited.to_string()));
                }
            }
        }
    }
}

async fn save_image(dir: &Path, index: usize, payload: &str) -> Result<PathBuf> {
    let bytes = decode_image(payload)?;
    let path = dir.join(panel_file_name(index, &bytes));
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
