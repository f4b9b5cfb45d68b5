use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clawdbot_core::session::Directive;

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "clawdbot")]
#[command(about = "Clawdbot - chat assistant for local models")]
#[command(version)]
struct Cli {
    /// UI mode (copilot, chat)
    #[arg(long, default_value = "copilot")]
    mode: String,

    /// Model name on the local generate endpoint
    #[arg(short, long)]
    model: Option<String>,

    /// Path to the chat memory file
    #[arg(long)]
    memory: Option<PathBuf>,

    /// Analyze a source file and exit (one-shot, not saved to memory)
    #[arg(short, long)]
    analyze: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = clawdbot_core::Settings::load();

    if let Some(model) = cli.model {
        settings.gateway.model = model;
    }
    if let Some(memory) = cli.memory {
        settings.memory.path = memory;
    }

    let directive: Directive = cli
        .mode
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    if let Some(ref path) = cli.analyze {
        app::run_analyze(&settings, path).await?;
    } else {
        app::run_tui(settings, directive).await?;
    }

    Ok(())
}
