//! Parley CLI — entry point.
//!
//! # Commands
//!
//! - `parley chat [-m MESSAGE] [-i IMAGE]` — chat (single-shot or REPL)
//! - `parley init` — write a starter configuration file
//! - `parley status` — show configuration and endpoint status

mod helpers;
mod init;
mod repl;
mod status;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use parley_agent::{
    Agent, AgentSettings, CommandPlayer, ReadFileTool, TerminalTool, ThinkTool, ToolCatalog,
    UserInput, WriteFileTool,
};
use parley_core::config::{Config, load_config};
use parley_transport::HttpTransport;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Parley — conversational agent for OpenAI-compatible endpoints
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the agent (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Attach an image file to the message
        #[arg(short, long)]
        image: Option<String>,

        /// Attach a WAV audio file to the message
        #[arg(short, long)]
        audio: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Write a starter configuration file
    Init,

    /// Show configuration and endpoint status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            message,
            image,
            audio,
            logs,
        } => {
            init_logging(logs);
            run_chat(message, image, audio).await
        }
        Commands::Init => init::run(),
        Commands::Status => status::run(),
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(
    message: Option<String>,
    image: Option<String>,
    audio: Option<String>,
) -> Result<()> {
    let config = load_config(None);
    if !config.api.is_configured() {
        bail!(
            "no API key configured; run `parley init` and edit {}, \
             or set PARLEY_API__KEY",
            parley_core::config::get_config_path().display()
        );
    }

    let mut agent = build_agent(&config)?;

    match message {
        Some(msg) => {
            info!(agent = %agent.identifier(), "processing single message");
            let mut input = UserInput::text(&msg);
            if let Some(path) = image {
                input = input.with_image(helpers::expand_tilde(&path))?;
            }
            if let Some(path) = audio {
                input = input.with_audio_file(helpers::expand_tilde(&path))?;
            }
            let response = agent
                .submit(Some(input))
                .await
                .context("agent processing failed")?;
            helpers::print_response(&response);
        }
        None => repl::run(agent).await?,
    }

    Ok(())
}

/// Build an [`Agent`] from the loaded configuration.
pub fn build_agent(config: &Config) -> Result<Agent> {
    let transport = HttpTransport::new(&config.api).context("failed to build HTTP transport")?;

    let catalog = if config.tools.enabled {
        let mut catalog = ToolCatalog::new();
        catalog.register(Arc::new(TerminalTool::new(
            config.tools.terminal_timeout_secs,
        )));
        catalog.register(Arc::new(ReadFileTool));
        catalog.register(Arc::new(WriteFileTool));
        catalog.register(Arc::new(ThinkTool));
        let missing = catalog.validate();
        if !missing.is_empty() {
            bail!("tools declared without implementations: {}", missing.join(", "));
        }
        Some(catalog)
    } else {
        None
    };

    let settings = AgentSettings::from_config(config);
    let mut agent = Agent::new("cli", Arc::new(transport), catalog, settings);
    if config.audio.enabled {
        agent = agent.with_audio_sink(Arc::new(CommandPlayer::new(config.audio.player.clone())));
    }
    Ok(agent)
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("parley=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
