//! FinanceGPT terminal client
//!
//! Run with: cargo run -- [chat | ask <query> | config]
//!
//! # Configuration
//!
//! Config file: `--config <path>`, else `<config dir>/financegpt/config.toml`,
//! else `./financegpt.toml`. Environment variables:
//! - `FINANCEGPT_API_URL`: backend origin (default: http://localhost:8000)
//! - `FINANCEGPT_REQUEST_TIMEOUT`: auth request timeout in seconds
//! - `FINANCEGPT_LOG_LEVEL`, `FINANCEGPT_LOG_FORMAT`: logging
//! - `FINANCEGPT_TOKEN`: bearer token for `ask`
//! - `RUST_LOG`: log filter, wins over the configured level

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use financegpt::chat::{ChatController, FrameEffect};
use financegpt::config::{generate_default_config, Config, LoggingConfig};
use financegpt::terminal::{suggestion_lines, SessionEnd, StdConsole, TerminalApp};
use financegpt::{HttpAuthBackend, MemoryTokenStore, StreamClient};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "financegpt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat with the FinanceGPT financial assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend origin (overrides config and FINANCEGPT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and chat (default)
    Chat,

    /// Ask a single question and stream the answer to stdout
    Ask {
        /// The question
        #[arg(required = true)]
        query: Vec<String>,

        /// Bearer token from a previous login
        #[arg(long, env = "FINANCEGPT_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Config { output }) = &cli.command {
        return write_default_config(output.as_deref());
    }

    let mut config =
        Config::load_default(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    init_logging(&config.logging)?;

    tracing::info!(
        "FinanceGPT client v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api.origin()
    );

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(&config).await,
        Commands::Ask { query, token } => {
            if !run_ask(&config, &query.join(" "), token).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Config { .. } => Ok(()),
    }
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("financegpt={}", config.level)));

    let writer = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };
    let ansi = config.file.is_none();

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()?;
    }
    Ok(())
}

async fn run_chat(config: &Config) -> anyhow::Result<()> {
    let backend =
        HttpAuthBackend::new(config.api.clone()).context("Failed to create HTTP client")?;
    let stream = StreamClient::from_config(&config.api);
    let store = Arc::new(MemoryTokenStore::new());

    let mut app = TerminalApp::new(StdConsole::new(), backend, stream, store, &config.chat);
    let end = app.run().await.context("Terminal I/O failed")?;

    if end == SessionEnd::LoggedOut {
        tracing::info!("Session ended by logout");
    }
    Ok(())
}

/// Returns false when the answer ended with an error notification
async fn run_ask(config: &Config, query: &str, token: Option<String>) -> anyhow::Result<bool> {
    let store = token.map(MemoryTokenStore::with_token).unwrap_or_default();
    let mut chat = ChatController::new(store);
    let client = StreamClient::from_config(&config.api);

    let result = client
        .run_query(&mut chat, query, |effect, _| match effect {
            FrameEffect::Started { token, .. } | FrameEffect::Appended { token, .. } => {
                print!("{}", token);
                let _ = std::io::stdout().flush();
            }
            FrameEffect::Recommended { recommendations, .. } if !recommendations.is_empty() => {
                print!("\n\n{}", suggestion_lines(recommendations));
            }
            _ => {}
        })
        .await;
    println!();

    match result {
        Ok(None) => bail!("Nothing to ask: the query is blank"),
        Ok(Some(_)) => {}
        Err(e) => tracing::debug!(error = %e, "Query ended early"),
    }

    let notifications = chat.take_notifications();
    for notification in &notifications {
        eprintln!("{}: {}", notification.title, notification.description);
    }
    Ok(notifications.is_empty())
}

fn write_default_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }
    Ok(())
}
