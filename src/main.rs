//! Recall CLI Entry Point
//!
//! - `recall` - Interactive chat (default)
//! - `recall ask <text>` - One-shot question
//! - `recall memories ...` - Manage stored memories
//! - `recall init` - Write a default recall.toml
//! - `recall config` - Show or validate configuration

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use recall::cli::init::{self, InitConfig, InitResult};
use recall::cli::output::Output;
use recall::cli::{repl, Cli, Commands, MemoryCommands};
use recall::{MemoryId, RecallConfig, Session};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(level: &str, verbose: bool) {
    let default_level = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("recall={}", default_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        // Init has to work before any configuration exists
        Some(Commands::Init {
            path,
            force,
            base_url,
        }) => {
            init_tracing("warn", cli.verbose);
            match init::run(
                InitConfig {
                    path,
                    force,
                    base_url,
                },
                &output,
            ) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => Err(anyhow::anyhow!(e)),
            }
        }
        Some(Commands::Config { full, validate }) => {
            let config = load_config(&cli.config, cli.verbose)?;
            output.success("Configuration is valid");
            if full {
                println!("{}", config.to_toml()?);
            } else if !validate {
                show_config(&config, &output);
            }
            Ok(())
        }
        None | Some(Commands::Chat) => {
            let session = open_session(&cli.config, cli.verbose)?;
            repl::run(&session, &output).await?;
            Ok(())
        }
        Some(Commands::Ask { text }) => {
            let session = open_session(&cli.config, cli.verbose)?;
            repl::send(&session, &output, &text)
                .await
                .context("Message not delivered")?;
            Ok(())
        }
        Some(Commands::Memories(cmd)) => {
            let session = open_session(&cli.config, cli.verbose)?;
            run_memories(&session, &output, cmd).await
        }
    }
}

fn load_config(path: &Path, verbose: bool) -> Result<RecallConfig> {
    let config = RecallConfig::load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    init_tracing(&config.logging.level, verbose);
    Ok(config)
}

fn open_session(path: &Path, verbose: bool) -> Result<Session> {
    let config = load_config(path, verbose)?;
    Ok(Session::from_config(config)?)
}

fn show_config(config: &RecallConfig, output: &Output) {
    output.header("Configuration");
    output.kv("api.base_url", &config.api.base_url);
    output.kv(
        "api.timeout_secs",
        &config
            .api
            .timeout_secs
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string()),
    );
    output.kv("conversation.history", &config.conversation.history.describe());
    output.kv("logging.level", &config.logging.level);
}

async fn run_memories(session: &Session, output: &Output, cmd: MemoryCommands) -> Result<()> {
    match cmd {
        MemoryCommands::List => {
            session.memory.refresh_all().await?;
            repl::list_memories(session, output);
        }
        MemoryCommands::Add { text } => {
            let outcome = session.memory.create_memory(&text).await?;
            if outcome.is_stored() {
                output.success("Memory stored");
                repl::list_memories(session, output);
            } else {
                output.warning("Nothing to store: the text is empty");
            }
        }
        MemoryCommands::Search { query } => {
            let results = session.memory.search_memories(&query).await?;
            if results.is_empty() {
                output.info("No matching memories");
            }
            for r in results {
                output.list_item(&r.display_text());
            }
        }
        MemoryCommands::Delete { id } => {
            let id: MemoryId = id.parse()?;
            session.memory.delete_memory(&id).await?;
            output.success(&format!("Memory #{} deleted", id));
        }
    }
    Ok(())
}
