//! CLI module for Recall
//!
//! Provides command-line interface parsing for the `recall` binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;
pub mod repl;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Recall - chat with a memory-augmented assistant
#[derive(Parser, Debug)]
#[command(
    name = "recall",
    version,
    about = "Recall - chat with a memory-augmented assistant",
    long_about = "Chat with an assistant that remembers what you tell it.\n\n\
                  Run without arguments to start an interactive chat, or use the\n\
                  subcommands to manage stored memories directly.",
    after_help = "EXAMPLES:\n    \
                  recall                              # Interactive chat\n    \
                  recall ask \"what do I like?\"        # One-shot question\n    \
                  recall memories add \"I like tea\"    # Store a memory\n    \
                  recall memories list                # Show stored memories\n    \
                  recall --config my.toml             # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "recall.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat (same as running without subcommand)
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question to send
        text: String,
    },

    /// Manage stored memories
    #[command(subcommand)]
    Memories(MemoryCommands),

    /// Write a default recall.toml
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing recall.toml
        #[arg(short, long)]
        force: bool,

        /// Base URL of the assistant service
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Show configuration information
    Config {
        /// Print the effective configuration as TOML
        #[arg(short = 'f', long)]
        full: bool,

        /// Only validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// Memory management subcommands
#[derive(Subcommand, Debug)]
pub enum MemoryCommands {
    /// List all stored memories
    List,

    /// Store a new memory
    Add {
        /// Text to remember
        text: String,
    },

    /// Search stored memories
    Search {
        /// Search query
        query: String,
    },

    /// Delete a memory by id
    Delete {
        /// Memory id
        id: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
