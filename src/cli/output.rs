//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the Recall CLI.

use crate::types::{ChatMessage, Memory, MemoryRef, MessageStatus, Sender};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the banner shown when an interactive chat starts
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}",
                "recall".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
            println!(
                "   {}\n",
                "Type a message, /help for commands, /quit to leave".dimmed()
            );
        } else {
            println!(
                "\n   recall v{}\n   Type a message, /help for commands, /quit to leave\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {}", message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a stored memory as `id  content`
    pub fn memory(&self, memory: &Memory) {
        let id = format!("#{}", memory.id);
        if self.colored {
            println!("    {:<6} {}", id.dimmed(), memory.content);
        } else {
            println!("    {:<6} {}", id, memory.content);
        }
    }

    /// Print a transcript entry, with the memories an answer drew upon
    pub fn message(&self, msg: &ChatMessage) {
        let time = msg.timestamp.format("%H:%M").to_string();
        let failed = msg.status == MessageStatus::Failed;

        match (msg.sender, self.colored) {
            (Sender::User, true) => {
                let marker = if failed { " (not delivered)" } else { "" };
                println!(
                    "  {} {} {}{}",
                    time.dimmed(),
                    "you".bright_blue().bold(),
                    msg.text,
                    marker.red()
                );
            }
            (Sender::User, false) => {
                let marker = if failed { " [NOT DELIVERED]" } else { "" };
                println!("  {} you: {}{}", time, msg.text, marker);
            }
            (Sender::Assistant, true) => {
                println!("  {} {} {}", time.dimmed(), "assistant".bright_green().bold(), msg.text);
            }
            (Sender::Assistant, false) => {
                println!("  {} assistant: {}", time, msg.text);
            }
        }

        if !msg.memories_used.is_empty() {
            self.memories_used(&msg.memories_used);
        }
    }

    /// Print the memories an answer drew upon
    pub fn memories_used(&self, used: &[MemoryRef]) {
        if self.colored {
            println!("      {}", "memories used:".dimmed());
        } else {
            println!("      memories used:");
        }
        for m in used {
            self.list_item(&m.display_text());
        }
    }

    /// Print the interactive prompt without a newline
    pub fn prompt(&self) {
        if self.colored {
            print!("{} ", ">".bright_cyan().bold());
        } else {
            print!("> ");
        }
        io::stdout().flush().ok();
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header: String = columns
            .iter()
            .map(|c| format!("{:<15}", c))
            .collect::<Vec<_>>()
            .join(" ");
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * 16).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * 16));
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}
