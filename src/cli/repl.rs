//! Interactive chat loop.
//!
//! Plain lines go to the assistant; lines starting with `/` are commands.
//! `/remember` goes through the conversation's draft so it behaves exactly
//! like a "store as memory" button in a graphical front end.

use super::output::Output;
use crate::conversation::{SendOutcome, SkipReason};
use crate::memory::CreateOutcome;
use crate::session::Session;
use crate::types::{MemoryId, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

/// One parsed line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Send the text to the assistant
    Send(String),
    /// Store the text as a memory
    Remember(String),
    /// List cached memories
    Memories,
    /// Refetch the memory list
    Refresh,
    /// Search memories on the service
    Search(String),
    /// Delete a memory by id
    Forget(String),
    /// Reprint the transcript
    History,
    Help,
    Quit,
    /// Blank line
    Empty,
    /// Unrecognized `/command`
    Unknown(String),
}

/// Parses one line of user input.
pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ReplCommand::Send(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let (cmd, arg) = match rest.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim().to_string()),
        None => (rest, String::new()),
    };

    match cmd {
        "remember" | "r" => ReplCommand::Remember(arg),
        "memories" | "m" => ReplCommand::Memories,
        "refresh" => ReplCommand::Refresh,
        "search" | "s" => ReplCommand::Search(arg),
        "forget" => ReplCommand::Forget(arg),
        "history" => ReplCommand::History,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => ReplCommand::Unknown(other.to_string()),
    }
}

fn print_help(output: &Output) {
    output.header("Commands");
    output.kv("/remember <text>", "store text as a memory");
    output.kv("/memories", "list stored memories");
    output.kv("/refresh", "reload the memory list");
    output.kv("/search <query>", "search stored memories");
    output.kv("/forget <id>", "delete a memory");
    output.kv("/history", "show the conversation so far");
    output.kv("/quit", "leave");
}

/// Runs the interactive loop until `/quit` or end of input.
pub async fn run(session: &Session, output: &Output) -> Result<()> {
    output.banner();
    if let Err(e) = session.start().await {
        output.warning(&format!("Could not load memories: {}", e));
    } else {
        output.info(&format!("{} memories loaded", session.memory.len()));
    }
    output.info(&format!(
        "History sent with each message: {}",
        session.conversation.policy().describe()
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        output.prompt();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                output.error(&format!("Failed to read input: {}", e));
                break;
            }
        };

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => print_help(output),
            ReplCommand::Unknown(cmd) => {
                output.warning(&format!("Unknown command '/{}', try /help", cmd))
            }
            ReplCommand::Send(text) => {
                if let Err(e) = send(session, output, &text).await {
                    output.error(&format!("Message not delivered: {}", e));
                    output.hint("Send it again to retry");
                }
            }
            ReplCommand::Remember(text) => remember(session, output, text).await,
            ReplCommand::Memories => list_memories(session, output),
            ReplCommand::Refresh => match session.memory.refresh_all().await {
                Ok(_) => list_memories(session, output),
                Err(e) => output.error(&e.to_string()),
            },
            ReplCommand::Search(query) => match session.memory.search_memories(&query).await {
                Ok(results) if results.is_empty() => output.info("No matching memories"),
                Ok(results) => {
                    for r in results {
                        output.list_item(&r.display_text());
                    }
                }
                Err(e) => output.error(&e.to_string()),
            },
            ReplCommand::Forget(id) => forget(session, output, &id).await,
            ReplCommand::History => {
                for msg in session.conversation.transcript() {
                    output.message(&msg);
                }
            }
        }
    }

    output.newline();
    Ok(())
}

/// Sends one message and prints the answer.
///
/// A failed round trip is returned to the caller; the failed message stays
/// in the transcript either way.
pub async fn send(session: &Session, output: &Output, text: &str) -> Result<()> {
    match session.conversation.send_message(text).await? {
        SendOutcome::Answered(answer) => output.message(&answer),
        SendOutcome::Skipped(SkipReason::Pending) => {
            output.warning("Still waiting for the previous answer")
        }
        SendOutcome::Skipped(SkipReason::EmptyInput) => {}
    }
    Ok(())
}

async fn remember(session: &Session, output: &Output, text: String) {
    session.conversation.set_draft(text);
    match session.conversation.store_current_draft_as_memory().await {
        Ok(CreateOutcome::Stored { refreshed, .. }) => {
            output.success("Memory stored");
            if !refreshed {
                output.warning("Stored, but the memory list could not be reloaded");
            }
        }
        Ok(CreateOutcome::Skipped) => output.hint("Usage: /remember <text>"),
        Err(e) => output.error(&format!("Memory not stored: {}", e)),
    }
}

async fn forget(session: &Session, output: &Output, id: &str) {
    let id: MemoryId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            output.hint("Usage: /forget <id>");
            return;
        }
    };
    match session.memory.delete_memory(&id).await {
        Ok(()) => output.success(&format!("Memory #{} deleted", id)),
        Err(e) => output.error(&e.to_string()),
    }
}

/// Prints the cached memory list.
pub fn list_memories(session: &Session, output: &Output) {
    let memories = session.memory.memories();
    if memories.is_empty() {
        output.info("No memories stored yet");
        return;
    }
    output.table_header(&["Id", "Content"]);
    for m in &memories {
        output.memory(m);
    }
}
