//! Init command implementation
//!
//! Writes a commented `recall.toml` with the default settings.

use super::output::Output;
use crate::conversation::history::DEFAULT_HISTORY_WINDOW;
use crate::utils::config::RecallConfig;
use std::fs;
use std::path::PathBuf;

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Configuration written
    Success,
    /// recall.toml already exists and `--force` was not given
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Base URL to write instead of the default
    pub base_url: Option<String>,
}

/// Renders the file contents for `base_url`
pub fn render_config(base_url: &str) -> String {
    format!(
        r#"# Recall configuration

[api]
# Base URL of the assistant service
base_url = "{base_url}"
# Transport timeout in seconds (unset = no timeout)
# timeout_secs = 30

[conversation]
# How much of the transcript is sent with each chat request:
#   {{ policy = "full" }}
#   {{ policy = "window", max_messages = {window} }}
#   {{ policy = "token_budget", max_tokens = 4000 }}
history = {{ policy = "full" }}

[logging]
level = "info"
"#,
        window = DEFAULT_HISTORY_WINDOW
    )
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.header("Initializing Recall");

    let config_path = config.path.join("recall.toml");
    if config_path.exists() && !config.force {
        output.warning("recall.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    let base_url = config
        .base_url
        .unwrap_or_else(|| RecallConfig::default().api.base_url);
    let content = render_config(&base_url);

    // Refuse to write something the loader would reject
    match RecallConfig::from_toml(&content) {
        Ok(parsed) => {
            if let Err(e) = parsed.validate() {
                output.error(&e.to_string());
                return InitResult::Error(e.to_string());
            }
        }
        Err(e) => {
            output.error(&e.to_string());
            return InitResult::Error(e.to_string());
        }
    }

    if let Err(e) = fs::create_dir_all(&config.path) {
        output.error(&format!("Failed to create {}: {}", config.path.display(), e));
        return InitResult::Error(e.to_string());
    }
    if let Err(e) = fs::write(&config_path, content) {
        output.error(&format!("Failed to write recall.toml: {}", e));
        return InitResult::Error(e.to_string());
    }

    output.success(&format!("Created {}", config_path.display()));
    InitResult::Success
}
