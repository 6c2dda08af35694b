//! # taskdesk - Task Tracker Client
//!
//! A terminal client for a small task-tracking REST service. Tasks carry a
//! status and a priority; each task owns a thread of comments.
//!
//! ## Key Features
//!
//! - **Two-pane TUI**: task list on the left, comments for the selected task
//!   on the right, with inline create/edit forms and confirmed deletes
//! - **Scriptable CLI**: every backend operation is also a subcommand
//! - **Non-blocking**: requests run on background tasks so the interface
//!   never freezes while the service is slow
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive interface against a local service
//! taskdesk
//!
//! # Point at another service
//! taskdesk --base-url http://tasks.internal:5000 ui
//!
//! # Add and list tasks from the shell
//! taskdesk add "Write release notes" --priority high
//! taskdesk list
//!
//! # Comment on a task
//! taskdesk comment 3 "Blocked on review"
//! ```
//!
//! ## Configuration
//!
//! Settings are resolved from command-line flags, then environment variables
//! (`TASKDESK_API_URL`, `TASKDESK_LOG`), then `~/.config/taskdesk/config.toml`:
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000"
//! request_timeout_secs = 10
//!
//! [ui]
//! poll_timeout_ms = 50
//! timestamp_format = "%Y-%m-%d %H:%M"
//! ```
//!
//! Logs go to `$TMPDIR/taskdesk.log` (or `--log-file`) since the TUI owns the terminal.

use std::path::Path;

use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

pub mod api;
pub mod cli;
pub mod cmd;
pub mod comment;
pub mod config;
pub mod display;
pub mod error;
pub mod fields;
pub mod net;
pub mod task;
pub mod timestamp;
#[cfg(test)]
mod test_support;
pub mod tui {
    pub mod colors;
    pub mod app;
    pub mod comment_form;
    pub mod comment_list;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod task_list;
    pub mod utils;
}

use api::ApiClient;
use cli::Cli;
use cmd::*;
use config::ClientConfig;
use error::AppResult;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    if let Err(e) = run(cli).await {
        error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        drop(log_guard);
        std::process::exit(1);
    }
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown so buffered
/// log lines are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdesk.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = ClientConfig::load(&cli)?;
    let ts_format = config.timestamp_format.clone();

    let command = cli.command.unwrap_or(Commands::Ui);
    if let Commands::Completions { shell } = command {
        cmd_completions(shell);
        return Ok(());
    }

    let client = ApiClient::from_config(&config)?;
    info!(base_url = client.base_url(), ?command, "taskdesk starting");

    match command {
        Commands::Ui => cmd_ui(client, &config).await,
        Commands::List { json } => cmd_list(&client, json, &ts_format).await,
        Commands::View { id } => cmd_view(&client, id, &ts_format).await,
        Commands::Add {
            title,
            desc,
            status,
            priority,
        } => cmd_add(&client, title, desc, status, priority).await,
        Commands::Update {
            id,
            title,
            desc,
            status,
            priority,
        } => cmd_update(&client, id, title, desc, status, priority).await,
        Commands::Delete { id } => cmd_delete(&client, id).await,
        Commands::Comments { task_id } => cmd_comments(&client, task_id, &ts_format).await,
        Commands::Comment { task_id, content } => cmd_comment(&client, task_id, content).await,
        Commands::EditComment { id, content } => cmd_edit_comment(&client, id, content).await,
        Commands::DeleteComment { id } => cmd_delete_comment(&client, id).await,
        Commands::Info => cmd_info(&client).await,
        Commands::Completions { .. } => Ok(()),
    }
}
