use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal client for a task and comment service.
/// Runs the interactive UI when no subcommand is given.
#[derive(Parser, Debug)]
#[command(name = "taskdesk", version, about = "Manage tasks and their comments from the terminal")]
pub struct Cli {
    /// Root URL of the task service.
    #[arg(long, global = true, env = "TASKDESK_API_URL")]
    pub base_url: Option<String>,

    /// Path to config file (default: `~/.config/taskdesk/config.toml`).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Timestamp display format (chrono format string).
    #[arg(long, global = true)]
    pub timestamp_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info", env = "TASKDESK_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/taskdesk.log`).
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
