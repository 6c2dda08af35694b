//! Command implementations for the CLI interface.
//!
//! Each subcommand maps onto one or two API calls and prints the result.
//! `ui` (the default) hands over to the terminal interface.

use std::io;

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::api::ApiClient;
use crate::cli::Cli;
use crate::comment::CommentDraft;
use crate::config::ClientConfig;
use crate::display::*;
use crate::error::AppResult;
use crate::fields::*;
use crate::task::TaskDraft;
use crate::tui::run::run_tui;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the interactive terminal interface.
    Ui,

    /// List all tasks.
    List {
        /// Print raw JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// View a task and its comments.
    View {
        /// Task ID.
        id: u64,
    },

    /// Create a task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Status: pending | in-progress | completed.
        #[arg(long, value_enum, default_value_t = Status::Pending)]
        status: Status,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
    },

    /// Update fields on a task. Unspecified fields keep their current values.
    Update {
        /// Task ID.
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// Delete a task and all of its comments.
    Delete {
        /// Task ID.
        id: u64,
    },

    /// List the comments on a task.
    Comments {
        /// Task ID.
        task_id: u64,
    },

    /// Add a comment to a task.
    Comment {
        /// Task ID.
        task_id: u64,
        /// Comment text.
        content: String,
    },

    /// Replace the text of a comment.
    EditComment {
        /// Comment ID.
        id: u64,
        /// New comment text.
        content: String,
    },

    /// Delete a comment.
    DeleteComment {
        /// Comment ID.
        id: u64,
    },

    /// Show service status and advertised endpoints.
    Info,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub async fn cmd_ui(client: ApiClient, config: &ClientConfig) -> AppResult<()> {
    run_tui(client, config).await?;
    Ok(())
}

pub async fn cmd_list(client: &ApiClient, json: bool, ts_format: &str) -> AppResult<()> {
    let tasks = client.list_tasks().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else if tasks.is_empty() {
        println!("No tasks yet.");
    } else {
        print_task_table(&tasks, ts_format);
        println!("\nTasks ({})", tasks.len());
    }
    Ok(())
}

pub async fn cmd_view(client: &ApiClient, id: u64, ts_format: &str) -> AppResult<()> {
    let task = client.get_task(id).await?;
    let comments = client.list_comments(id).await?;
    print_task_detail(&task, ts_format);
    println!("\nComments ({})", comments.len());
    print_comments(&comments, ts_format);
    Ok(())
}

pub async fn cmd_add(
    client: &ApiClient,
    title: String,
    desc: Option<String>,
    status: Status,
    priority: Priority,
) -> AppResult<()> {
    let draft = TaskDraft::new(&title, desc.as_deref().unwrap_or_default(), status, priority)?;
    let task = client.create_task(&draft).await?;
    info!(id = task.id, "task created from cli");
    println!("Created task #{}: {}", task.id, task.title);
    Ok(())
}

pub async fn cmd_update(
    client: &ApiClient,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
) -> AppResult<()> {
    let current = client.get_task(id).await?;
    let base = TaskDraft::from_task(&current);
    let draft = TaskDraft::new(
        title.as_deref().unwrap_or(&base.title),
        desc.as_deref().unwrap_or(&base.description),
        status.unwrap_or(base.status),
        priority.unwrap_or(base.priority),
    )?;
    let task = client.update_task(id, &draft).await?;
    info!(id = task.id, "task updated from cli");
    println!("Updated task #{}: {}", task.id, task.title);
    Ok(())
}

pub async fn cmd_delete(client: &ApiClient, id: u64) -> AppResult<()> {
    client.delete_task(id).await?;
    info!(id, "task deleted from cli");
    println!("Deleted task #{id}");
    Ok(())
}

pub async fn cmd_comments(client: &ApiClient, task_id: u64, ts_format: &str) -> AppResult<()> {
    let comments = client.list_comments(task_id).await?;
    println!("Comments ({})", comments.len());
    print_comments(&comments, ts_format);
    Ok(())
}

pub async fn cmd_comment(client: &ApiClient, task_id: u64, content: String) -> AppResult<()> {
    let draft = CommentDraft::new(&content)?;
    let comment = client.create_comment(task_id, &draft).await?;
    println!("Added comment #{} to task #{}", comment.id, task_id);
    Ok(())
}

pub async fn cmd_edit_comment(client: &ApiClient, id: u64, content: String) -> AppResult<()> {
    let draft = CommentDraft::new(&content)?;
    let comment = client.update_comment(id, &draft).await?;
    println!("Updated comment #{}", comment.id);
    Ok(())
}

pub async fn cmd_delete_comment(client: &ApiClient, id: u64) -> AppResult<()> {
    let comment = client.get_comment(id).await?;
    client.delete_comment(id).await?;
    info!(id, task_id = comment.task_id, "comment deleted from cli");
    println!("Deleted comment #{id} from task #{}", comment.task_id);
    Ok(())
}

pub async fn cmd_info(client: &ApiClient) -> AppResult<()> {
    let info = client.service_info().await?;
    println!("{} ({}) at {}", info.message, info.status, client.base_url());
    for (name, path) in &info.endpoints {
        println!("  {name:<14} {path}");
    }
    Ok(())
}

pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "taskdesk", &mut io::stdout());
}
