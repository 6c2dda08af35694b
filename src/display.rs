//! Text formatting shared by the CLI commands and the TUI.

use chrono::{DateTime, Local, Utc};

use crate::comment::Comment;
use crate::fields::*;
use crate::task::Task;

/// Format a task status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Pending => "Pending",
        Status::InProgress => "In Progress",
        Status::Completed => "Completed",
    }
}

/// Format a priority level for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

/// Render a timestamp in local time using a chrono format string.
pub fn format_timestamp(ts: Option<DateTime<Utc>>, format: &str) -> String {
    match ts {
        Some(ts) => ts.with_timezone(&Local).format(format).to_string(),
        None => "-".into(),
    }
}

/// Creation and (if edited) update stamps for a comment.
pub fn comment_stamps(comment: &Comment, format: &str) -> (String, Option<String>) {
    let created = format_timestamp(comment.created_at, format);
    let updated = comment
        .was_edited()
        .then(|| format_timestamp(comment.updated_at, format));
    (created, updated)
}

/// "1 comment" / "3 comments".
pub fn comment_count_label(count: u64) -> String {
    if count == 1 {
        "1 comment".to_string()
    } else {
        format!("{count} comments")
    }
}

/// Truncate a string to a display width, appending an ellipsis if cut.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = s.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Print tasks as a fixed-width table.
pub fn print_task_table(tasks: &[Task], ts_format: &str) {
    println!(
        "{:<5} {:<12} {:<8} {:<17} {:<9} {}",
        "ID", "Status", "Priority", "Created", "Comments", "Title"
    );
    println!("{}", "-".repeat(80));
    for t in tasks {
        println!(
            "{:<5} {:<12} {:<8} {:<17} {:<9} {}",
            t.id,
            format_status(t.status),
            format_priority(t.priority),
            truncate(&format_timestamp(t.created_at, ts_format), 17),
            t.comments_count,
            truncate(&t.title, 60),
        );
    }
}

/// Print one task with all of its fields.
pub fn print_task_detail(task: &Task, ts_format: &str) {
    println!("#{} {}", task.id, task.title);
    println!("  Status:   {}", format_status(task.status));
    println!("  Priority: {}", format_priority(task.priority));
    println!("  Created:  {}", format_timestamp(task.created_at, ts_format));
    if task.updated_at.is_some() && task.updated_at != task.created_at {
        println!("  Updated:  {}", format_timestamp(task.updated_at, ts_format));
    }
    println!("  Comments: {}", task.comments_count);
    if let Some(desc) = task.description_text() {
        println!();
        for line in desc.lines() {
            println!("  {line}");
        }
    }
}

/// Print comments, newest annotation included for edited ones.
pub fn print_comments(comments: &[Comment], ts_format: &str) {
    if comments.is_empty() {
        println!("No comments yet.");
        return;
    }
    for c in comments {
        let (created, updated) = comment_stamps(c, ts_format);
        match updated {
            Some(updated) => println!("[{}] {} (updated {})", c.id, created, updated),
            None => println!("[{}] {}", c.id, created),
        }
        for line in c.content.lines() {
            println!("    {line}");
        }
    }
}
