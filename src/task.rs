//! Task record and the payload used to create or update one.
//!
//! `Task` mirrors the backend's JSON representation. `TaskDraft` is what the
//! client sends; building one enforces the non-empty title rule and trims
//! the free-text fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DraftError;
use crate::fields::*;
use crate::timestamp;

/// A work item as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments_count: u64,
}

impl Task {
    /// Description text, if it holds anything besides whitespace.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }
}

/// Body for `POST /api/tasks` and `PUT /api/tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
}

impl TaskDraft {
    /// Build a draft from raw user input, trimming title and description.
    pub fn new(title: &str, description: &str, status: Status, priority: Priority) -> Result<Self, DraftError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DraftError::BlankTitle);
        }
        Ok(Self {
            title: title.to_string(),
            description: description.trim().to_string(),
            status,
            priority,
        })
    }

    /// Draft carrying the current values of an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            priority: task.priority,
        }
    }
}
