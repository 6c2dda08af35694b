//! Enumerations and field types for tasks.
//!
//! This module defines the structured values a task carries: its workflow
//! status and its priority. Both serialise in the backend's snake_case form
//! and double as clap value enums for the CLI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task workflow status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Status {
    /// All statuses in selector order.
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];
}

impl Priority {
    /// All priorities in selector order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
}
