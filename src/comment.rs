//! Comment record and its request payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DraftError;
use crate::timestamp;

/// A note attached to exactly one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub content: String,
    pub task_id: u64,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// True when the comment carries an update time distinct from its creation time.
    pub fn was_edited(&self) -> bool {
        match (self.created_at, self.updated_at) {
            (Some(created), Some(updated)) => created != updated,
            (None, Some(_)) => true,
            _ => false,
        }
    }
}

/// Body for `POST /api/tasks/{id}/comments` and `PUT /api/comments/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentDraft {
    pub content: String,
}

impl CommentDraft {
    pub fn new(content: &str) -> Result<Self, DraftError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DraftError::BlankContent);
        }
        Ok(Self { content: content.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(created: &str, updated: Option<&str>) -> Comment {
        let json = serde_json::json!({
            "id": 3, "content": "hello", "task_id": 1,
            "created_at": created, "updated_at": updated,
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_was_edited() {
        assert!(!comment("2024-01-01T00:00:00", Some("2024-01-01T00:00:00")).was_edited());
        assert!(!comment("2024-01-01T00:00:00", None).was_edited());
        assert!(comment("2024-01-01T00:00:00", Some("2024-01-02T09:30:00")).was_edited());
    }

    #[test]
    fn test_draft_validation() {
        assert_eq!(CommentDraft::new("  \n "), Err(DraftError::BlankContent));
        assert_eq!(CommentDraft::new(" looks good ").unwrap().content, "looks good");
    }
}
