//! Shared fixtures for unit tests: record builders and an in-process mock backend.

use axum::Router;
use serde_json::{json, Value};

use crate::comment::Comment;
use crate::task::Task;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// JSON for a pending, low-priority task as the backend would send it.
pub fn task_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "status": "pending",
        "priority": "low",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "comments_count": 0
    })
}

pub fn task(id: u64, title: &str) -> Task {
    serde_json::from_value(task_json(id, title)).unwrap()
}

pub fn comment(id: u64, task_id: u64, content: &str) -> Comment {
    serde_json::from_value(json!({
        "id": id,
        "content": content,
        "task_id": task_id,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    }))
    .unwrap()
}
