//! Bridge between the synchronous TUI loop and the async API client.
//!
//! ```text
//! TUI (main loop)  ── ApiRequest ──>  tokio task per request
//!                  <── ApiEvent ────
//! ```
//!
//! Each request runs independently and reports its outcome on an unbounded
//! channel that the main loop drains every tick. Requests are never
//! cancelled; the receiving side decides whether a late outcome still applies.

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::ApiClient;
use crate::comment::{Comment, CommentDraft};
use crate::error::ApiError;
use crate::task::{Task, TaskDraft};

/// A user action that needs the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    LoadTasks,
    /// Re-read one task, used to confirm it still exists.
    LoadTask(u64),
    CreateTask(TaskDraft),
    UpdateTask { id: u64, draft: TaskDraft },
    DeleteTask(u64),
    LoadComments(u64),
    CreateComment { task_id: u64, draft: CommentDraft },
    UpdateComment { id: u64, draft: CommentDraft },
    DeleteComment { id: u64, task_id: u64 },
}

/// Outcome of an [`ApiRequest`], tagged with the ids the UI needs to route it.
#[derive(Debug)]
pub enum ApiEvent {
    TasksLoaded(Result<Vec<Task>, ApiError>),
    TaskLoaded { id: u64, result: Result<Task, ApiError> },
    TaskCreated(Result<Task, ApiError>),
    TaskUpdated { id: u64, result: Result<Task, ApiError> },
    TaskDeleted { id: u64, result: Result<(), ApiError> },
    CommentsLoaded { task_id: u64, result: Result<Vec<Comment>, ApiError> },
    CommentCreated { task_id: u64, result: Result<Comment, ApiError> },
    CommentUpdated { id: u64, result: Result<Comment, ApiError> },
    CommentDeleted { id: u64, task_id: u64, result: Result<(), ApiError> },
}

/// Perform one request against the backend.
pub async fn execute(client: &ApiClient, request: ApiRequest) -> ApiEvent {
    match request {
        ApiRequest::LoadTasks => ApiEvent::TasksLoaded(client.list_tasks().await),
        ApiRequest::LoadTask(id) => ApiEvent::TaskLoaded {
            id,
            result: client.get_task(id).await,
        },
        ApiRequest::CreateTask(draft) => ApiEvent::TaskCreated(client.create_task(&draft).await),
        ApiRequest::UpdateTask { id, draft } => ApiEvent::TaskUpdated {
            id,
            result: client.update_task(id, &draft).await,
        },
        ApiRequest::DeleteTask(id) => ApiEvent::TaskDeleted {
            id,
            result: client.delete_task(id).await,
        },
        ApiRequest::LoadComments(task_id) => ApiEvent::CommentsLoaded {
            task_id,
            result: client.list_comments(task_id).await,
        },
        ApiRequest::CreateComment { task_id, draft } => ApiEvent::CommentCreated {
            task_id,
            result: client.create_comment(task_id, &draft).await,
        },
        ApiRequest::UpdateComment { id, draft } => ApiEvent::CommentUpdated {
            id,
            result: client.update_comment(id, &draft).await,
        },
        ApiRequest::DeleteComment { id, task_id } => ApiEvent::CommentDeleted {
            id,
            task_id,
            result: client.delete_comment(id).await,
        },
    }
}

/// Run `request` on a background task and send its outcome to `events`.
pub fn dispatch(client: &ApiClient, request: ApiRequest, events: &mpsc::UnboundedSender<ApiEvent>) {
    debug!(?request, "dispatching request");
    let client = client.clone();
    let events = events.clone();
    tokio::spawn(async move {
        let event = execute(&client, request).await;
        if events.send(event).is_err() {
            debug!("event receiver dropped; discarding response");
        }
    });
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;
    use crate::test_support::{spawn_backend, task_json};

    #[tokio::test]
    async fn test_dispatch_delivers_event() {
        let router = Router::new()
            .route("/api/tasks", get(|| async { Json(json!({"tasks": [task_json(1, "A")]})) }))
            .route("/api/tasks/{id}/comments", get(|| async { Json(json!({"comments": []})) }));
        let client = ApiClient::new(&spawn_backend(router).await, None).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        dispatch(&client, ApiRequest::LoadComments(1), &tx);
        match rx.recv().await.unwrap() {
            ApiEvent::CommentsLoaded { task_id, result } => {
                assert_eq!(task_id, 1);
                assert!(result.unwrap().is_empty());
            }
            other => panic!("unexpected event {other:?}"),
        }

        dispatch(&client, ApiRequest::LoadTasks, &tx);
        match rx.recv().await.unwrap() {
            ApiEvent::TasksLoaded(Ok(tasks)) => assert_eq!(tasks[0].title, "A"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_tags_failures_with_ids() {
        let router = Router::new();
        let client = ApiClient::new(&spawn_backend(router).await, None).unwrap();

        match execute(&client, ApiRequest::DeleteTask(42)).await {
            ApiEvent::TaskDeleted { id, result } => {
                assert_eq!(id, 42);
                assert!(result.unwrap_err().is_not_found());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
