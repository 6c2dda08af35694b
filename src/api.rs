//! HTTP client for the task service.
//!
//! One method per endpoint. Every response is mapped into a typed record at
//! this boundary: non-2xx statuses become [`ApiError::Server`] carrying the
//! body's `error` string (or a generic message for the operation), and bodies
//! that don't match the expected shape become [`ApiError::Decode`].

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::comment::{Comment, CommentDraft};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::task::{Task, TaskDraft};

#[derive(Deserialize)]
struct TasksEnvelope {
    tasks: Vec<Task>,
}

#[derive(Deserialize)]
struct TaskEnvelope {
    task: Task,
}

#[derive(Deserialize)]
struct CommentsEnvelope {
    comments: Vec<Comment>,
}

#[derive(Deserialize)]
struct CommentEnvelope {
    comment: Comment,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Response of the service root (`GET /`).
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub status: String,
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

/// Client bound to one service base URL. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url`, optionally bounding every request by `timeout`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /`
    pub async fn service_info(&self) -> Result<ServiceInfo, ApiError> {
        let url = self.url("/");
        debug!(%url, "GET service info");
        let response = self.client.get(url).send().await?;
        decode(response, "Failed to reach service").await
    }

    /// `GET /api/tasks`
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.url("/api/tasks");
        debug!(%url, "GET tasks");
        let response = self.client.get(url).send().await?;
        let body: TasksEnvelope = decode(response, "Failed to load tasks").await?;
        Ok(body.tasks)
    }

    /// `GET /api/tasks/{id}`
    pub async fn get_task(&self, id: u64) -> Result<Task, ApiError> {
        let url = self.url(&format!("/api/tasks/{id}"));
        debug!(%url, "GET task");
        let response = self.client.get(url).send().await?;
        let body: TaskEnvelope = decode(response, "Failed to load task").await?;
        Ok(body.task)
    }

    /// `POST /api/tasks`
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let url = self.url("/api/tasks");
        debug!(%url, title = %draft.title, "POST task");
        let response = self.client.post(url).json(draft).send().await?;
        let body: TaskEnvelope = decode(response, "Failed to create task").await?;
        Ok(body.task)
    }

    /// `PUT /api/tasks/{id}`
    pub async fn update_task(&self, id: u64, draft: &TaskDraft) -> Result<Task, ApiError> {
        let url = self.url(&format!("/api/tasks/{id}"));
        debug!(%url, "PUT task");
        let response = self.client.put(url).json(draft).send().await?;
        let body: TaskEnvelope = decode(response, "Failed to update task").await?;
        Ok(body.task)
    }

    /// `DELETE /api/tasks/{id}`. The response body is ignored.
    pub async fn delete_task(&self, id: u64) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/tasks/{id}"));
        debug!(%url, "DELETE task");
        let response = self.client.delete(url).send().await?;
        read_body(response, "Failed to delete task").await?;
        Ok(())
    }

    /// `GET /api/tasks/{task_id}/comments`
    pub async fn list_comments(&self, task_id: u64) -> Result<Vec<Comment>, ApiError> {
        let url = self.url(&format!("/api/tasks/{task_id}/comments"));
        debug!(%url, "GET comments");
        let response = self.client.get(url).send().await?;
        let body: CommentsEnvelope = decode(response, "Failed to load comments").await?;
        Ok(body.comments)
    }

    /// `GET /api/comments/{id}`
    pub async fn get_comment(&self, id: u64) -> Result<Comment, ApiError> {
        let url = self.url(&format!("/api/comments/{id}"));
        debug!(%url, "GET comment");
        let response = self.client.get(url).send().await?;
        let body: CommentEnvelope = decode(response, "Failed to load comment").await?;
        Ok(body.comment)
    }

    /// `POST /api/tasks/{task_id}/comments`
    pub async fn create_comment(&self, task_id: u64, draft: &CommentDraft) -> Result<Comment, ApiError> {
        let url = self.url(&format!("/api/tasks/{task_id}/comments"));
        debug!(%url, "POST comment");
        let response = self.client.post(url).json(draft).send().await?;
        let body: CommentEnvelope = decode(response, "Failed to create comment").await?;
        Ok(body.comment)
    }

    /// `PUT /api/comments/{id}`
    pub async fn update_comment(&self, id: u64, draft: &CommentDraft) -> Result<Comment, ApiError> {
        let url = self.url(&format!("/api/comments/{id}"));
        debug!(%url, "PUT comment");
        let response = self.client.put(url).json(draft).send().await?;
        let body: CommentEnvelope = decode(response, "Failed to update comment").await?;
        Ok(body.comment)
    }

    /// `DELETE /api/comments/{id}`. The response body is ignored.
    pub async fn delete_comment(&self, id: u64) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/comments/{id}"));
        debug!(%url, "DELETE comment");
        let response = self.client.delete(url).send().await?;
        read_body(response, "Failed to delete comment").await?;
        Ok(())
    }
}

/// Read the body of a response, turning non-2xx statuses into [`ApiError::Server`].
async fn read_body(response: Response, fallback: &str) -> Result<String, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    if status.is_success() {
        return Ok(text);
    }

    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    warn!(status = status.as_u16(), %message, "request failed");
    Err(ApiError::Server { status: status.as_u16(), message })
}

async fn decode<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, ApiError> {
    let text = read_body(response, fallback).await?;
    serde_json::from_str(&text).map_err(|e| {
        warn!(error = %e, "response did not match expected shape");
        ApiError::Decode(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::fields::{Priority, Status};
    use crate::test_support::{spawn_backend, task_json};

    #[tokio::test]
    async fn test_list_tasks() {
        let router = Router::new().route(
            "/api/tasks",
            get(|| async { Json(json!({"tasks": [task_json(1, "A")], "total": 1, "pages": 1})) }),
        );
        let client = ApiClient::new(&spawn_backend(router).await, None).unwrap();

        let tasks = client.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "A");
        assert_eq!(tasks[0].status, Status::Pending);
        assert_eq!(tasks[0].priority, Priority::Low);
    }

    #[tokio::test]
    async fn test_create_task_sends_draft() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::default();
        let sink = seen.clone();
        let router = Router::new().route(
            "/api/tasks",
            axum::routing::post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some(body.clone());
                    let mut task = task_json(9, body["title"].as_str().unwrap_or_default());
                    task["priority"] = body["priority"].clone();
                    (StatusCode::CREATED, Json(json!({"message": "Task created successfully", "task": task})))
                }
            }),
        );
        let client = ApiClient::new(&spawn_backend(router).await, None).unwrap();

        let draft = TaskDraft::new(" New ", " body ", Status::Pending, Priority::High).unwrap();
        let task = client.create_task(&draft).await.unwrap();

        assert_eq!(task.id, 9);
        assert_eq!(task.priority, Priority::High);
        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body, json!({"title": "New", "description": "body", "status": "pending", "priority": "high"}));
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let router = Router::new().route(
            "/api/tasks/{id}",
            put(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "Task title cannot be empty"}))) }),
        );
        let client = ApiClient::new(&spawn_backend(router).await, None).unwrap();
        let draft = TaskDraft::new("x", "", Status::Pending, Priority::Low).unwrap();

        let err = client.update_task(3, &draft).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 400, .. }));
        assert_eq!(err.to_string(), "Task title cannot be empty");
    }

    #[tokio::test]
    async fn test_server_error_without_json_falls_back() {
        let router = Router::new().route(
            "/api/tasks",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>") }),
        );
        let client = ApiClient::new(&spawn_backend(router).await, None).unwrap();

        let err = client.list_tasks().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Failed to load tasks");
    }

    #[tokio::test]
    async fn test_error_body_without_error_field_falls_back() {
        let router = Router::new().route(
            "/api/tasks",
            axum::routing::post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"message": "nope"}))) }),
        );
        let client = ApiClient::new(&spawn_backend(router).await, None).unwrap();
        let draft = TaskDraft::new("x", "", Status::Pending, Priority::Low).unwrap();

        let err = client.create_task(&draft).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to create task");
    }

    #[tokio::test]
    async fn test_mismatched_body_is_decode_error() {
        let router = Router::new().route(
            "/api/tasks",
            get(|| async { Json(json!({"tasks": [{"id": 1, "title": "A", "status": "blocked"}]})) }),
        );
        let client = ApiClient::new(&spawn_backend(router).await, None).unwrap();

        let err = client.list_tasks().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_delete_ignores_body() {
        let router = Router::new()
            .route("/api/tasks/{id}", axum::routing::delete(|| async { "" }))
            .route(
                "/api/comments/{id}",
                axum::routing::delete(|Path(id): Path<u64>| async move {
                    if id == 5 {
                        (StatusCode::OK, Json(json!({"message": "Comment deleted successfully"})))
                    } else {
                        (StatusCode::NOT_FOUND, Json(json!({"error": "Resource not found"})))
                    }
                }),
            );
        let client = ApiClient::new(&spawn_backend(router).await, None).unwrap();

        client.delete_task(1).await.unwrap();
        client.delete_comment(5).await.unwrap();
        let err = client.delete_comment(6).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Resource not found");
    }

    #[tokio::test]
    async fn test_comment_endpoints() {
        let router = Router::new()
            .route(
                "/api/tasks/{id}/comments",
                get(|Path(id): Path<u64>| async move {
                    Json(json!({"comments": [{
                        "id": 1, "content": "first", "task_id": id,
                        "created_at": "2024-01-01T00:00:00", "updated_at": "2024-01-01T00:00:00"
                    }]}))
                })
                .post(|Path(id): Path<u64>, Json(body): Json<Value>| async move {
                    (StatusCode::CREATED, Json(json!({"comment": {
                        "id": 2, "content": body["content"], "task_id": id,
                        "created_at": "2024-01-02T00:00:00", "updated_at": "2024-01-02T00:00:00"
                    }})))
                }),
            )
            .route(
                "/api/comments/{id}",
                put(|Path(id): Path<u64>, Json(body): Json<Value>| async move {
                    Json(json!({"comment": {
                        "id": id, "content": body["content"], "task_id": 4,
                        "created_at": "2024-01-02T00:00:00", "updated_at": "2024-01-03T00:00:00"
                    }}))
                }),
            );
        let client = ApiClient::new(&spawn_backend(router).await, None).unwrap();

        let comments = client.list_comments(4).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].task_id, 4);
        assert!(!comments[0].was_edited());

        let created = client.create_comment(4, &CommentDraft::new(" hi ").unwrap()).await.unwrap();
        assert_eq!(created.content, "hi");

        let updated = client.update_comment(2, &CommentDraft::new("edited").unwrap()).await.unwrap();
        assert_eq!(updated.content, "edited");
        assert!(updated.was_edited());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{addr}"), None).unwrap();
        let err = client.list_tasks().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_base_url_is_normalised() {
        let client = ApiClient::new("http://localhost:5000///", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/api/tasks"), "http://localhost:5000/api/tasks");
    }
}
