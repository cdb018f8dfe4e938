//! HTTP client for the Taskboard REST API.
//!
//! Every response body is decoded into the wire types and translated with
//! [`from_wire`], so callers only ever see [`Task`]. Request bodies are
//! built from typed values through the schema's `From` impls.

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use taskboard_proto::schema::{NewTask, TaskChanges, TaskDraft, TaskPatch};
use taskboard_proto::task::{Task, TaskId};
use taskboard_proto::wire::{
    DeleteResponse, ErrorBody, HealthResponse, SeedResponse, WireTask, from_wire,
};
use url::Url;

/// Errors returned by [`ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL is not a valid URL.
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server rejected the request body (HTTP 400).
    #[error("{0}")]
    Validation(String),

    /// The task does not exist (HTTP 404).
    #[error("{0}")]
    NotFound(String),

    /// The server failed (any other non-success status).
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the status reason.
        message: String,
    },

    /// The request never produced a response (connect, timeout, I/O).
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded into a task.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Typed client over the REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url`
    /// (e.g. `http://localhost:3001`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] for an unparseable URL, or
    /// [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)?;
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    /// The normalized base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    fn task_endpoint(&self, id: &TaskId) -> Result<Url, ApiError> {
        self.endpoint(&format!("api/tasks/{id}"))
    }

    /// `GET /api/health`.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] other than `InvalidUrl`.
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        let resp = self.http.get(self.endpoint("api/health")?).send().await?;
        decode(resp).await
    }

    /// `GET /api/tasks`, newest first.
    ///
    /// # Errors
    ///
    /// [`ApiError::Transport`], [`ApiError::Server`], or [`ApiError::Decode`].
    pub async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let resp = self.http.get(self.endpoint("api/tasks")?).send().await?;
        let wire: Vec<WireTask> = decode(resp).await?;
        wire.into_iter().map(task_from_wire).collect()
    }

    /// `GET /api/tasks/{id}`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the task does not exist.
    pub async fn fetch_task(&self, id: &TaskId) -> Result<Task, ApiError> {
        let resp = self.http.get(self.task_endpoint(id)?).send().await?;
        task_from_wire(decode(resp).await?)
    }

    /// `POST /api/tasks`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] when the server rejects the body.
    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        let body = TaskDraft::from(task);
        let resp = self
            .http
            .post(self.endpoint("api/tasks")?)
            .json(&body)
            .send()
            .await?;
        task_from_wire(decode(resp).await?)
    }

    /// `PUT /api/tasks/{id}` with only the fields present in `changes`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] or [`ApiError::Validation`].
    pub async fn update_task(&self, id: &TaskId, changes: &TaskChanges) -> Result<Task, ApiError> {
        let body = TaskPatch::from(changes);
        let resp = self
            .http
            .put(self.task_endpoint(id)?)
            .json(&body)
            .send()
            .await?;
        task_from_wire(decode(resp).await?)
    }

    /// `DELETE /api/tasks/{id}`, returning the deleted task.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the task does not exist.
    pub async fn delete_task(&self, id: &TaskId) -> Result<Task, ApiError> {
        let resp = self.http.delete(self.task_endpoint(id)?).send().await?;
        let body: DeleteResponse = decode(resp).await?;
        task_from_wire(body.task)
    }

    /// `POST /api/tasks/seed`.
    ///
    /// Never fails: errors are logged and reported as "nothing seeded".
    pub async fn seed_tasks(&self) -> Vec<Task> {
        match self.try_seed().await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!(error = %e, "seeding sample tasks failed");
                Vec::new()
            }
        }
    }

    async fn try_seed(&self) -> Result<Vec<Task>, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("api/tasks/seed")?)
            .send()
            .await?;
        let body: SeedResponse = decode(resp).await?;
        tracing::debug!(message = %body.message, count = body.tasks.len(), "seed response");
        body.tasks.into_iter().map(task_from_wire).collect()
    }
}

fn task_from_wire(wire: WireTask) -> Result<Task, ApiError> {
    from_wire(wire).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decodes a success body, or classifies an error response.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return resp
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()));
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(match status {
        StatusCode::BAD_REQUEST => ApiError::Validation(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Server {
            status: status.as_u16(),
            message,
        },
    })
}
