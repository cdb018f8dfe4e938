//! HTTP surface: router, handlers, and server startup.
//!
//! All handlers share one [`TaskService`] through `Arc`. Responses use the
//! wire types from `taskboard_proto::wire`; failures go through
//! [`ServiceError`]'s `IntoResponse` impl.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use taskboard_proto::schema::{TaskDraft, TaskPatch, ValidationError};
use taskboard_proto::wire::{DeleteResponse, HealthResponse, SeedResponse, WireTask, to_wire};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ServiceError;
use crate::service::{SeedOutcome, TaskService};
use crate::store::TaskStore;

/// Shared handler state.
pub type AppState = Arc<TaskService>;

/// Builds the API router over the given service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/seed", post(seed_tasks))
        .route(
            "/api/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the API server on `addr` over an in-memory store.
///
/// Returns the bound address (useful with port 0) and the server task.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn start_server(
    addr: &str,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), Box<dyn std::error::Error + Send + Sync>>
{
    start_server_with_state(addr, Arc::new(TaskService::new(TaskStore::in_memory()))).await
}

/// Starts the API server on `addr` with caller-provided state.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn start_server_with_state(
    addr: &str,
    state: AppState,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), Box<dyn std::error::Error + Send + Sync>>
{
    start_server_with_shutdown(addr, state, std::future::pending()).await
}

/// Like [`start_server_with_state`], but the server stops accepting
/// connections once `shutdown` resolves and finishes in-flight requests.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn start_server_with_shutdown<F>(
    addr: &str,
    state: AppState,
    shutdown: F,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            tracing::error!(error = %e, "api server error");
        }
    });

    Ok((bound_addr, handle))
}

/// Starts the API server in-process for testing.
///
/// Binds to `127.0.0.1:0` (OS-assigned port) over an empty in-memory store.
#[cfg(test)]
pub async fn start_test_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    start_server("127.0.0.1:0")
        .await
        .expect("failed to start test server")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
    })
}

async fn list_tasks(State(service): State<AppState>) -> Json<Vec<WireTask>> {
    let tasks = service.list().await;
    Json(tasks.iter().map(to_wire).collect())
}

async fn get_task(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WireTask>, ServiceError> {
    let task = service.get(&id).await?;
    Ok(Json(to_wire(&task)))
}

async fn create_task(
    State(service): State<AppState>,
    body: Result<Json<TaskDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<WireTask>), ServiceError> {
    let Json(draft) = body.map_err(malformed)?;
    let task = service.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(to_wire(&task))))
}

async fn update_task(
    State(service): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<WireTask>, ServiceError> {
    let Json(patch) = body.map_err(malformed)?;
    let task = service.update(&id, &patch).await?;
    Ok(Json(to_wire(&task)))
}

async fn delete_task(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ServiceError> {
    let task = service.delete(&id).await?;
    Ok(Json(DeleteResponse {
        message: "Task deleted successfully".to_string(),
        task: to_wire(&task),
    }))
}

async fn seed_tasks(
    State(service): State<AppState>,
) -> Result<(StatusCode, Json<SeedResponse>), ServiceError> {
    let response = match service.seed_if_empty().await? {
        SeedOutcome::Seeded(tasks) => (
            StatusCode::CREATED,
            Json(SeedResponse {
                message: "Default tasks seeded successfully".to_string(),
                tasks: tasks.iter().map(to_wire).collect(),
            }),
        ),
        SeedOutcome::AlreadyPopulated => (
            StatusCode::OK,
            Json(SeedResponse {
                message: "Database already has tasks".to_string(),
                tasks: Vec::new(),
            }),
        ),
    };
    Ok(response)
}

fn malformed(rejection: JsonRejection) -> ServiceError {
    ServiceError::Validation(ValidationError::MalformedBody(rejection.body_text()))
}
