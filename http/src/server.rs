//! HTTP server for the task-list backend
//!
//! Serves the four task endpoints, a health probe and the static browser
//! client from one axum router.

use axum::{
    body::Bytes,
    extract::{rejection::{BytesRejection, QueryRejection}, Query, State},
    http::{Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use std::{future::Future, net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::{
    cors::{Dispatch, Endpoint},
    error::ApiError,
    handler::TaskHandler,
    request_logger::request_logging_middleware,
};
use task_core::{TaskError, TaskKeyParams, TaskRepository};

/// File served at `/`
pub const LANDING_PAGE: &str = "to_do.html";

/// Body returned by a successful delete
pub const DELETE_SUCCESS_MESSAGE: &str = "Task deleted successfully";

pub type ServeError = Box<dyn std::error::Error + Send + Sync>;

/// Shared server state for handlers
pub struct ServerState<R: ?Sized> {
    pub handler: TaskHandler<R>,
}

/// Task server
pub struct TaskServer<R: ?Sized> {
    handler: TaskHandler<R>,
    static_dir: PathBuf,
}

impl<R: TaskRepository + ?Sized + 'static> TaskServer<R> {
    /// Create a server over `repository`, serving static files from `static_dir`
    pub fn new(repository: Arc<R>, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            handler: TaskHandler::new(repository),
            static_dir: static_dir.into(),
        }
    }

    /// Bind `addr` and serve until the process ends
    pub async fn serve(self, addr: &str) -> Result<(), ServeError> {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| format!("Invalid address '{addr}': {e}"))?;

        let listener = TcpListener::bind(socket_addr).await?;
        self.serve_with_shutdown(listener, std::future::pending()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting task server on {}", listener.local_addr()?);

        let app = self.create_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Task server stopped");
        Ok(())
    }

    /// Create the router with all endpoints
    pub fn create_router(self) -> Router {
        let landing_page = ServeFile::new(self.static_dir.join(LANDING_PAGE));
        let static_files = ServeDir::new(&self.static_dir);
        let state = Arc::new(ServerState {
            handler: self.handler,
        });

        Router::new()
            .route("/add", any(add_handler::<R>))
            .route("/fetch", any(fetch_handler::<R>))
            .route("/update", any(update_handler::<R>))
            .route("/delete", any(delete_handler::<R>))
            .route("/health", get(health_handler::<R>))
            .route_service("/", landing_page)
            .nest_service("/static", static_files)
            .layer(middleware::from_fn(request_logging_middleware))
            .with_state(state)
    }
}

type SharedState<R> = State<Arc<ServerState<R>>>;

fn reject(method: &Method) -> Response {
    ApiError::from(TaskError::method_not_allowed(method.as_str())).into_response()
}

fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

fn key_params(query: Result<Query<TaskKeyParams>, QueryRejection>) -> Result<TaskKeyParams, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|_| ApiError::from(TaskError::missing_key()))
}

fn body_bytes(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    body.map_err(|rejection| match rejection.status() {
        StatusCode::BAD_REQUEST => ApiError::from(TaskError::invalid_body(rejection.body_text())),
        status => ApiError::Rejected(status, rejection.body_text()),
    })
}

fn respond<T: IntoResponse>(result: Result<T, ApiError>) -> Response {
    match result {
        Ok(value) => value.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn add_handler<R: TaskRepository + ?Sized + 'static>(
    State(state): SharedState<R>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let endpoint = Endpoint::Add;
    let response = match endpoint.dispatch(&method) {
        Dispatch::Preflight => preflight(),
        Dispatch::Reject => reject(&method),
        Dispatch::Execute => {
            let result = match body_bytes(body) {
                Ok(bytes) => state.handler.add_task(&bytes).await.map_err(ApiError::from),
                Err(err) => Err(err),
            };
            respond(result.map(Json))
        }
    };
    endpoint.with_cors(response)
}

async fn fetch_handler<R: TaskRepository + ?Sized + 'static>(
    State(state): SharedState<R>,
    method: Method,
    query: Result<Query<TaskKeyParams>, QueryRejection>,
) -> Response {
    let endpoint = Endpoint::Fetch;
    let response = match endpoint.dispatch(&method) {
        Dispatch::Preflight => preflight(),
        Dispatch::Reject => reject(&method),
        Dispatch::Execute => {
            let result = match key_params(query) {
                Ok(params) => state.handler.fetch_tasks(params).await.map_err(ApiError::from),
                Err(err) => Err(err),
            };
            respond(result.map(Json))
        }
    };
    endpoint.with_cors(response)
}

async fn update_handler<R: TaskRepository + ?Sized + 'static>(
    State(state): SharedState<R>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let endpoint = Endpoint::Update;
    let response = match endpoint.dispatch(&method) {
        Dispatch::Preflight => preflight(),
        Dispatch::Reject => reject(&method),
        Dispatch::Execute => {
            let result = match body_bytes(body) {
                Ok(bytes) => state.handler.update_task(&bytes).await.map_err(ApiError::from),
                Err(err) => Err(err),
            };
            respond(result.map(Json))
        }
    };
    endpoint.with_cors(response)
}

async fn delete_handler<R: TaskRepository + ?Sized + 'static>(
    State(state): SharedState<R>,
    method: Method,
    query: Result<Query<TaskKeyParams>, QueryRejection>,
) -> Response {
    let endpoint = Endpoint::Delete;
    let response = match endpoint.dispatch(&method) {
        Dispatch::Preflight => preflight(),
        Dispatch::Reject => reject(&method),
        Dispatch::Execute => {
            let result = match key_params(query) {
                Ok(params) => state.handler.delete_task(params).await.map_err(ApiError::from),
                Err(err) => Err(err),
            };
            respond(result.map(|_| DELETE_SUCCESS_MESSAGE))
        }
    };
    endpoint.with_cors(response)
}

/// Health check handler
async fn health_handler<R: TaskRepository + ?Sized + 'static>(
    State(state): SharedState<R>,
) -> Response {
    match state.handler.health().await {
        Ok(()) => "OK".into_response(),
        Err(err) => ApiError::Unavailable(err.to_string()).into_response(),
    }
}
