//! HTTP surface of the service
//!
//! Routing only: every word endpoint maps onto one `WordService` operation,
//! and `ApiError` maps the error taxonomy onto status codes.

pub mod word_routes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::{error, info};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::app_config::ServerConfig;
use crate::database::WordRepository;
use crate::errors::{AppError, WordError};
use crate::info::{HealthStatus, ServiceInfo};
use crate::words::WordService;

pub use word_routes::create_word_router;

// ============================================================================
// Errors
// ============================================================================

/// Body message for storage failures; the detail only goes to the log
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal storage error";

/// Error returned by handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<WordError> for ApiError {
    fn from(err: WordError) -> Self {
        match err {
            WordError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            WordError::Conflict(message) => Self::new(StatusCode::CONFLICT, message),
            WordError::NotFound(message) => Self::new(StatusCode::NOT_FOUND, message),
            WordError::Storage(storage) => {
                error!("Storage failure while handling request: {}", storage);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// ============================================================================
// Info Handlers
// ============================================================================

/// GET /
async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo::current())
}

/// GET /health
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus::healthy())
}

// ============================================================================
// Router and Server
// ============================================================================

/// Create the full application router around an injected service
pub fn create_router<R: WordRepository + 'static>(service: Arc<WordService<R>>) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .merge(create_word_router(service))
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(config: &ServerConfig, router: Router) -> Result<(), AppError> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
