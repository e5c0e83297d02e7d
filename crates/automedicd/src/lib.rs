//! AutoMedic diagnosis service.
//!
//! Serves the diagnosis contract over HTTP:
//!
//! - `POST /api/diagnose`: JSON [`DiagnosisRequest`] in, JSON [`DiagnosisResult`] out
//! - `GET /api/health`: liveness check
//!
//! Requests are answered by whichever [`DiagnosisResolver`] the service was
//! started with.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use automedic_core::{
    DiagnosisRequest, DiagnosisResolver, DiagnosisResult, DIAGNOSE_PATH, HEALTH_PATH,
};

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "AutoMedic AI";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    resolver: Arc<dyn DiagnosisResolver>,
}

impl AppState {
    pub fn new(resolver: Arc<dyn DiagnosisResolver>) -> Self {
        Self { resolver }
    }
}

/// Errors returned to HTTP clients as `{"detail": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(DIAGNOSE_PATH, post(diagnose))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

/// Serve on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, strategy = state.resolver.name(), "automedicd listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn diagnose(
    State(state): State<AppState>,
    payload: Result<Json<DiagnosisRequest>, JsonRejection>,
) -> Result<Json<DiagnosisResult>, ApiError> {
    // Malformed bodies get the same 422 `{"detail"}` shape as a null year.
    let Json(request) =
        payload.map_err(|rejection| ApiError::Unprocessable(rejection.body_text()))?;
    if request.car_year.is_none() {
        return Err(ApiError::Unprocessable(
            "car_year: input should be a valid integer".to_string(),
        ));
    }

    info!(prompt = %request.prompt(), "diagnosis requested");

    match state.resolver.resolve(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            error!(error = %err, "diagnosis failed");
            Err(ApiError::Internal(err.to_string()))
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": SERVICE_NAME }))
}
