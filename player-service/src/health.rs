//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{
    repository::{PlayerRepository, Specification},
    state::AppState,
};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `/health` and `/ready`
pub fn routes<R: PlayerRepository>() -> Router<AppState<R>> {
    Router::new()
        .route("/health", get(health::<R>))
        .route("/ready", get(readiness::<R>))
}

/// Liveness probe; always 200 while the process serves requests
pub async fn health<R: PlayerRepository>(State(state): State<AppState<R>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness probe
///
/// Runs an unfiltered count against storage. 503 when storage fails.
pub async fn readiness<R: PlayerRepository>(State(state): State<AppState<R>>) -> impl IntoResponse {
    let mut dependencies = HashMap::new();

    let storage = match state.players().repository().count(&Specification::all()).await {
        Ok(count) => DependencyStatus {
            healthy: true,
            message: Some(format!("{} reachable, {} players", R::BACKEND, count)),
        },
        Err(e) => {
            tracing::error!(backend = R::BACKEND, "Storage readiness check failed: {}", e);
            DependencyStatus {
                healthy: false,
                message: Some(format!("{} unavailable", R::BACKEND)),
            }
        }
    };
    let ready = storage.healthy;
    dependencies.insert("storage".to_string(), storage);

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    (status, Json(response))
}
