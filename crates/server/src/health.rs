use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use netbot_core::EntityDirectory;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    directory: Arc<EntityDirectory>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DirectoryCheck {
    pub status: &'static str,
    pub organizations: usize,
    pub networks: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub directory: DirectoryCheck,
    pub checked_at: String,
}

pub fn router(directory: Arc<EntityDirectory>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { directory })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let ready = state.directory.is_warm();
    let stats = state.directory.stats();

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "netbot-server webhook listener initialized".to_string(),
        },
        directory: DirectoryCheck {
            status: if ready { "ready" } else { "warming" },
            organizations: stats.organizations,
            networks: stats.networks,
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
