//! Health Route

use axum::{extract::State, Json};
use income_pipeline::TrainingReport;
use serde::Serialize;

use crate::SharedState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub trained: bool,
    pub last_training: Option<TrainingReport>,
}

/// Health check handler
pub async fn get_health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let state = state.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        trained: state.pipeline.is_trained(),
        last_training: state.last_training.clone(),
    })
}
