//! Training Route

use axum::{extract::State, Json};
use income_pipeline::TrainingReport;
use std::sync::Arc;
use tracing::info;

use crate::{ApiError, SharedState};

/// Run the training pipeline on a blocking thread
pub async fn train(State(state): State<SharedState>) -> Result<Json<TrainingReport>, ApiError> {
    let pipeline = Arc::clone(&state.read().await.pipeline);

    let result = tokio::task::spawn_blocking(move || pipeline.run()).await?;
    match result {
        Ok(report) => {
            metrics::counter!("training_runs_total").increment(1);
            info!("Model trained: run {}", report.run_id);
            state.write().await.last_training = Some(report.clone());
            Ok(Json(report))
        }
        Err(e) => {
            metrics::counter!("training_failures_total").increment(1);
            Err(e.into())
        }
    }
}
