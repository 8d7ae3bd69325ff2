//! Prediction Route

use axum::{extract::State, Json};
use income_pipeline::{IncomeClass, PredictionRequest};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::{ApiError, SharedState};

/// Response for the prediction endpoint
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub class: IncomeClass,
    pub label: &'static str,
    pub message: &'static str,
}

/// Classify a single record
pub async fn predict(
    State(state): State<SharedState>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let pipeline = Arc::clone(&state.read().await.pipeline);

    let result = tokio::task::spawn_blocking(move || pipeline.predict(&request)).await?;
    match result {
        Ok(class) => {
            metrics::counter!("predictions_total", "class" => class.label()).increment(1);
            debug!("Predicted {}", class.label());
            Ok(Json(PredictionResponse {
                class,
                label: class.label(),
                message: class.message(),
            }))
        }
        Err(e) => {
            metrics::counter!("prediction_failures_total").increment(1);
            Err(e.into())
        }
    }
}
