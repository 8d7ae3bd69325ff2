//! Source Data Route

use axum::{
    extract::{Query, State},
    Json,
};
use data_ingestion::DataIngestion;
use income_pipeline::PipelineError;
use serde::{Deserialize, Serialize};

use crate::{ApiError, SharedState};

const MAX_LIMIT: usize = 1000;

/// Query parameters for the data endpoint
#[derive(Debug, Deserialize)]
pub struct DataQuery {
    /// Maximum number of rows
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

/// Response for the data endpoint
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub count: usize,
}

/// First rows of the source dataset
pub async fn get_data(
    State(state): State<SharedState>,
    Query(params): Query<DataQuery>,
) -> Result<Json<DataResponse>, ApiError> {
    let ingestion = {
        let state = state.read().await;
        DataIngestion::new(state.pipeline.config().ingestion.clone())
    };
    let limit = params.limit.min(MAX_LIMIT);

    let preview = tokio::task::spawn_blocking(move || ingestion.preview(limit))
        .await?
        .map_err(PipelineError::from)?;

    Ok(Json(DataResponse {
        count: preview.rows.len(),
        headers: preview.headers,
        rows: preview.rows,
    }))
}
