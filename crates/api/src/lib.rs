//! Census Income API Server
//!
//! REST wrapper over the training and prediction pipeline.

use anyhow::Context;
use artifact_store::FileArtifactStore;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use income_pipeline::{PipelineConfig, PipelineError, TrainingPipeline, TrainingReport};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod routes;

/// Server settings, read from the same sources as the pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub log_level: String,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    pub fn from_settings(settings: &config::Config) -> Result<Self, PipelineError> {
        Ok(settings.clone().try_deserialize()?)
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Training and prediction entry points
    pub pipeline: Arc<TrainingPipeline<FileArtifactStore>>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Report of the last successful run in this process
    pub last_training: Option<TrainingReport>,
    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: PipelineConfig) -> Self {
        let store = FileArtifactStore::new(config.ingestion.artifacts_dir.clone());
        Self {
            pipeline: Arc::new(TrainingPipeline::new(config, store)),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            last_training: None,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Shared handle passed to every handler
pub type SharedState = Arc<RwLock<AppState>>;

/// Error body: `{ "error": ..., "kind": ... }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

/// Handler failure
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(e) => match e {
                PipelineError::ArtifactMissing { .. } => StatusCode::CONFLICT,
                PipelineError::UnknownCategory { .. } | PipelineError::Schema { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Pipeline(e) => e.kind(),
            ApiError::Task(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Request failed with {} ({}): {}", status, self.kind(), self);
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::health::get_health))
        .route("/api/v1/train", post(routes::training::train))
        .route("/api/v1/predict", post(routes::prediction::predict))
        .route("/api/v1/data", get(routes::data::get_data))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

/// Initialize logging; an unrecognized level is an error
pub fn init_logging(level: &str, json: bool) -> anyhow::Result<()> {
    let level = level
        .parse::<Level>()
        .with_context(|| format!("Invalid log_level {:?}", level))?;
    if json {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

/// Install the global Prometheus recorder and describe the counters
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!("training_runs_total", "Successful training runs");
    metrics::describe_counter!("training_failures_total", "Failed training runs");
    metrics::describe_counter!("predictions_total", "Successful predictions");
    metrics::describe_counter!("prediction_failures_total", "Failed predictions");
    Ok(handle)
}

/// Run the server
pub async fn run_server(server: ServerConfig, config: PipelineConfig) -> anyhow::Result<()> {
    let mut state = AppState::new(config);
    match init_metrics() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Metrics disabled: {}", e),
    }
    let app = create_router(Arc::new(RwLock::new(state)));

    info!("Starting API server on {}", server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&server.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
