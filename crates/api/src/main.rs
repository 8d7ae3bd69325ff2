//! Census Income Pipeline - Main Entry Point

use api::{init_logging, run_server, ServerConfig};
use income_pipeline::{load_settings, PipelineConfig, DEFAULT_CONFIG_PATH};
use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings(Path::new(DEFAULT_CONFIG_PATH))?;
    let server = ServerConfig::from_settings(&settings)?;
    init_logging(&server.log_level, server.log_json)?;

    info!("=== Census Income Pipeline v{} ===", env!("CARGO_PKG_VERSION"));
    let config = PipelineConfig::from_settings(settings)?;
    info!(
        "Source {}, artifacts in {}",
        config.ingestion.source_path.display(),
        config.ingestion.artifacts_dir.display()
    );

    run_server(server, config).await
}
