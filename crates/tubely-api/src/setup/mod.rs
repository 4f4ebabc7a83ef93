//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::PgVideoRepository;
use tubely_processing::{FfmpegOptimizer, FfprobeProbe};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config)?;

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    tokio::fs::create_dir_all(&config.upload_temp_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload temp dir {}",
                config.upload_temp_dir.display()
            )
        })?;

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(PgVideoRepository::new(pool)),
        storage,
        Arc::new(FfprobeProbe::new(config.ffprobe_path.clone())),
        Arc::new(FfmpegOptimizer::new(config.ffmpeg_path.clone())),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
