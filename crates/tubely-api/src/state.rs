//! Application state shared by every handler.

use std::sync::Arc;

use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{MediaProbe, StreamOptimizer};
use tubely_storage::Storage;

use crate::services::upload::VideoUploadService;

/// Read-only after startup; handlers receive it as `State<Arc<AppState>>`.
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub upload: VideoUploadService,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoRepository>,
        storage: Arc<dyn Storage>,
        probe: Arc<dyn MediaProbe>,
        optimizer: Arc<dyn StreamOptimizer>,
    ) -> Self {
        let upload = VideoUploadService::new(
            storage.clone(),
            probe,
            optimizer,
            config.upload_temp_dir.clone(),
        );

        Self {
            config,
            videos,
            storage,
            upload,
        }
    }
}
