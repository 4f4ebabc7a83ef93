//! Shared harness for API integration tests.
//!
//! The real router runs against in-memory fakes: a `HashMap` repository, a storage
//! backend that records uploads, and probe/optimizer stand-ins that never spawn a
//! process.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

use tubely_api::auth::make_jwt;
use tubely_api::setup::routes::setup_routes;
use tubely_api::AppState;
use tubely_core::{
    AppError, AspectRatio, Config, CreateVideoParams, StorageBackend, StorageReference, Video,
};
use tubely_db::VideoRepository;
use tubely_processing::video::processing_path;
use tubely_processing::{MediaProbe, ProcessingError, StreamOptimizer};
use tubely_storage::{Storage, StorageError, StorageResult};

pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";
pub const TEST_BUCKET: &str = "tubely-videos";

// ----- Repository -----

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
    fail_reads: AtomicBool,
    fail_updates: AtomicBool,
}

impl InMemoryVideoRepository {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create_video(&self, params: CreateVideoParams) -> Result<Video, AppError> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: params.title,
            description: params.description,
            thumbnail_url: None,
            video_url: None,
            user_id: params.user_id,
        };
        self.insert(video.clone());
        Ok(video)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::from(sqlx::Error::PoolTimedOut));
        }
        Ok(self.get(id))
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .videos
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::from(sqlx::Error::PoolTimedOut));
        }
        let mut videos = self.videos.lock().unwrap();
        match videos.get_mut(&video.id) {
            Some(stored) => {
                *stored = video.clone();
                Ok(video.clone())
            }
            None => Err(AppError::NotFound("Video not found".to_string())),
        }
    }
}

// ----- Storage -----

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub key: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct RecordingStorage {
    uploads: Mutex<Vec<RecordedUpload>>,
    fail_uploads: AtomicBool,
    fail_presign: AtomicBool,
}

impl RecordingStorage {
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    pub fn fail_presign(&self) {
        self.fail_presign.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    fn bucket(&self) -> &str {
        TEST_BUCKET
    }

    async fn upload_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<StorageReference> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("connection reset".to_string()));
        }
        let bytes = tokio::fs::read(path).await?;
        self.uploads.lock().unwrap().push(RecordedUpload {
            key: key.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        Ok(StorageReference::new(TEST_BUCKET, key))
    }

    async fn presigned_get_url(
        &self,
        reference: &StorageReference,
        expires_in: Duration,
    ) -> StorageResult<String> {
        if self.fail_presign.load(Ordering::SeqCst) {
            return Err(StorageError::PresignFailed("signer unavailable".to_string()));
        }
        Ok(format!(
            "https://{}.s3.us-east-1.amazonaws.com/{}?X-Amz-Expires={}&X-Amz-Signature=deadbeef",
            reference.bucket,
            reference.key,
            expires_in.as_secs()
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

// ----- Processing -----

/// Answers a fixed classification, or fails as if ffprobe found no streams.
pub struct FakeProbe {
    pub aspect_ratio: AspectRatio,
    pub fail: bool,
}

#[async_trait]
impl MediaProbe for FakeProbe {
    async fn classify_aspect_ratio(&self, _path: &Path) -> Result<AspectRatio, ProcessingError> {
        if self.fail {
            return Err(ProcessingError::NoStreams);
        }
        Ok(self.aspect_ratio)
    }
}

/// Copies the input to `<input>.processing`, or fails without writing anything.
pub struct FakeOptimizer {
    pub fail: bool,
}

#[async_trait]
impl StreamOptimizer for FakeOptimizer {
    async fn optimize_for_streaming(&self, path: &Path) -> Result<PathBuf, ProcessingError> {
        if self.fail {
            return Err(ProcessingError::EmptyOutput(path.display().to_string()));
        }
        let output = processing_path(path);
        tokio::fs::copy(path, &output)
            .await
            .map_err(|source| ProcessingError::OutputMissing {
                path: output.display().to_string(),
                source,
            })?;
        Ok(output)
    }
}

// ----- App -----

pub struct TestOptions {
    pub aspect_ratio: AspectRatio,
    pub probe_fails: bool,
    pub optimizer_fails: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Landscape,
            probe_fails: false,
            optimizer_fails: false,
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryVideoRepository>,
    pub storage: Arc<RecordingStorage>,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn token_for(&self, user_id: Uuid) -> String {
        make_jwt(user_id, TEST_JWT_SECRET, chrono::Duration::hours(1))
            .expect("Failed to sign token")
    }

    /// Insert a video owned by `user_id` with no upload yet.
    pub fn seed_video(&self, user_id: Uuid) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: "Boots demo".to_string(),
            description: "Unboxing".to_string(),
            thumbnail_url: None,
            video_url: None,
            user_id,
        };
        self.repo.insert(video.clone());
        video
    }

    /// Files left behind in the upload temp directory.
    pub fn temp_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.temp_dir.path())
            .expect("Failed to read temp dir")
            .map(|entry| entry.expect("Failed to read entry").path())
            .collect()
    }
}

pub fn test_config(temp_dir: &Path) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DATABASE_URL", "postgres://localhost/tubely_test".to_string()),
        ("JWT_SECRET", TEST_JWT_SECRET.to_string()),
        ("STORAGE_BACKEND", "s3".to_string()),
        ("S3_BUCKET", TEST_BUCKET.to_string()),
        ("S3_REGION", "us-east-1".to_string()),
        ("UPLOAD_TEMP_DIR", temp_dir.display().to_string()),
    ]);
    let config = Config::from_vars(|key| vars.get(key).cloned()).expect("Failed to build config");
    config.validate().expect("Test config should be valid");
    config
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config(temp_dir.path());

    let repo = Arc::new(InMemoryVideoRepository::default());
    let storage = Arc::new(RecordingStorage::default());

    let state = Arc::new(AppState::new(
        config.clone(),
        repo.clone(),
        storage.clone(),
        Arc::new(FakeProbe {
            aspect_ratio: options.aspect_ratio,
            fail: options.probe_fails,
        }),
        Arc::new(FakeOptimizer {
            fail: options.optimizer_fails,
        }),
    ));

    let app = setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        repo,
        storage,
        temp_dir,
    }
}
