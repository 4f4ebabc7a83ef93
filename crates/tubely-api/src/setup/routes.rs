//! Router assembly

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tubely_core::{Config, StorageBackend};
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::constants::{API_PREFIX, ASSETS_PREFIX, VIDEO_UPLOAD_LIMIT};
use crate::handlers::{health, video_create, video_get, video_upload};
use crate::state::AppState;

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    // axum's own 2 MB multipart default is replaced by the 1 GiB transport limit.
    let upload_routes = Router::new()
        .route(
            "/videos/{video_id}/upload",
            post(video_upload::upload_video),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(VIDEO_UPLOAD_LIMIT));

    let api_routes = Router::new()
        .route(
            "/videos",
            post(video_create::create_video).get(video_get::list_videos),
        )
        .route("/videos/{video_id}", get(video_get::get_video))
        .route("/openapi.json", get(openapi_spec))
        .merge(upload_routes);

    let mut app = Router::new()
        .route("/health", get(health::health))
        .nest(API_PREFIX, api_routes);

    if config.storage_backend() == StorageBackend::Local {
        tracing::info!(root = %config.assets_root.display(), "Serving local assets");
        app = app.nest_service(ASSETS_PREFIX, ServeDir::new(&config.assets_root));
    }

    Ok(app
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", o, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any))
}
