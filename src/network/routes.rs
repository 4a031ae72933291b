use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::Settings;
use crate::error::AppError;
use crate::network::cors::{CorsLayer, CorsPolicy};
use crate::pipeline::{FeaturePipeline, FeatureResponse, ImageUpload};

pub const BANNER: &str = "Fashion Recognition Service is running";
const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    pipeline: FeaturePipeline,
}

impl AppState {
    pub fn new(pipeline: FeaturePipeline) -> Self {
        Self { pipeline }
    }
}

/// Builds the router once at startup; CORS and body limits are fixed from `settings`.
/// Extraction limits (timeout, concurrency cap) belong to `pipeline`.
pub fn router(settings: &Settings, pipeline: FeaturePipeline) -> Router {
    let state = AppState::new(pipeline);
    Router::new()
        .route("/", get(root))
        .route("/extract-features", post(extract_features))
        .layer(DefaultBodyLimit::max(settings.limits.max_upload_bytes))
        .layer(CorsLayer::new(CorsPolicy::from(&settings.cors)))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": BANNER }))
}

async fn extract_features(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<FeatureResponse>, AppError> {
    let mut multipart =
        multipart.map_err(|rejection| AppError::MalformedUpload(rejection.body_text()))?;
    let upload = read_upload(&mut multipart).await?;

    let response = state.pipeline.clone().oneshot(upload).await?;
    Ok(Json(response))
}

async fn read_upload(multipart: &mut Multipart) -> Result<ImageUpload, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_owned);
        let file_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await?;
        return Ok(ImageUpload::new(bytes, content_type).with_file_name(file_name));
    }
    Err(AppError::MissingFile)
}
