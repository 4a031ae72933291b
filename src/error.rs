use std::time::Duration;

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("File provided is not an image")]
    InvalidInput { content_type: Option<String> },
    #[error("Field required: file")]
    MissingFile,
    #[error("Malformed upload: {0}")]
    MalformedUpload(String),
    #[error("Error reading upload: {0}")]
    Upload(#[from] MultipartError),
    #[error("Error processing image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Error processing image: decode timed out after {0:?}")]
    DecodeTimeout(Duration),
    #[error("Error processing image: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("Error processing image: extraction limiter closed")]
    LimiterClosed,
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to bind to {1}: {0}")]
    Bind(std::io::Error, String),
    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } | AppError::MalformedUpload(_) => StatusCode::BAD_REQUEST,
            AppError::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Upload(e) => e.status(),
            AppError::Decode(_)
            | AppError::DecodeTimeout(_)
            | AppError::Worker(_)
            | AppError::LimiterClosed
            | AppError::Config(_)
            | AppError::Bind(..)
            | AppError::Serve(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

// Color analysis fault. Never leaves the analyzer; it is replaced by the fallback color.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisFault {
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("Pixel buffer is not 8-bit RGB after normalization")]
    UnreadablePixels,
    #[error("Average color is not finite: ({r}, {g}, {b})")]
    NonFiniteAverage { r: f64, g: f64, b: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_client_error() {
        let error = AppError::InvalidInput {
            content_type: Some("text/plain".to_string()),
        };
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "File provided is not an image");
    }

    #[test]
    fn test_decode_error_is_server_error_with_prefix() {
        let error = AppError::Decode(image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "truncated",
        )));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().starts_with("Error processing image: "));
    }

    #[test]
    fn test_missing_file_is_unprocessable() {
        assert_eq!(
            AppError::MissingFile.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
