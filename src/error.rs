//! Error types for model loading and the prediction path

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while loading the model or its class labels
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model file not found: {0}")]
    ModelNotFound(String),

    #[error("failed to load model: {0}")]
    ModelLoad(String),

    #[error("invalid class labels: {0}")]
    InvalidLabels(String),

    #[error("model produces {outputs} outputs but {labels} class labels are configured")]
    LabelMismatch { outputs: usize, labels: usize },
}

/// Errors on the upload -> preprocess -> inference path
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("No file part in the request.")]
    MissingFilePart,

    #[error("No file selected.")]
    EmptyFilename,

    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    #[error("Uploaded file exceeds the size limit.")]
    PayloadTooLarge,

    #[error("Could not decode uploaded image: {0}")]
    Preprocess(String),

    #[error("Internal error during prediction: could not store upload")]
    Storage(#[source] std::io::Error),

    #[error("Internal error during prediction: {0}")]
    Inference(String),
}

impl PredictError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictError::MissingFilePart
            | PredictError::EmptyFilename
            | PredictError::Multipart(_) => StatusCode::BAD_REQUEST,
            PredictError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            PredictError::Preprocess(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PredictError::Storage(_) | PredictError::Inference(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Label used for the error counter
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::MissingFilePart => "missing_file",
            PredictError::EmptyFilename => "empty_filename",
            PredictError::Multipart(_) => "multipart",
            PredictError::PayloadTooLarge => "too_large",
            PredictError::Preprocess(_) => "preprocess",
            PredictError::Storage(_) => "storage",
            PredictError::Inference(_) => "inference",
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            PredictError::Storage(err) => {
                tracing::error!(error = %err, "Failed to store upload");
            }
            PredictError::Inference(msg) => {
                tracing::error!(error = %msg, "Inference failed");
            }
            other => {
                tracing::warn!(error = %other, "Rejected prediction request");
            }
        }

        crate::metrics::record_prediction_error(self.kind());

        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}
