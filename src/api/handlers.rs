//! API request handlers

use super::models::{HealthResponse, PredictResponse};
use super::routes::AppState;
use crate::error::PredictError;
use crate::prediction::Prediction;
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::Html,
};
use std::time::Instant;

/// GET /health - Service health check
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now(),
        }),
    )
}

/// GET /metrics - Prometheus metrics
pub async fn metrics(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}

/// GET / - Upload page
pub async fn index(State(state): State<AppState>) -> Html<Bytes> {
    Html(state.index_html)
}

/// POST /predict - Classify the image in the `file` form field
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, PredictError> {
    // A body that isn't multipart carries no file part either
    let mut multipart = multipart.map_err(|_| PredictError::MissingFilePart)?;

    let (filename, bytes) = read_file_field(&mut multipart).await?;

    let stored = state
        .uploads
        .save(&filename, &bytes)
        .await
        .map_err(PredictError::Storage)?;

    let saved = tokio::fs::read(&stored.path)
        .await
        .map_err(PredictError::Storage)?;

    let input = crate::preprocess::image_to_tensor(&saved, state.input_size)
        .map_err(|e| PredictError::Preprocess(e.to_string()))?;

    let classifier = state.classifier.clone();
    let started = Instant::now();
    let scores = tokio::task::spawn_blocking(move || classifier.classify(input))
        .await
        .map_err(|e| PredictError::Inference(e.to_string()))?
        .map_err(|e| PredictError::Inference(format!("{:#}", e)))?;
    crate::metrics::record_inference_duration(started.elapsed());

    let prediction = Prediction::from_scores(&scores, &state.labels).ok_or_else(|| {
        PredictError::Inference(format!(
            "model returned {} scores for {} classes",
            scores.len(),
            state.labels.len()
        ))
    })?;

    tracing::info!(
        upload = %stored.original_filename,
        top_class = %prediction.top_class,
        confidence = prediction.confidence,
        "Prediction complete"
    );
    crate::metrics::record_prediction(prediction.top_class.key());

    Ok(Json(prediction.into()))
}

/// Pull the filename and bytes of the `file` part out of the form
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), PredictError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        // Parts without a filename are plain form values, not uploads
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(PredictError::EmptyFilename);
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok((filename, bytes));
    }

    Err(PredictError::MissingFilePart)
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> PredictError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        PredictError::PayloadTooLarge
    } else {
        PredictError::Multipart(err.body_text())
    }
}
