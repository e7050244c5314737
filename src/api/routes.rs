//! API route definitions

use crate::labels::ClassLabels;
use crate::model::Classifier;
use crate::uploads::UploadStore;
use axum::{
    Router,
    body::Bytes,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;

/// Page served at `/` when no template override is configured
pub const DEFAULT_INDEX_HTML: &str = include_str!("../../templates/index.html");

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub labels: Arc<ClassLabels>,
    pub uploads: Arc<UploadStore>,
    /// Rendered upload page, shared without copying per request
    pub index_html: Bytes,
    /// Side length of the square model input
    pub input_size: u32,
    pub max_upload_bytes: usize,
    pub prometheus_handle: metrics_exporter_prometheus::PrometheusHandle,
}

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        // Health and status
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        // Upload page and classification
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}
