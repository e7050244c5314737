//! Prometheus metrics

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::time::Duration;

/// Setup Prometheus metrics exporter
/// Returns a handle that can be used to retrieve metrics
pub fn setup_metrics() -> Result<metrics_exporter_prometheus::PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;

    tracing::info!("Prometheus metrics exporter installed");

    Ok(handle)
}

/// Record a successful prediction
pub fn record_prediction(top_class: &str) {
    metrics::counter!("mri_classifier_predictions_total",
        "class" => top_class.to_string()
    )
    .increment(1);
}

/// Record a failed prediction request
pub fn record_prediction_error(kind: &'static str) {
    metrics::counter!("mri_classifier_prediction_errors_total",
        "kind" => kind
    )
    .increment(1);
}

/// Record time spent in model inference
pub fn record_inference_duration(elapsed: Duration) {
    metrics::histogram!("mri_classifier_inference_seconds").record(elapsed.as_secs_f64());
}
