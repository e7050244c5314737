//! API request and response models

use crate::prediction::{Prediction, Probabilities};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Successful classification
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub top_class: &'static str,
    pub confidence: f64,
    pub probabilities: Probabilities,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            success: true,
            top_class: prediction.top_class.display_label(),
            confidence: prediction.confidence,
            probabilities: prediction.probabilities,
        }
    }
}
