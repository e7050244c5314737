//! MRI Classifier - brain MRI tumor classification over HTTP
//!
//! Loads a pre-trained image classifier once at startup and serves an upload
//! page plus a JSON prediction endpoint. A companion `fetch-model` binary pulls
//! the model artifact from the Hugging Face Hub into place.

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod labels;
pub mod metrics;
pub mod model;
pub mod prediction;
pub mod preprocess;
pub mod uploads;

pub use config::{FetchConfig, ServerConfig};
pub use error::{ClassifierError, PredictError};
pub use labels::{ClassKey, ClassLabels};
pub use model::{Classifier, OnnxClassifier};
pub use prediction::Prediction;
pub use uploads::UploadStore;
