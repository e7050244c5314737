//! Configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Prediction service configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub api_port: u16,
    pub model_path: PathBuf,

    /// JSON array of class keys in model output order
    /// If not provided, the built-in training order is used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels_path: Option<PathBuf>,

    pub upload_dir: PathBuf,

    /// HTML page served at `/`; the embedded page is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_template: Option<PathBuf>,

    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_port: default_api_port(),
            model_path: default_model_path(),
            labels_path: None,
            upload_dir: default_upload_dir(),
            index_template: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content).context("Failed to parse TOML config")?
        } else {
            Self::default()
        };

        // Environment variable overrides
        if let Ok(host) = std::env::var("MRI_CLASSIFIER_HOST") {
            config.host = host.parse().context("Invalid MRI_CLASSIFIER_HOST value")?;
        }
        if let Ok(port) = std::env::var("MRI_CLASSIFIER_PORT") {
            config.api_port = port.parse().context("Invalid MRI_CLASSIFIER_PORT value")?;
        }
        if let Ok(model_path) = std::env::var("MRI_CLASSIFIER_MODEL_PATH") {
            config.model_path = PathBuf::from(model_path);
        }
        if let Ok(labels_path) = std::env::var("MRI_CLASSIFIER_LABELS_PATH") {
            config.labels_path = Some(PathBuf::from(labels_path));
        }
        if let Ok(upload_dir) = std::env::var("MRI_CLASSIFIER_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(upload_dir);
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("API port must be non-zero");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("max_upload_bytes must be greater than zero");
        }
        if self.model_path.as_os_str().is_empty() {
            anyhow::bail!("model_path cannot be empty");
        }

        // Ensure upload directory exists or can be created
        if !self.upload_dir.exists() {
            std::fs::create_dir_all(&self.upload_dir).with_context(|| {
                format!("Cannot create upload directory: {:?}", self.upload_dir)
            })?;
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.api_port)
    }
}

/// Artifact fetcher settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    pub dest_dir: PathBuf,
    pub dest_file: String,
    /// File extension to look for, without the dot
    pub extension: String,
    /// Hub cache location; the hub client's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            dest_dir: default_dest_dir(),
            dest_file: default_dest_file(),
            extension: default_extension(),
            cache_dir: None,
        }
    }
}

impl FetchConfig {
    pub fn dest_path(&self) -> PathBuf {
        self.dest_dir.join(&self.dest_file)
    }
}

// Default functions
fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}
fn default_api_port() -> u16 {
    8000
}
fn default_model_path() -> PathBuf {
    PathBuf::from("models/model.onnx")
}
fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}
fn default_dest_dir() -> PathBuf {
    PathBuf::from("models")
}
fn default_dest_file() -> String {
    "model.onnx".to_string()
}
fn default_extension() -> String {
    "onnx".to_string()
}
