//! MRI Classifier - prediction service entry point

use anyhow::{Context, Result};
use axum::body::Bytes;
use clap::Parser;
use mri_classifier::{
    ClassLabels, OnnxClassifier, UploadStore, api, config::ServerConfig, metrics, model,
    preprocess::INPUT_SIZE,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "mri-classifier")]
#[command(about = "Brain MRI classification service", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override API port
    #[arg(long)]
    port: Option<u16>,

    /// Override model path
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (json or pretty)
    #[arg(long, default_value = "json")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    match cli.log_format.as_str() {
        "pretty" => {
            tracing_subscriber::fmt()
                .with_env_filter(&cli.log_level)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(&cli.log_level)
                .json()
                .init();
        }
    }

    tracing::info!("Starting MRI classifier");

    // Load configuration
    let mut config = ServerConfig::load(cli.config)?;

    // CLI overrides
    if let Some(port) = cli.port {
        config.api_port = port;
    }
    if let Some(model_path) = cli.model_path {
        config.model_path = model_path;
    }

    config.validate()?;

    tracing::info!(
        addr = %config.bind_addr(),
        model_path = ?config.model_path,
        labels_path = ?config.labels_path,
        upload_dir = ?config.upload_dir,
        "Configuration loaded"
    );

    // The service has nothing to offer without a model, so any failure here is fatal
    let labels = ClassLabels::load(config.labels_path.as_deref())?;
    let classifier = OnnxClassifier::load(&config.model_path, INPUT_SIZE)?;
    model::ensure_compatible(&classifier, &labels)?;

    let uploads = UploadStore::new(&config.upload_dir)
        .with_context(|| format!("Cannot create upload directory: {:?}", config.upload_dir))?;

    let index_html = match &config.index_template {
        Some(path) => Bytes::from(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read index template: {:?}", path))?,
        ),
        None => Bytes::from_static(api::routes::DEFAULT_INDEX_HTML.as_bytes()),
    };

    // Setup metrics
    let prometheus_handle = metrics::setup_metrics()?;

    // Setup API
    let app_state = api::AppState {
        classifier: Arc::new(classifier),
        labels: Arc::new(labels),
        uploads: Arc::new(uploads),
        index_html,
        input_size: INPUT_SIZE,
        max_upload_bytes: config.max_upload_bytes,
        prometheus_handle,
    };

    let app = api::create_router(app_state);

    let addr = config.bind_addr();
    tracing::info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind API server")?;

    // Graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server error")?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
