//! Fetch the classifier model artifact into place

use anyhow::Result;
use clap::Parser;
use mri_classifier::config::FetchConfig;
use mri_classifier::fetch::{self, FetchOutcome};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fetch-model")]
#[command(about = "Download a model from the Hugging Face Hub and install it locally", long_about = None)]
#[command(version)]
struct Cli {
    /// Hub model identifier (e.g., "org/brain-mri-classifier")
    model_id: Option<String>,

    /// Search an already downloaded directory instead of the hub
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Directory the artifact is copied into
    #[arg(long, default_value = "models")]
    dest_dir: PathBuf,

    /// File name of the installed artifact
    #[arg(long, default_value = "model.onnx")]
    dest_file: String,

    /// Extension of the artifact to look for
    #[arg(long, default_value = "onnx")]
    extension: String,

    /// Hub cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (json or pretty)
    #[arg(long, default_value = "pretty")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.log_format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(&cli.log_level)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(&cli.log_level)
                .init();
        }
    }

    let config = FetchConfig {
        dest_dir: cli.dest_dir,
        dest_file: cli.dest_file,
        extension: cli.extension,
        cache_dir: cli.cache_dir,
    };

    let root = fetch::resolve_source_root(
        cli.source_dir,
        cli.model_id.as_deref(),
        config.cache_dir.clone(),
    )
    .await?;

    println!("Path to model files: {}", root.display());

    match fetch::install_artifact(&root, &config)? {
        FetchOutcome::Copied { source, dest } => {
            println!("Copied model file:\n  {}\n-> {}", source.display(), dest.display());
        }
        FetchOutcome::NotFound { listing } => {
            println!(
                "No .{} file found inside the downloaded model path.",
                config.extension.trim_start_matches('.')
            );
            println!("Contents of the downloaded folder:");
            print!("{}", listing);
        }
    }

    Ok(())
}
