//! Model artifact fetching using hf-hub
//!
//! Downloads a model repository into the local hub cache, then copies the
//! first file with the expected extension to the path the server loads from.

use crate::config::FetchConfig;
use anyhow::{Context, Result};
use hf_hub::api::tokio::{Api, ApiBuilder};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Result of installing an artifact from a downloaded tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// `source` was copied to `dest`
    Copied { source: PathBuf, dest: PathBuf },
    /// No file matched; `listing` describes the tree that was searched
    NotFound { listing: String },
}

/// Download every file of `model_id` and return the snapshot directory
///
/// # Arguments
/// * `model_id` - The model identifier (e.g., "org/brain-mri-classifier")
/// * `cache_dir` - Optional custom cache directory. If None, uses default HF cache.
pub async fn download_snapshot(model_id: &str, cache_dir: Option<PathBuf>) -> Result<PathBuf> {
    tracing::info!(model_id = %model_id, cache_dir = ?cache_dir, "Starting model download via hf-hub");

    let api = match cache_dir {
        Some(dir) => ApiBuilder::new()
            .with_cache_dir(dir)
            .build()
            .context("Failed to create HF API client")?,
        None => Api::new().context("Failed to create HF API client")?,
    };

    let repo = api.model(model_id.to_string());
    let info = repo
        .info()
        .await
        .with_context(|| format!("Failed to fetch repository info for {}", model_id))?;

    let mut snapshot: Option<PathBuf> = None;
    for sibling in &info.siblings {
        tracing::debug!(model_id = %model_id, file = %sibling.rfilename, "Downloading file");
        let path = repo
            .get(&sibling.rfilename)
            .await
            .with_context(|| format!("Failed to download {}", sibling.rfilename))?;

        // Walk back up past the repo-relative components to the snapshot root
        if snapshot.is_none() {
            let depth = Path::new(&sibling.rfilename).components().count();
            snapshot = path.ancestors().nth(depth).map(Path::to_path_buf);
        }
    }

    let snapshot = snapshot
        .with_context(|| format!("Model {} has no files to download", model_id))?;

    tracing::info!(model_id = %model_id, path = %snapshot.display(), "Model downloaded");

    Ok(snapshot)
}

/// Directory to search for the artifact
///
/// A local `source_dir` wins and is used as-is. Otherwise `model_id` is
/// downloaded from the hub. Having neither is an error.
pub async fn resolve_source_root(
    source_dir: Option<PathBuf>,
    model_id: Option<&str>,
    cache_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    match (source_dir, model_id) {
        (Some(dir), _) => Ok(dir),
        (None, Some(model_id)) => download_snapshot(model_id, cache_dir).await,
        (None, None) => anyhow::bail!("either a model id or --source-dir is required"),
    }
}

/// Recursively find the first file under `root` whose extension matches
///
/// Entries are visited in sorted order so the result is stable across runs.
/// The comparison ignores ASCII case.
pub fn find_first_with_extension(root: &Path, extension: &str) -> std::io::Result<Option<PathBuf>> {
    let extension = extension.trim_start_matches('.');

    for entry in sorted_entries(root)? {
        if entry.is_dir() {
            if let Some(found) = find_first_with_extension(&entry, extension)? {
                return Ok(Some(found));
            }
        } else if entry
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            return Ok(Some(entry));
        }
    }

    Ok(None)
}

/// Render `root` as a directory tree for diagnostics
///
/// Each directory appears as `[DIR] <path>` followed by its files, then its
/// subdirectories in the same format.
pub fn directory_listing(root: &Path) -> std::io::Result<String> {
    let mut out = String::new();
    write_listing(root, &mut out)?;
    Ok(out)
}

fn write_listing(dir: &Path, out: &mut String) -> std::io::Result<()> {
    let _ = writeln!(out, "[DIR] {}", dir.display());

    let entries = sorted_entries(dir)?;
    let (dirs, files): (Vec<_>, Vec<_>) = entries.into_iter().partition(|p| p.is_dir());

    for file in &files {
        if let Some(name) = file.file_name() {
            let _ = writeln!(out, "    - {}", name.to_string_lossy());
        }
    }
    for sub in &dirs {
        write_listing(sub, out)?;
    }

    Ok(())
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

/// Copy the first matching artifact under `source_root` into place
///
/// The destination directory is created if needed and an existing
/// destination file is overwritten. When nothing matches, no destination
/// file is written.
pub fn install_artifact(source_root: &Path, config: &FetchConfig) -> Result<FetchOutcome> {
    std::fs::create_dir_all(&config.dest_dir)
        .with_context(|| format!("Cannot create destination directory: {:?}", config.dest_dir))?;

    let found = find_first_with_extension(source_root, &config.extension)
        .with_context(|| format!("Failed to search {:?}", source_root))?;

    match found {
        Some(source) => {
            let dest = config.dest_path();
            std::fs::copy(&source, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", source, dest))?;

            tracing::info!(source = %source.display(), dest = %dest.display(), "Installed model artifact");

            Ok(FetchOutcome::Copied { source, dest })
        }
        None => {
            tracing::warn!(
                root = %source_root.display(),
                extension = %config.extension,
                "No matching artifact found"
            );
            let listing = directory_listing(source_root)
                .with_context(|| format!("Failed to list {:?}", source_root))?;
            Ok(FetchOutcome::NotFound { listing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_api_builder_with_cache_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let api = ApiBuilder::new()
            .with_cache_dir(temp_dir.path().to_path_buf())
            .build();
        assert!(api.is_ok());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("MODEL.ONNX"), b"x").unwrap();

        let found = find_first_with_extension(dir.path(), ".onnx").unwrap();
        assert_eq!(found, Some(dir.path().join("MODEL.ONNX")));
    }

    #[test]
    fn test_find_ignores_directories_named_like_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("weights.onnx")).unwrap();

        assert_eq!(find_first_with_extension(dir.path(), "onnx").unwrap(), None);
    }

    #[test]
    fn test_listing_format() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("README.md"), b"x").unwrap();
        std::fs::write(dir.path().join("sub/weights.h5"), b"x").unwrap();

        let listing = directory_listing(dir.path()).unwrap();
        let expected = format!(
            "[DIR] {}\n    - README.md\n[DIR] {}\n    - weights.h5\n",
            dir.path().display(),
            dir.path().join("sub").display()
        );
        assert_eq!(listing, expected);
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_download_snapshot() {
        let temp_dir = tempfile::tempdir().unwrap();
        let snapshot = download_snapshot(
            "onnx-community/mobilenet_v2_1.0_224",
            Some(temp_dir.path().to_path_buf()),
        )
        .await
        .unwrap();
        assert!(find_first_with_extension(&snapshot, "onnx").unwrap().is_some());
    }
}
