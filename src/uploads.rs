//! Persisted uploads
//!
//! Every upload is written once under a server-generated name. The caller's
//! filename never becomes part of a path; only a short alphanumeric extension
//! is carried over so the file stays recognisable on disk.

use std::path::{Path, PathBuf};

const FALLBACK_EXTENSION: &str = "bin";
const MAX_EXTENSION_LEN: usize = 8;

/// A file written by [`UploadStore::save`]
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub path: PathBuf,
    /// Caller-supplied filename, metadata only
    pub original_filename: String,
}

/// Directory that receives uploaded images
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create the store, creating `dir` if absent
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under a fresh name and return where they landed
    pub async fn save(
        &self,
        original_filename: &str,
        bytes: &[u8],
    ) -> std::io::Result<StoredUpload> {
        let name = format!(
            "{}.{}",
            uuid::Uuid::new_v4(),
            sanitized_extension(original_filename)
        );
        let path = self.dir.join(name);

        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(
            upload = %original_filename,
            path = %path.display(),
            size = bytes.len(),
            "Stored upload"
        );

        Ok(StoredUpload {
            path,
            original_filename: original_filename.to_string(),
        })
    }
}

/// Extension of `filename` if it is short and ASCII alphanumeric, else `bin`
pub fn sanitized_extension(filename: &str) -> String {
    // Only the final segment counts, whichever separator the client used
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();

    match base.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => FALLBACK_EXTENSION.to_string(),
    }
}
