//! Upload byte sources.
//!
//! The analysis service only needs "fetch the raw bytes of an upload by
//! identifier". [`DirectorySource`] serves uploads from a local directory;
//! other storage backends implement [`UploadSource`].

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

/// Raw bytes of one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name, used for format dispatch.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Failures while obtaining upload bytes. None of these are retried here.
#[derive(Error, Debug)]
pub enum SourceError {
    /// No upload exists under the identifier.
    #[error("CAD upload not found: {0}")]
    NotFound(String),

    /// The upload exists but its bytes could not be read.
    #[error("Failed to download CAD file: {0}")]
    Unavailable(String),

    /// The upload exceeds the configured size cap.
    #[error("CAD file too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },
}

/// Fetches upload bytes by identifier.
#[async_trait]
pub trait UploadSource: Send + Sync {
    /// Fetch the upload stored under `upload_id`.
    async fn fetch(&self, upload_id: &str) -> Result<Upload, SourceError>;
}

/// Uploads stored as files under a root directory.
///
/// The upload identifier is the file's path relative to the root. Absolute
/// paths and `..` components are treated as unknown identifiers.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    max_file_bytes: u64,
}

impl DirectorySource {
    /// Serve uploads from `root`, refusing files larger than `max_file_bytes`.
    pub fn new(root: impl Into<PathBuf>, max_file_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_file_bytes,
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, upload_id: &str) -> Result<PathBuf, SourceError> {
        let rel = Path::new(upload_id);
        let is_plain = !upload_id.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !is_plain {
            return Err(SourceError::NotFound(upload_id.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl UploadSource for DirectorySource {
    async fn fetch(&self, upload_id: &str) -> Result<Upload, SourceError> {
        let path = self.resolve(upload_id)?;

        // Symlinks may point anywhere; only the resolved target counts.
        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|err| io_error(upload_id, err))?;
        let target = tokio::fs::canonicalize(&path)
            .await
            .map_err(|err| io_error(upload_id, err))?;
        if !target.starts_with(&root) {
            warn!(upload_id, target = %target.display(), "upload resolves outside the upload root");
            return Err(SourceError::NotFound(upload_id.to_string()));
        }

        let meta = tokio::fs::metadata(&target)
            .await
            .map_err(|err| io_error(upload_id, err))?;
        if !meta.is_file() {
            return Err(SourceError::NotFound(upload_id.to_string()));
        }
        if meta.len() > self.max_file_bytes {
            return Err(SourceError::TooLarge {
                size: meta.len(),
                limit: self.max_file_bytes,
            });
        }

        let bytes = read_capped(upload_id, &target, self.max_file_bytes).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| upload_id.to_string());

        debug!(upload_id, %file_name, bytes = bytes.len(), "fetched upload");
        Ok(Upload { file_name, bytes })
    }
}

/// Read at most `limit` bytes. The file may have grown since its metadata
/// was checked, so the cap is enforced on the bytes actually read; `size` in
/// the error is then a lower bound.
async fn read_capped(upload_id: &str, path: &Path, limit: u64) -> Result<Vec<u8>, SourceError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|err| io_error(upload_id, err))?;
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .await
        .map_err(|err| io_error(upload_id, err))?;

    let size = bytes.len() as u64;
    if size > limit {
        return Err(SourceError::TooLarge { size, limit });
    }
    Ok(bytes)
}

fn io_error(upload_id: &str, err: io::Error) -> SourceError {
    match err.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound(upload_id.to_string()),
        _ => SourceError::Unavailable(format!("{upload_id}: {err}")),
    }
}
