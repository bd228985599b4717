//! Fetch, extract, persist: the analysis of one CAD upload.

use std::sync::Arc;

use smartspec_geometry::{AnalysisReport, Extractor, Format, GeometryError};
use thiserror::Error;
use tracing::{error, info};

use crate::source::{SourceError, Upload, UploadSource};
use crate::store::{EstimateStore, StoreError, StoredEstimate};

/// Failures of one analysis request.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The upload bytes could not be obtained; nothing was parsed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The file type is not a recognized CAD format.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The estimate store failed on lookup.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The blocking extraction task panicked or was cancelled.
    #[error("CAD analysis task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Analyses uploads and records their estimates.
pub struct AnalysisService {
    source: Arc<dyn UploadSource>,
    store: Arc<dyn EstimateStore>,
    extractor: Extractor,
}

impl AnalysisService {
    /// Create a service over the given collaborators.
    pub fn new(
        source: Arc<dyn UploadSource>,
        store: Arc<dyn EstimateStore>,
        extractor: Extractor,
    ) -> Self {
        Self {
            source,
            store,
            extractor,
        }
    }

    /// Analyse the upload stored under `upload_id`.
    ///
    /// Fails if the bytes cannot be fetched or the extension is not
    /// supported. A failure to record the estimate is logged but does not
    /// fail the request; the caller still gets its numbers.
    pub async fn analyze(&self, upload_id: &str) -> Result<AnalysisReport, AnalysisError> {
        let Upload { file_name, bytes } = self.source.fetch(upload_id).await?;
        let format = Format::from_file_name(&file_name)?;

        // Scanning up to the upload cap is CPU-bound.
        let extractor = self.extractor.clone();
        let extraction =
            tokio::task::spawn_blocking(move || extractor.analyze(&bytes, format)).await?;
        info!(
            upload_id,
            file_name = %file_name,
            %format,
            origin = ?extraction.origin,
            points = extraction.point_count,
            volume = extraction.estimate.volume,
            "analyzed CAD upload"
        );

        let stored = StoredEstimate {
            file_name: file_name.clone(),
            estimate: extraction.estimate,
        };
        if let Err(err) = self.store.record(upload_id, stored).await {
            error!(upload_id, error = %err, "failed to record CAD estimate");
        }

        Ok(AnalysisReport::from(&extraction.estimate).with_file_name(file_name))
    }

    /// The recorded analysis for `upload_id`, if any.
    pub async fn stored(&self, upload_id: &str) -> Result<Option<AnalysisReport>, AnalysisError> {
        let stored = self.store.get(upload_id).await?;
        Ok(stored.map(|s| AnalysisReport::from(&s.estimate).with_file_name(s.file_name)))
    }
}
