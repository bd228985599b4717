//! Persistence of extracted estimates against their upload identifier.

use std::collections::HashMap;

use async_trait::async_trait;
use smartspec_geometry::GeometryEstimate;
use thiserror::Error;
use tokio::sync::RwLock;

/// Failures of the estimate store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("Estimate store unavailable: {0}")]
    Unavailable(String),
}

/// An estimate together with the file it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEstimate {
    /// Name of the analysed file.
    pub file_name: String,
    /// The estimate.
    pub estimate: GeometryEstimate,
}

/// Stores one estimate per upload identifier.
#[async_trait]
pub trait EstimateStore: Send + Sync {
    /// Record the estimate for `upload_id`, replacing any earlier one.
    async fn record(&self, upload_id: &str, stored: StoredEstimate) -> Result<(), StoreError>;

    /// Look up the estimate for `upload_id`.
    async fn get(&self, upload_id: &str) -> Result<Option<StoredEstimate>, StoreError>;
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    estimates: RwLock<HashMap<String, StoredEstimate>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded estimates.
    pub async fn len(&self) -> usize {
        self.estimates.read().await.len()
    }

    /// True if nothing has been recorded.
    pub async fn is_empty(&self) -> bool {
        self.estimates.read().await.is_empty()
    }
}

#[async_trait]
impl EstimateStore for MemoryStore {
    async fn record(&self, upload_id: &str, stored: StoredEstimate) -> Result<(), StoreError> {
        self.estimates
            .write()
            .await
            .insert(upload_id.to_string(), stored);
        Ok(())
    }

    async fn get(&self, upload_id: &str) -> Result<Option<StoredEstimate>, StoreError> {
        Ok(self.estimates.read().await.get(upload_id).cloned())
    }
}
