//! Deterministic persistence of finished documents

use std::sync::Arc;

use blogsmith_core::{ContentRequest, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::store::ObjectStore;

/// Persists finished documents under deterministic, collision-free keys
///
/// No internal retry: a failed write surfaces as a storage error and retry
/// policy belongs to the caller.
#[derive(Clone)]
pub struct StorageWriter {
    store: Arc<dyn ObjectStore>,
}

impl StorageWriter {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Persist `content` and return the storage key
    pub async fn persist(&self, content: &str, request: &ContentRequest) -> Result<String> {
        let key = storage_key(request.request_id, Utc::now());

        tracing::info!(
            request_id = %request.request_id,
            %key,
            words = blogsmith_core::count_words(content),
            "Persisting document"
        );

        self.store.put(&key, content.as_bytes()).await?;
        Ok(key)
    }
}

/// Compute the storage key for a request at a given creation time
///
/// The timestamp keeps the layout browsable by time of day; the full request
/// UUID makes the key injective even when two requests complete within the
/// same second.
pub fn storage_key(request_id: Uuid, created_at: DateTime<Utc>) -> String {
    format!(
        "blog-output/{}/{}.txt",
        created_at.format("%Y%m%d-%H%M%S"),
        request_id
    )
}
