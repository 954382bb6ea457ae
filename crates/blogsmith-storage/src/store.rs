//! Object-store transport
//!
//! The contract is a single `put(key, bytes)`; this core needs no read path.

use async_trait::async_trait;
use blogsmith_core::{BlogsmithError, Result};
use sha2::{Digest, Sha256};

/// A durable object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` under `key` in a single atomic operation
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// HTTP object store: `PUT {target}/{key}` with an integrity digest header
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    target: String,
    client: reqwest::Client,
}

impl HttpObjectStore {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let url = format!("{}/{}", self.target.trim_end_matches('/'), key);
        let digest = hex::encode(Sha256::digest(bytes));

        tracing::debug!(%url, bytes = bytes.len(), "Writing object");

        let response = self
            .client
            .put(&url)
            .header("x-content-sha256", &digest)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| BlogsmithError::Storage(format!("Failed to reach object store: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown".to_string());
            let excerpt: String = body.chars().take(200).collect();
            return Err(BlogsmithError::Storage(format!(
                "Object store returned {}: {}",
                status, excerpt
            )));
        }

        tracing::info!(%key, %digest, "Object written");
        Ok(())
    }
}
