//! Backend transport implementations
//!
//! A `TextBackend` performs exactly one generation call and reports failures
//! through the distinguished `BackendErrorKind` signals. Retry and fallback
//! policy live in the gateway, never here.

use async_trait::async_trait;
use blogsmith_core::BackendMode;

use crate::types::{BackendError, BackendErrorKind, GenerationRequest, GenerationResponse};

/// Outcome of a single backend call
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// A single-call generation backend
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Which invocation strategy this backend implements
    fn mode(&self) -> BackendMode;

    /// Perform one generation call
    async fn generate(&self, request: &GenerationRequest) -> BackendResult<String>;
}

/// HTTP backend speaking the `{role, prompt, parameters}` → `{text}` contract
#[derive(Debug, Clone)]
pub struct HttpBackend {
    endpoint: String,
    mode: BackendMode,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(endpoint: impl Into<String>, mode: BackendMode) -> Self {
        Self {
            endpoint: endpoint.into(),
            mode,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TextBackend for HttpBackend {
    fn mode(&self) -> BackendMode {
        self.mode
    }

    async fn generate(&self, request: &GenerationRequest) -> BackendResult<String> {
        tracing::debug!(endpoint = %self.endpoint, role = %request.role, "Sending generation request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    BackendErrorKind::Timeout
                } else {
                    // Connect errors and dropped connections both read as an
                    // unreachable backend to the caller.
                    BackendErrorKind::Unavailable
                };
                BackendError::new(kind, format!("Failed to reach backend: {}", e))
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown".to_string());
            let excerpt: String = body.chars().take(200).collect();

            let kind = match status.as_u16() {
                408 | 504 => BackendErrorKind::Timeout,
                500..=599 => BackendErrorKind::Unavailable,
                _ => BackendErrorKind::InvalidRequest,
            };

            return Err(BackendError::new(
                kind,
                format!("Backend returned {}: {}", status, excerpt),
            ));
        }

        let parsed: GenerationResponse = response.json().await.map_err(|e| {
            BackendError::new(
                BackendErrorKind::InvalidRequest,
                format!("Failed to parse backend response: {}", e),
            )
        })?;

        if parsed.text.trim().is_empty() {
            return Err(BackendError::new(
                BackendErrorKind::InvalidRequest,
                "Backend returned empty text",
            ));
        }

        Ok(parsed.text)
    }
}
