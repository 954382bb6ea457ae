//! Model gateway: retry, timeout, and fallback signalling
//!
//! The gateway owns the per-call policy for both backend modes. It never
//! switches modes on its own: demotion from `MultiAgent` to `Direct` is a
//! whole-request decision taken by the pipeline controller, which the
//! gateway supports by raising the distinguished `BackendUnavailable`
//! condition instead of retrying an unreachable service forever.

use std::sync::Arc;
use std::time::Duration;

use blogsmith_core::{BackendMode, BlogsmithError, PipelineConfig, Result, Role};

use crate::backend::{BackendResult, HttpBackend, TextBackend};
use crate::types::{BackendError, BackendErrorKind, GenerationParameters, GenerationRequest};

const INITIAL_BACKOFF_MS: u64 = 250;
const MAX_BACKOFF_MS: u64 = 4_000;

/// Gateway over the two interchangeable generation backends
#[derive(Clone)]
pub struct ModelGateway {
    multi_agent: Arc<dyn TextBackend>,
    direct: Arc<dyn TextBackend>,
    model: String,
    per_call_timeout: Duration,
    retry_count: u32,
}

impl ModelGateway {
    /// Build a gateway over explicit backends (tests inject mocks here)
    pub fn new(
        multi_agent: Arc<dyn TextBackend>,
        direct: Arc<dyn TextBackend>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            multi_agent,
            direct,
            model: config.model.clone(),
            per_call_timeout: config.per_call_timeout(),
            retry_count: config.retry_count,
        }
    }

    /// Build a gateway with HTTP backends from configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        let multi_agent = Arc::new(HttpBackend::new(
            config.multi_agent_endpoint.clone(),
            BackendMode::MultiAgent,
        ));
        let direct = Arc::new(HttpBackend::new(
            config.direct_endpoint.clone(),
            BackendMode::Direct,
        ));
        Self::new(multi_agent, direct, config)
    }

    /// Invoke the backend for `mode` with bounded retries
    ///
    /// Transient failures (timeouts, and connection loss in direct mode) are
    /// retried up to `retry_count` times with exponential backoff, always
    /// within the current mode. In multi-agent mode an unavailable signal
    /// raises `BackendUnavailable` at once so the controller can demote the
    /// request; exhausted retries map to `BackendUnavailable` (multi-agent)
    /// or an agent-stage error (direct). Invalid requests are never retried.
    pub async fn invoke(&self, role: Role, prompt: &str, mode: BackendMode) -> Result<String> {
        let backend = self.backend_for(mode);
        let request = GenerationRequest {
            role: role.to_string(),
            prompt: self.frame_prompt(role, prompt, mode),
            model: self.model.clone(),
            parameters: GenerationParameters::for_mode(mode),
        };

        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            tracing::debug!(%role, %mode, attempt = retries + 1, "Invoking backend");

            let outcome = match tokio::time::timeout(self.per_call_timeout, backend.generate(&request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(BackendError::new(
                    BackendErrorKind::Timeout,
                    format!(
                        "Call exceeded per-call budget of {}s",
                        self.per_call_timeout.as_secs()
                    ),
                )),
            };

            let error = match outcome {
                Ok(text) => {
                    tracing::info!(%role, %mode, chars = text.len(), "Backend call complete");
                    return Ok(text);
                }
                Err(e) => e,
            };

            match error.kind {
                BackendErrorKind::InvalidRequest => {
                    return Err(BlogsmithError::Agent(format!(
                        "{} stage rejected by {} backend: {}",
                        role, mode, error.message
                    )));
                }
                BackendErrorKind::Unavailable if mode == BackendMode::MultiAgent => {
                    tracing::warn!(%role, "Multi-agent backend unavailable: {}", error.message);
                    return Err(BlogsmithError::BackendUnavailable(error.message));
                }
                BackendErrorKind::Timeout | BackendErrorKind::Unavailable => {
                    retries += 1;
                    if retries > self.retry_count {
                        return Err(self.exhausted(role, mode, retries - 1, &error));
                    }
                    tracing::warn!(
                        %role, %mode,
                        "Transient backend failure ({}). Waiting {}ms before retry {}/{}",
                        error.kind, backoff_ms, retries, self.retry_count
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
                }
            }
        }
    }

    fn backend_for(&self, mode: BackendMode) -> &Arc<dyn TextBackend> {
        match mode {
            BackendMode::MultiAgent => &self.multi_agent,
            BackendMode::Direct => &self.direct,
        }
    }

    /// Role-annotate the prompt for the direct endpoint
    ///
    /// The multi-agent service is role-aware and receives the prompt as-is;
    /// the direct endpoint expects instruction framing around a persona.
    fn frame_prompt(&self, role: Role, prompt: &str, mode: BackendMode) -> String {
        match mode {
            BackendMode::MultiAgent => prompt.to_string(),
            BackendMode::Direct => {
                format!("[INST] You are {}. {} [/INST]", role.persona(), prompt)
            }
        }
    }

    fn exhausted(
        &self,
        role: Role,
        mode: BackendMode,
        retries: u32,
        last: &BackendError,
    ) -> BlogsmithError {
        let message = format!(
            "{} stage exhausted {} retries against {} backend. Last error: {}",
            role, retries, mode, last
        );
        match mode {
            BackendMode::MultiAgent => BlogsmithError::BackendUnavailable(message),
            BackendMode::Direct => BlogsmithError::Agent(message),
        }
    }
}
