//! Wire types for generation backends

use blogsmith_core::BackendMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sampling parameters forwarded to the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub max_gen_len: usize,
    pub temperature: f64,
    pub top_p: f64,
}

impl GenerationParameters {
    /// Defaults per backend mode
    ///
    /// The direct endpoint accepts a smaller completion budget than the
    /// multi-agent service, which composes several reasoning turns.
    pub fn for_mode(mode: BackendMode) -> Self {
        let max_gen_len = match mode {
            BackendMode::MultiAgent => 2048,
            BackendMode::Direct => 512,
        };
        Self {
            max_gen_len,
            temperature: 0.5,
            top_p: 0.9,
        }
    }
}

/// Request body sent to either backend
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub role: String,
    pub prompt: String,
    pub model: String,
    pub parameters: GenerationParameters,
}

/// Response body returned by either backend
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
}

/// Distinguished backend error signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// The call did not complete within the per-call budget
    Timeout,
    /// Connection failure or an explicit unavailable signal from the service
    Unavailable,
    /// The backend rejected the request body; retrying cannot help
    InvalidRequest,
}

impl std::fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::InvalidRequest => write!(f, "invalid_request"),
        }
    }
}

/// Error raised by a single backend call
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_per_mode() {
        let multi = GenerationParameters::for_mode(BackendMode::MultiAgent);
        let direct = GenerationParameters::for_mode(BackendMode::Direct);
        assert_eq!(multi.max_gen_len, 2048);
        assert_eq!(direct.max_gen_len, 512);
        assert!((multi.temperature - 0.5).abs() < f64::EPSILON);
        assert!((direct.top_p - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(BackendErrorKind::Timeout.to_string(), "timeout");
        assert_eq!(BackendErrorKind::Unavailable.to_string(), "unavailable");
        assert_eq!(BackendErrorKind::InvalidRequest.to_string(), "invalid_request");
    }
}
