//! Unified error types for Blogsmith

use thiserror::Error;

/// Unified error type for all Blogsmith operations
#[derive(Error, Debug)]
pub enum BlogsmithError {
    // Request errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // Gateway/agent errors
    #[error("Agent stage failed: {0}")]
    Agent(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    // Assembly errors
    #[error("Assembly error: {0}")]
    Assembly(String),

    // Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Controller errors
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("Pipeline failure: {0}")]
    Pipeline(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

impl BlogsmithError {
    /// Stable machine-readable kind reported to callers
    ///
    /// These strings are part of the entry-operation contract; renaming one
    /// is a breaking change for anyone matching on `error_kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Agent(_) => "agent_error",
            Self::BackendUnavailable(_) => "backend_unavailable",
            Self::Assembly(_) => "assembly_error",
            Self::Storage(_) => "storage_error",
            Self::DeadlineExceeded(_) => "deadline_exceeded",
            Self::Pipeline(_) => "pipeline_failure",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
            Self::Other(_) => "other",
        }
    }
}

/// Result type alias using BlogsmithError
pub type Result<T> = std::result::Result<T, BlogsmithError>;
