//! # blogsmith-gateway
//!
//! Backend gateway for the Blogsmith pipeline.
//!
//! This crate implements the invocation layer over two interchangeable
//! generative-text backends:
//! - `multi_agent`: an external agent-orchestration service with role-aware
//!   reasoning
//! - `direct`: a plain generation endpoint called with a role-annotated
//!   prompt
//!
//! ## Key Pattern
//!
//! The gateway applies per-call timeouts and bounded exponential backoff
//! strictly within the current backend mode, and signals an unreachable
//! multi-agent service with a distinguished `BackendUnavailable` condition.
//! The whole-request demotion to `direct` is decided one layer up, so a
//! single document is never authored by two reasoning strategies.

mod backend;
mod gateway;
mod types;

pub use backend::{BackendResult, HttpBackend, TextBackend};
pub use gateway::ModelGateway;
pub use types::{
    BackendError, BackendErrorKind, GenerationParameters, GenerationRequest, GenerationResponse,
};
