//! # blogsmith-core
//!
//! Core types for the Blogsmith content-generation pipeline.
//!
//! Blogsmith turns a structured marketing-article request into a long-form
//! text artifact via a four-role agent pipeline (research → outline → draft
//! → edit) and persists the result under a deterministic storage key.
//!
//! ## Core Paradigm
//!
//! - A request is validated exactly once and immutable afterwards
//! - Every stage output is an `AgentArtifact` ordered by stage ordinal
//! - The backend mode is a whole-request decision, never mixed mid-pipeline
//! - Configuration is loaded once per process and treated as read-only

mod config;
mod error;
mod types;
mod validate;

pub use config::PipelineConfig;
pub use error::{BlogsmithError, Result};
pub use types::*;
pub use validate::validate;
