//! # blogsmith-pipeline
//!
//! Orchestration pipeline for Blogsmith.
//!
//! This crate provides:
//! - Sequential role orchestration (research → outline → draft → edit)
//! - Content assembly with keyword coverage and length enforcement
//! - A pure state machine for pipeline control flow
//! - The pipeline controller owning the one-shot backend fallback
//! - The `generate_content` entry operation

mod assembler;
mod controller;
mod orchestrator;
mod prompt;
mod state_machine;

pub use assembler::ContentAssembler;
pub use controller::{generate_content, GenerateReport, PipelineController};
pub use orchestrator::AgentOrchestrator;
pub use prompt::{build_expansion_prompt, build_role_prompt};
pub use state_machine::{transition, Action, Event, State};
