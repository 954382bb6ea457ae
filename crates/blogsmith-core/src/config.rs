//! Configuration management for Blogsmith
//!
//! This module provides the process-wide pipeline configuration: backend
//! endpoints, storage target, timeout and retry budgets, and the word-count
//! tolerance band. Loaded once per process and treated as immutable.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::Result;

/// Process-wide pipeline configuration
///
/// Loaded from `blogsmith.toml` when present, otherwise defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Endpoint of the multi-agent orchestration backend
    #[serde(default = "default_multi_agent_endpoint")]
    pub multi_agent_endpoint: String,

    /// Endpoint of the direct single-call backend
    #[serde(default = "default_direct_endpoint")]
    pub direct_endpoint: String,

    /// Base URL (bucket) for object-store writes
    #[serde(default = "default_storage_target")]
    pub storage_target: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_per_call_timeout_secs")]
    pub per_call_timeout_secs: u64,

    /// Bounded retry count within the current backend mode
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Tolerance band around the target word count (fraction)
    #[serde(default = "default_word_count_tolerance")]
    pub word_count_tolerance: f64,

    /// Model identifier forwarded to both backends
    #[serde(default = "default_model")]
    pub model: String,
}

// Default value providers
fn default_multi_agent_endpoint() -> String {
    "http://localhost:8080/v1/crew".to_string()
}

fn default_direct_endpoint() -> String {
    "http://localhost:8080/v1/generate".to_string()
}

fn default_storage_target() -> String {
    "http://localhost:9000/blogsmith".to_string()
}

fn default_per_call_timeout_secs() -> u64 {
    300
}

fn default_retry_count() -> u32 {
    3
}

fn default_word_count_tolerance() -> f64 {
    0.10
}

fn default_model() -> String {
    "meta.llama2-13b-chat-v1".to_string()
}

impl PipelineConfig {
    /// Load configuration from `blogsmith.toml` or use defaults
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config_path = dir.join("blogsmith.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content).map_err(|e| {
                crate::BlogsmithError::Other(format!("Failed to parse config file: {}", e))
            })?)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `blogsmith.toml`
    pub fn write_default(dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let config_path = dir.join("blogsmith.toml");
        let config = Self::default();
        let content = toml::to_string_pretty(&config).map_err(|e| {
            crate::BlogsmithError::Other(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    /// Per-call timeout as a `Duration`
    pub fn per_call_timeout(&self) -> Duration {
        Duration::from_secs(self.per_call_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            multi_agent_endpoint: default_multi_agent_endpoint(),
            direct_endpoint: default_direct_endpoint(),
            storage_target: default_storage_target(),
            per_call_timeout_secs: default_per_call_timeout_secs(),
            retry_count: default_retry_count(),
            word_count_tolerance: default_word_count_tolerance(),
            model: default_model(),
        }
    }
}
