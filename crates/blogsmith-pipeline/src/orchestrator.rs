//! Sequential role orchestration
//!
//! Runs the four pipeline roles in fixed order, feeding each stage the
//! artifacts of every stage before it. The orchestrator never retries a
//! role itself: per-call retries belong to the gateway, and the whole-request
//! mode decision belongs to the controller, which re-runs the full sequence
//! from the first stage after a demotion so no artifact mixes backends.

use std::time::{Duration, Instant};

use blogsmith_core::{
    AgentArtifact, BackendMode, BlogsmithError, ContentRequest, PipelineConfig, Result, Role,
};
use blogsmith_gateway::ModelGateway;

use crate::prompt;

/// Drives the Researcher → Outliner → Writer → Editor sequence
#[derive(Clone)]
pub struct AgentOrchestrator {
    gateway: ModelGateway,
    per_call_timeout: Duration,
}

impl AgentOrchestrator {
    pub fn new(gateway: ModelGateway, config: &PipelineConfig) -> Self {
        Self {
            gateway,
            per_call_timeout: config.per_call_timeout(),
        }
    }

    /// Run all four stages under a single backend mode
    ///
    /// A `BackendUnavailable` condition from the gateway passes through
    /// untouched so the controller can take the one allowed mode decision.
    /// The deadline is checked before each stage; when the remaining budget
    /// cannot cover one gateway call the run fails fast with the artifacts
    /// produced so far discarded by the caller.
    pub async fn run(
        &self,
        request: &ContentRequest,
        mode: BackendMode,
        deadline: Option<Instant>,
    ) -> Result<Vec<AgentArtifact>> {
        let mut artifacts: Vec<AgentArtifact> = Vec::with_capacity(Role::PIPELINE.len());

        for role in Role::PIPELINE {
            self.check_budget(role, deadline)?;

            let stage_prompt = prompt::build_role_prompt(role, request, &artifacts);
            let text = self.gateway.invoke(role, &stage_prompt, mode).await?;
            let artifact = AgentArtifact::new(role, text);

            tracing::info!(
                request_id = %request.request_id,
                %role,
                %mode,
                ordinal = artifact.ordinal,
                words = artifact.word_count,
                "Stage complete"
            );

            artifacts.push(artifact);
        }

        Ok(artifacts)
    }

    fn check_budget(&self, role: Role, deadline: Option<Instant>) -> Result<()> {
        let Some(deadline) = deadline else {
            return Ok(());
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining < self.per_call_timeout {
            return Err(BlogsmithError::DeadlineExceeded(format!(
                "Remaining budget {}s cannot accommodate the {} stage (needs up to {}s)",
                remaining.as_secs(),
                role,
                self.per_call_timeout.as_secs()
            )));
        }

        Ok(())
    }
}
