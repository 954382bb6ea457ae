//! Pipeline controller
//!
//! Drives the pure state machine with real side effects: validation,
//! orchestration, assembly, persistence. The controller owns the one-shot
//! fallback decision and the overall request deadline, which is re-checked
//! cooperatively at every state transition.

use std::sync::Arc;
use std::time::{Duration, Instant};

use blogsmith_core::{
    count_words, validate, AgentArtifact, BackendMode, BlogsmithError, PipelineConfig,
    PipelineFailure, PipelineResult, RawContentRequest,
};
use blogsmith_gateway::ModelGateway;
use blogsmith_storage::{ObjectStore, StorageWriter};
use serde::Serialize;
use uuid::Uuid;

use crate::assembler::ContentAssembler;
use crate::orchestrator::AgentOrchestrator;
use crate::state_machine::{transition, Action, Event, State};

/// Top-level pipeline driver
pub struct PipelineController {
    orchestrator: AgentOrchestrator,
    assembler: ContentAssembler,
    writer: StorageWriter,
    deadline: Option<Duration>,
}

impl PipelineController {
    pub fn new(
        config: &PipelineConfig,
        gateway: ModelGateway,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            orchestrator: AgentOrchestrator::new(gateway.clone(), config),
            assembler: ContentAssembler::new(gateway, config),
            writer: StorageWriter::new(store),
            deadline: None,
        }
    }

    /// Bound the whole request by a caller-supplied deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Run one request to completion
    ///
    /// Exactly one `ContentRequest` is processed synchronously; the only
    /// state that outlives the call is the stored document.
    pub async fn run(
        &self,
        raw: RawContentRequest,
    ) -> std::result::Result<PipelineResult, PipelineFailure> {
        let deadline = self.deadline.map(|d| Instant::now() + d);

        let mut state = State::Validating;
        let mut artifacts: Vec<AgentArtifact> = Vec::new();
        let mut content: Option<String> = None;
        let mut final_mode = BackendMode::MultiAgent;
        let mut fallback_used = false;

        // Validation runs first; nothing downstream is touched on rejection.
        let request = match validate(raw) {
            Ok(request) => {
                state = apply(state, Event::Validated, &mut artifacts);
                request
            }
            Err(e) => {
                apply(
                    state,
                    Event::ValidationRejected {
                        reason: e.to_string(),
                    },
                    &mut artifacts,
                );
                return Err(failure(&e, Vec::new(), None, None));
            }
        };

        tracing::info!(request_id = %request.request_id, topic = %request.topic, "Pipeline started");

        loop {
            // Cooperative cancellation: checked at each transition, not mid-call
            if let Some(d) = deadline {
                if Instant::now() >= d {
                    let e = BlogsmithError::DeadlineExceeded(
                        "Overall request budget exhausted".to_string(),
                    );
                    apply(
                        state,
                        Event::DeadlineExpired {
                            reason: e.to_string(),
                        },
                        &mut artifacts,
                    );
                    return Err(failure(&e, artifacts, content, Some(request.request_id)));
                }
            }

            match state.clone() {
                State::Orchestrating {
                    mode,
                    fallback_used: fb,
                } => {
                    final_mode = mode;
                    fallback_used = fb;

                    match self.orchestrator.run(&request, mode, deadline).await {
                        Ok(produced) => {
                            artifacts = produced;
                            state = apply(state, Event::ArtifactsReady, &mut artifacts);
                        }
                        Err(e @ BlogsmithError::BackendUnavailable(_)) => {
                            let next = apply(
                                state,
                                Event::BackendLost {
                                    reason: e.to_string(),
                                },
                                &mut artifacts,
                            );
                            if matches!(next, State::Failed { .. }) {
                                return Err(failure(
                                    &e,
                                    artifacts,
                                    None,
                                    Some(request.request_id),
                                ));
                            }
                            // Demoted: the whole sequence re-runs under direct
                            state = next;
                        }
                        Err(e @ BlogsmithError::DeadlineExceeded(_)) => {
                            apply(
                                state,
                                Event::DeadlineExpired {
                                    reason: e.to_string(),
                                },
                                &mut artifacts,
                            );
                            return Err(failure(&e, artifacts, None, Some(request.request_id)));
                        }
                        Err(e) => {
                            apply(
                                state,
                                Event::StageFailed {
                                    reason: e.to_string(),
                                },
                                &mut artifacts,
                            );
                            return Err(failure(&e, artifacts, None, Some(request.request_id)));
                        }
                    }
                }

                State::Assembling { mode, .. } => {
                    match self.assembler.assemble(&artifacts, &request, mode).await {
                        Ok(document) => {
                            content = Some(document);
                            state = apply(state, Event::Assembled, &mut artifacts);
                        }
                        Err(e) => {
                            apply(
                                state,
                                Event::AssemblyFailed {
                                    reason: e.to_string(),
                                },
                                &mut artifacts,
                            );
                            return Err(failure(&e, artifacts, None, Some(request.request_id)));
                        }
                    }
                }

                State::Storing { .. } => {
                    let Some(document) = content.as_deref() else {
                        let e = BlogsmithError::Pipeline(
                            "Reached storing state without assembled content".to_string(),
                        );
                        return Err(failure(&e, artifacts, None, Some(request.request_id)));
                    };

                    match self.writer.persist(document, &request).await {
                        Ok(storage_key) => {
                            state = apply(state, Event::Stored { storage_key }, &mut artifacts);
                        }
                        Err(e) => {
                            apply(
                                state,
                                Event::StorageFailed {
                                    reason: e.to_string(),
                                },
                                &mut artifacts,
                            );
                            // The generated document stays available for diagnostics
                            return Err(failure(&e, artifacts, content, Some(request.request_id)));
                        }
                    }
                }

                State::Completed { storage_key } => {
                    let document = content.take().unwrap_or_default();
                    tracing::info!(
                        request_id = %request.request_id,
                        %storage_key,
                        fallback_used,
                        "Pipeline completed"
                    );
                    return Ok(PipelineResult {
                        word_count: count_words(&document),
                        content: document,
                        fallback_used,
                        backend: final_mode,
                        storage_key,
                        request_id: request.request_id,
                    });
                }

                State::Validating | State::Failed { .. } => {
                    // The driver returns before re-entering these states
                    let e = BlogsmithError::Pipeline(format!(
                        "Controller reached unexpected state {:?}",
                        state
                    ));
                    return Err(failure(&e, artifacts, content, Some(request.request_id)));
                }
            }
        }
    }
}

/// Apply one event, executing the bookkeeping actions it yields
///
/// `RunStages`, `AssembleContent`, and `PersistContent` are performed by the
/// driver loop when it observes the successor state.
fn apply(state: State, event: Event, artifacts: &mut Vec<AgentArtifact>) -> State {
    let (next, actions) = transition(state, event);
    for action in actions {
        match action {
            Action::LogActivity { message } => tracing::info!("{}", message),
            Action::DiscardArtifacts => {
                tracing::debug!(
                    discarded = artifacts.len(),
                    "Discarding artifacts from abandoned backend mode"
                );
                artifacts.clear();
            }
            Action::RunStages { .. } | Action::AssembleContent | Action::PersistContent => {}
        }
    }
    next
}

fn failure(
    error: &BlogsmithError,
    artifacts: Vec<AgentArtifact>,
    content: Option<String>,
    request_id: Option<Uuid>,
) -> PipelineFailure {
    PipelineFailure {
        error_kind: error.kind().to_string(),
        message: error.to_string(),
        artifacts,
        content,
        request_id,
    }
}

/// Caller-facing report of one `generate_content` invocation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerateReport {
    Ok {
        storage_key: String,
        content_excerpt: String,
        word_count: usize,
        fallback_used: bool,
        backend: BackendMode,
        request_id: Uuid,
    },
    Error {
        error_kind: String,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
}

/// Entry operation: run one content request end to end
pub async fn generate_content(
    payload: RawContentRequest,
    config: &PipelineConfig,
    gateway: ModelGateway,
    store: Arc<dyn ObjectStore>,
    deadline: Option<Duration>,
) -> GenerateReport {
    let mut controller = PipelineController::new(config, gateway, store);
    if let Some(d) = deadline {
        controller = controller.with_deadline(d);
    }

    match controller.run(payload).await {
        Ok(result) => GenerateReport::Ok {
            storage_key: result.storage_key,
            content_excerpt: excerpt(&result.content),
            word_count: result.word_count,
            fallback_used: result.fallback_used,
            backend: result.backend,
            request_id: result.request_id,
        },
        Err(failure) => GenerateReport::Error {
            error_kind: failure.error_kind,
            message: failure.message,
            content: failure.content,
        },
    }
}

const EXCERPT_CHARS: usize = 280;

fn excerpt(content: &str) -> String {
    content.chars().take(EXCERPT_CHARS).collect()
}
