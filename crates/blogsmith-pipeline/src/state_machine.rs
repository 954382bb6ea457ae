//! Pure state machine for pipeline control flow
//!
//! This module implements a pure functional state machine with NO I/O.
//! All state transitions are deterministic and testable.
//!
//! Key design principles:
//! - Pure function: transition(state, event) -> (state, actions)
//! - No async, no I/O, no dependencies on the effectful crates
//! - Invalid transitions go to Failed state (never panic)
//! - The multi-agent → direct demotion happens at most once per request

use blogsmith_core::BackendMode;

/// Pipeline state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// Initial state - checking the raw request
    Validating,
    /// Running the role sequence under a backend mode
    Orchestrating {
        mode: BackendMode,
        fallback_used: bool,
    },
    /// Merging artifacts and enforcing quality constraints
    Assembling {
        mode: BackendMode,
        fallback_used: bool,
    },
    /// Persisting the finished document
    Storing { fallback_used: bool },
    /// Successfully completed
    Completed { storage_key: String },
    /// Failed with error
    Failed { error: String },
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The raw request passed validation
    Validated,
    /// The raw request was rejected
    ValidationRejected { reason: String },
    /// All four stages produced artifacts
    ArtifactsReady,
    /// The current backend signalled unavailability
    BackendLost { reason: String },
    /// A stage failed terminally within its backend mode
    StageFailed { reason: String },
    /// Assembly produced the final document
    Assembled,
    /// Assembly failed terminally
    AssemblyFailed { reason: String },
    /// The document was persisted
    Stored { storage_key: String },
    /// Persistence failed
    StorageFailed { reason: String },
    /// The remaining deadline cannot accommodate the next stage
    DeadlineExpired { reason: String },
}

/// Actions to execute as side effects of transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run the four-role sequence under this mode
    RunStages { mode: BackendMode },
    /// Drop artifacts produced under the abandoned mode
    DiscardArtifacts,
    /// Merge artifacts and enforce quality constraints
    AssembleContent,
    /// Persist the finished document
    PersistContent,
    /// Log activity
    LogActivity { message: String },
}

/// Pure state transition function
///
/// Takes current state and event, returns new state and actions to execute.
/// This function is completely deterministic and has no side effects.
///
/// # Invalid Transitions
/// Any invalid transition results in a Failed state with descriptive error.
/// This function never panics.
pub fn transition(state: State, event: Event) -> (State, Vec<Action>) {
    match (state, event) {
        // From Validating
        (State::Validating, Event::Validated) => {
            let mode = BackendMode::MultiAgent;
            let actions = vec![
                Action::LogActivity {
                    message: "Request validated, starting orchestration".to_string(),
                },
                Action::RunStages { mode },
            ];
            (
                State::Orchestrating {
                    mode,
                    fallback_used: false,
                },
                actions,
            )
        }

        (State::Validating, Event::ValidationRejected { reason }) => (
            State::Failed {
                error: reason.clone(),
            },
            vec![Action::LogActivity {
                message: format!("Validation rejected: {}", reason),
            }],
        ),

        // The one allowed fallback: multi-agent lost before any demotion
        (
            State::Orchestrating {
                mode: BackendMode::MultiAgent,
                fallback_used: false,
            },
            Event::BackendLost { reason },
        ) => {
            let actions = vec![
                Action::LogActivity {
                    message: format!("Multi-agent backend lost ({}), demoting to direct", reason),
                },
                Action::DiscardArtifacts,
                Action::RunStages {
                    mode: BackendMode::Direct,
                },
            ];
            (
                State::Orchestrating {
                    mode: BackendMode::Direct,
                    fallback_used: true,
                },
                actions,
            )
        }

        // No second fallback exists
        (State::Orchestrating { .. }, Event::BackendLost { reason }) => (
            State::Failed {
                error: format!("Backend lost after fallback: {}", reason),
            },
            vec![Action::LogActivity {
                message: format!("Backend lost with no fallback remaining: {}", reason),
            }],
        ),

        (State::Orchestrating { .. }, Event::StageFailed { reason }) => (
            State::Failed {
                error: reason.clone(),
            },
            vec![Action::LogActivity {
                message: format!("Stage failed terminally: {}", reason),
            }],
        ),

        (
            State::Orchestrating {
                mode,
                fallback_used,
            },
            Event::ArtifactsReady,
        ) => {
            let actions = vec![
                Action::LogActivity {
                    message: format!("All stages complete under {} backend", mode),
                },
                Action::AssembleContent,
            ];
            (
                State::Assembling {
                    mode,
                    fallback_used,
                },
                actions,
            )
        }

        // From Assembling
        (State::Assembling { fallback_used, .. }, Event::Assembled) => {
            let actions = vec![
                Action::LogActivity {
                    message: "Document assembled, persisting".to_string(),
                },
                Action::PersistContent,
            ];
            (State::Storing { fallback_used }, actions)
        }

        (State::Assembling { .. }, Event::AssemblyFailed { reason }) => (
            State::Failed {
                error: reason.clone(),
            },
            vec![Action::LogActivity {
                message: format!("Assembly failed: {}", reason),
            }],
        ),

        // From Storing
        (State::Storing { .. }, Event::Stored { storage_key }) => {
            let actions = vec![Action::LogActivity {
                message: format!("Document stored under {}", storage_key),
            }];
            (State::Completed { storage_key }, actions)
        }

        (State::Storing { .. }, Event::StorageFailed { reason }) => (
            State::Failed {
                error: reason.clone(),
            },
            vec![Action::LogActivity {
                message: format!("Storage failed: {}", reason),
            }],
        ),

        // Deadline events from any non-terminal state
        (State::Validating, Event::DeadlineExpired { reason })
        | (State::Orchestrating { .. }, Event::DeadlineExpired { reason })
        | (State::Assembling { .. }, Event::DeadlineExpired { reason })
        | (State::Storing { .. }, Event::DeadlineExpired { reason }) => (
            State::Failed {
                error: reason.clone(),
            },
            vec![Action::LogActivity {
                message: format!("Deadline expired: {}", reason),
            }],
        ),

        // Terminal states - no valid transitions
        (State::Completed { storage_key }, event) => (
            State::Failed {
                error: format!(
                    "Invalid transition from Completed state (key: {}) on event: {:?}",
                    storage_key, event
                ),
            },
            vec![],
        ),

        (State::Failed { error }, event) => (
            State::Failed {
                error: format!(
                    "Invalid transition from Failed state (error: {}) on event: {:?}",
                    error, event
                ),
            },
            vec![],
        ),

        // All other invalid transitions
        (state, event) => (
            State::Failed {
                error: format!(
                    "Invalid state transition: {:?} cannot handle event {:?}",
                    state, event
                ),
            },
            vec![],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lost() -> Event {
        Event::BackendLost {
            reason: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_happy_path_full_flow() {
        // Validating -> Orchestrating(multi_agent)
        let (state, actions) = transition(State::Validating, Event::Validated);
        assert_eq!(
            state,
            State::Orchestrating {
                mode: BackendMode::MultiAgent,
                fallback_used: false
            }
        );
        assert!(actions.contains(&Action::RunStages {
            mode: BackendMode::MultiAgent
        }));

        // Orchestrating -> Assembling
        let (state, actions) = transition(state, Event::ArtifactsReady);
        assert_eq!(
            state,
            State::Assembling {
                mode: BackendMode::MultiAgent,
                fallback_used: false
            }
        );
        assert!(actions.contains(&Action::AssembleContent));

        // Assembling -> Storing
        let (state, actions) = transition(state, Event::Assembled);
        assert_eq!(
            state,
            State::Storing {
                fallback_used: false
            }
        );
        assert!(actions.contains(&Action::PersistContent));

        // Storing -> Completed
        let (state, _) = transition(
            state,
            Event::Stored {
                storage_key: "blog-output/20260807-120000/abc.txt".to_string(),
            },
        );
        assert!(matches!(state, State::Completed { .. }));
    }

    #[test]
    fn test_fallback_happens_at_most_once() {
        let (state, _) = transition(State::Validating, Event::Validated);

        // First loss demotes to direct and discards partial artifacts
        let (state, actions) = transition(state, lost());
        assert_eq!(
            state,
            State::Orchestrating {
                mode: BackendMode::Direct,
                fallback_used: true
            }
        );
        assert!(actions.contains(&Action::DiscardArtifacts));
        assert!(actions.contains(&Action::RunStages {
            mode: BackendMode::Direct
        }));

        // Second loss is terminal
        let (state, _) = transition(state, lost());
        assert!(matches!(state, State::Failed { .. }));
    }

    #[test]
    fn test_stage_failure_is_terminal_in_either_mode() {
        let (multi, _) = transition(State::Validating, Event::Validated);
        let (state, _) = transition(
            multi.clone(),
            Event::StageFailed {
                reason: "writer stage rejected".to_string(),
            },
        );
        assert!(matches!(state, State::Failed { .. }));

        let (direct, _) = transition(multi, lost());
        let (state, _) = transition(
            direct,
            Event::StageFailed {
                reason: "editor stage exhausted retries".to_string(),
            },
        );
        if let State::Failed { error } = state {
            assert!(error.contains("editor stage"));
        } else {
            panic!("expected Failed state");
        }
    }

    #[test]
    fn test_validation_rejection_fails_without_side_effects() {
        let (state, actions) = transition(
            State::Validating,
            Event::ValidationRejected {
                reason: "missing topic".to_string(),
            },
        );
        assert!(matches!(state, State::Failed { .. }));
        // Only logging - no RunStages, no AssembleContent, no PersistContent
        assert!(actions
            .iter()
            .all(|a| matches!(a, Action::LogActivity { .. })));
    }

    #[test]
    fn test_fallback_mode_survives_into_assembly_and_storage() {
        let (state, _) = transition(State::Validating, Event::Validated);
        let (state, _) = transition(state, lost());
        let (state, _) = transition(state, Event::ArtifactsReady);
        assert_eq!(
            state,
            State::Assembling {
                mode: BackendMode::Direct,
                fallback_used: true
            }
        );

        let (state, _) = transition(state, Event::Assembled);
        assert_eq!(
            state,
            State::Storing {
                fallback_used: true
            }
        );
    }

    #[test]
    fn test_assembly_and_storage_failures_are_terminal() {
        let assembling = State::Assembling {
            mode: BackendMode::MultiAgent,
            fallback_used: false,
        };
        let (state, _) = transition(
            assembling,
            Event::AssemblyFailed {
                reason: "missing writer artifact".to_string(),
            },
        );
        assert!(matches!(state, State::Failed { .. }));

        let storing = State::Storing {
            fallback_used: false,
        };
        let (state, _) = transition(
            storing,
            Event::StorageFailed {
                reason: "bucket unreachable".to_string(),
            },
        );
        if let State::Failed { error } = state {
            assert!(error.contains("bucket unreachable"));
        } else {
            panic!("expected Failed state");
        }
    }

    #[test]
    fn test_deadline_expires_from_any_active_state() {
        let expired = |reason: &str| Event::DeadlineExpired {
            reason: reason.to_string(),
        };

        for active in [
            State::Validating,
            State::Orchestrating {
                mode: BackendMode::MultiAgent,
                fallback_used: false,
            },
            State::Assembling {
                mode: BackendMode::Direct,
                fallback_used: true,
            },
            State::Storing {
                fallback_used: false,
            },
        ] {
            let (state, _) = transition(active, expired("budget exhausted"));
            assert!(matches!(state, State::Failed { .. }));
        }
    }

    #[test]
    fn test_invalid_transition_never_panics() {
        // ArtifactsReady before validation
        let (state, _) = transition(State::Validating, Event::ArtifactsReady);
        assert!(matches!(state, State::Failed { .. }));

        // Stored while orchestrating
        let (state, _) = transition(
            State::Orchestrating {
                mode: BackendMode::MultiAgent,
                fallback_used: false,
            },
            Event::Stored {
                storage_key: "k".to_string(),
            },
        );
        assert!(matches!(state, State::Failed { .. }));
    }

    #[test]
    fn test_terminal_states_reject_all_events() {
        let completed = State::Completed {
            storage_key: "blog-output/x.txt".to_string(),
        };
        let (state, actions) = transition(completed, Event::Validated);
        assert!(matches!(state, State::Failed { .. }));
        assert!(actions.is_empty());

        let failed = State::Failed {
            error: "original error".to_string(),
        };
        let (state, _) = transition(failed, Event::Assembled);
        if let State::Failed { error } = state {
            assert!(error.contains("original error"));
        } else {
            panic!("expected Failed state");
        }
    }
}
