//! Core type definitions for the Blogsmith pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Backend invocation strategy for a request
///
/// Selected once per request by the controller. After a demotion to
/// `Direct`, every remaining call in the request uses `Direct` so the final
/// document is never authored by two reasoning strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    #[default]
    MultiAgent,
    Direct,
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultiAgent => write!(f, "multi_agent"),
            Self::Direct => write!(f, "direct"),
        }
    }
}

impl std::str::FromStr for BackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multi_agent" | "multiagent" | "multi-agent" => Ok(Self::MultiAgent),
            "direct" => Ok(Self::Direct),
            _ => Err(format!("Invalid backend mode: {}", s)),
        }
    }
}

/// Pipeline roles in fixed execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Researcher,
    Outliner,
    Writer,
    Editor,
}

impl Role {
    /// All roles in pipeline stage order
    pub const PIPELINE: [Role; 4] = [Role::Researcher, Role::Outliner, Role::Writer, Role::Editor];

    /// Ordinal position in the pipeline (0-based)
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Researcher => 0,
            Self::Outliner => 1,
            Self::Writer => 2,
            Self::Editor => 3,
        }
    }

    /// Persona line used when addressing the backend as this role
    pub fn persona(&self) -> &'static str {
        match self {
            Self::Researcher => {
                "a meticulous market research analyst who summarizes credible insights succinctly"
            }
            Self::Outliner => {
                "a content strategist who structures articles for clarity, search intent, and engagement"
            }
            Self::Writer => {
                "a senior copywriter who writes concise, engaging articles with smooth transitions"
            }
            Self::Editor => {
                "a managing editor who is uncompromising on quality and delivers publication-ready content"
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Researcher => write!(f, "researcher"),
            Self::Outliner => write!(f, "outliner"),
            Self::Writer => write!(f, "writer"),
            Self::Editor => write!(f, "editor"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "researcher" => Ok(Self::Researcher),
            "outliner" => Ok(Self::Outliner),
            "writer" => Ok(Self::Writer),
            "editor" => Ok(Self::Editor),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Closed set of article tones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Conversational,
    Authoritative,
    Playful,
    Technical,
}

impl Tone {
    /// Phrase used inside prompts
    pub fn descriptor(&self) -> &'static str {
        match self {
            Self::Professional => "professional and polished",
            Self::Conversational => "conversational and approachable",
            Self::Authoritative => "authoritative and confident",
            Self::Playful => "playful and lighthearted",
            Self::Technical => "technical and precise",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Professional => write!(f, "professional"),
            Self::Conversational => write!(f, "conversational"),
            Self::Authoritative => write!(f, "authoritative"),
            Self::Playful => write!(f, "playful"),
            Self::Technical => write!(f, "technical"),
        }
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "professional" => Ok(Self::Professional),
            "conversational" => Ok(Self::Conversational),
            "authoritative" => Ok(Self::Authoritative),
            "playful" => Ok(Self::Playful),
            "technical" => Ok(Self::Technical),
            _ => Err(format!(
                "Invalid tone: {}. Use professional, conversational, authoritative, playful, or technical.",
                s
            )),
        }
    }
}

/// Raw, unvalidated content request as received from the caller
///
/// Mirrors the entry payload: only `topic` is required, everything else has
/// a documented default applied during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawContentRequest {
    pub topic: Option<String>,
    pub brand: Option<String>,
    pub audience: Option<String>,
    pub tone: Option<String>,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    pub target_word_count: Option<usize>,
}

/// Validated, immutable content request
///
/// Constructed only by the validator; fields are never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    pub topic: String,
    pub brand: String,
    pub audience: String,
    pub tone: Tone,
    pub seo_keywords: BTreeSet<String>,
    pub target_word_count: usize,
    pub request_id: Uuid,
}

/// Text output of one pipeline stage
///
/// Owned by the orchestrator invocation that created it; later stages only
/// ever borrow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentArtifact {
    pub role: Role,
    pub content: String,
    pub word_count: usize,
    pub ordinal: usize,
    pub created_at: DateTime<Utc>,
}

impl AgentArtifact {
    pub fn new(role: Role, content: String) -> Self {
        let word_count = count_words(&content);
        Self {
            role,
            content,
            word_count,
            ordinal: role.ordinal(),
            created_at: Utc::now(),
        }
    }
}

/// Final result of a successful pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub content: String,
    pub word_count: usize,
    pub fallback_used: bool,
    pub backend: BackendMode,
    pub storage_key: String,
    pub request_id: Uuid,
}

/// Terminal failure aggregate, carrying partial work for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineFailure {
    /// Stable machine-readable kind (see `BlogsmithError::kind`)
    pub error_kind: String,
    pub message: String,
    /// Artifacts produced before the failure, in stage order
    pub artifacts: Vec<AgentArtifact>,
    /// Assembled content, when generation succeeded but persistence did not
    pub content: Option<String>,
    pub request_id: Option<Uuid>,
}

/// Count whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_pipeline_order() {
        let ordinals: Vec<usize> = Role::PIPELINE.iter().map(|r| r.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
        assert_eq!(Role::PIPELINE[0], Role::Researcher);
        assert_eq!(Role::PIPELINE[3], Role::Editor);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("writer".parse::<Role>().unwrap(), Role::Writer);
        assert_eq!("EDITOR".parse::<Role>().unwrap(), Role::Editor);
        assert!("producer".parse::<Role>().is_err());
    }

    #[test]
    fn test_tone_from_str() {
        assert_eq!("professional".parse::<Tone>().unwrap(), Tone::Professional);
        assert_eq!("Playful".parse::<Tone>().unwrap(), Tone::Playful);
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn test_tone_default() {
        assert_eq!(Tone::default(), Tone::Professional);
    }

    #[test]
    fn test_backend_mode_display_roundtrip() {
        assert_eq!(BackendMode::MultiAgent.to_string(), "multi_agent");
        assert_eq!("multi_agent".parse::<BackendMode>().unwrap(), BackendMode::MultiAgent);
        assert_eq!("direct".parse::<BackendMode>().unwrap(), BackendMode::Direct);
    }

    #[test]
    fn test_artifact_derives_word_count_and_ordinal() {
        let artifact = AgentArtifact::new(Role::Writer, "one two three four".to_string());
        assert_eq!(artifact.word_count, 4);
        assert_eq!(artifact.ordinal, 2);
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  spaced   out\n\twords "), 3);
    }
}
