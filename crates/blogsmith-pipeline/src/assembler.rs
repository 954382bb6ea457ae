//! Content assembly and quality enforcement
//!
//! Merges the Writer and Editor artifacts into the final document, then
//! enforces the target length and keyword coverage. Length runs before
//! keyword coverage so sentence-boundary truncation can never remove a
//! keyword the assembler just guaranteed.

use blogsmith_core::{
    count_words, AgentArtifact, BackendMode, BlogsmithError, ContentRequest, PipelineConfig,
    Result, Role,
};
use blogsmith_gateway::ModelGateway;

use crate::prompt;

/// Assembles stage artifacts into the final document
#[derive(Clone)]
pub struct ContentAssembler {
    gateway: ModelGateway,
    tolerance: f64,
}

impl ContentAssembler {
    pub fn new(gateway: ModelGateway, config: &PipelineConfig) -> Self {
        Self {
            gateway,
            tolerance: config.word_count_tolerance,
        }
    }

    /// Merge artifacts and enforce quality constraints
    ///
    /// Issues at most one Editor-role expansion call (through the gateway,
    /// in the request's current backend mode) when the document is under the
    /// tolerance band. A failed expansion leaves the short document in place
    /// rather than failing a run that already produced usable content.
    pub async fn assemble(
        &self,
        artifacts: &[AgentArtifact],
        request: &ContentRequest,
        mode: BackendMode,
    ) -> Result<String> {
        let writer = find_artifact(artifacts, Role::Writer)?;
        let editor = find_artifact(artifacts, Role::Editor)?;

        let mut document = format!("{}\n\n{}", writer.content.trim(), editor.content.trim());

        document = self.enforce_length(document, request, mode).await;
        document = enforce_keywords(document, request);

        Ok(document)
    }

    async fn enforce_length(
        &self,
        document: String,
        request: &ContentRequest,
        mode: BackendMode,
    ) -> String {
        let target = request.target_word_count;
        let slack = (target as f64 * self.tolerance).round() as usize;
        let (low, high) = (target.saturating_sub(slack), target + slack);
        let count = count_words(&document);

        if count > high {
            let truncated = truncate_at_sentence_boundary(&document, target);
            tracing::info!(
                request_id = %request.request_id,
                from = count,
                to = count_words(&truncated),
                target,
                "Truncated document at sentence boundary"
            );
            return truncated;
        }

        if count < low {
            let deficit = target - count;
            let expansion_prompt = prompt::build_expansion_prompt(request, &document, deficit);

            match self.gateway.invoke(Role::Editor, &expansion_prompt, mode).await {
                Ok(extra) => {
                    let mut expanded = document;
                    expanded.push_str("\n\n");
                    expanded.push_str(extra.trim());

                    let new_count = count_words(&expanded);
                    if new_count < low {
                        tracing::warn!(
                            request_id = %request.request_id,
                            words = new_count,
                            low,
                            "Document still under target after the one allowed expansion"
                        );
                    }
                    return expanded;
                }
                Err(e) => {
                    tracing::warn!(
                        request_id = %request.request_id,
                        words = count,
                        "Expansion call failed, keeping short document: {}",
                        e
                    );
                    return document;
                }
            }
        }

        document
    }
}

fn find_artifact(artifacts: &[AgentArtifact], role: Role) -> Result<&AgentArtifact> {
    artifacts
        .iter()
        .find(|a| a.role == role)
        .ok_or_else(|| BlogsmithError::Assembly(format!("Missing {} artifact", role)))
}

/// Append one closing sentence for every keyword absent from the document
///
/// Containment is checked case-insensitively against the whole document.
fn enforce_keywords(mut document: String, request: &ContentRequest) -> String {
    let lowered = document.to_lowercase();

    for keyword in &request.seo_keywords {
        if !lowered.contains(&keyword.to_lowercase()) {
            tracing::debug!(%keyword, "Appending missing keyword clause");
            document.push_str(&format!(
                " Learn more about how {} fits into this picture.",
                keyword
            ));
        }
    }

    document
}

/// Cut the document at the sentence boundary closest to `target` words
fn truncate_at_sentence_boundary(text: &str, target: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return text.to_string();
    }

    let mut cumulative = 0;
    let mut best_idx = 0;
    let mut best_distance = usize::MAX;

    for (i, sentence) in sentences.iter().enumerate() {
        cumulative += count_words(sentence);
        let distance = cumulative.abs_diff(target);
        if distance < best_distance {
            best_distance = distance;
            best_idx = i;
        }
    }

    sentences[..=best_idx].join(" ")
}

/// Split on terminal punctuation, keeping the punctuation with its sentence
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blogsmith_core::{validate, RawContentRequest};
    use blogsmith_gateway::{BackendError, BackendErrorKind, BackendResult, GenerationRequest, TextBackend};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend whose every reply is a fixed-size block of prose
    struct ProseBackend {
        mode: BackendMode,
        words_per_reply: usize,
        fail: bool,
        calls: AtomicUsize,
    }

    impl ProseBackend {
        fn new(mode: BackendMode, words_per_reply: usize) -> Arc<Self> {
            Arc::new(Self {
                mode,
                words_per_reply,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(mode: BackendMode) -> Arc<Self> {
            Arc::new(Self {
                mode,
                words_per_reply: 0,
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextBackend for ProseBackend {
        fn mode(&self) -> BackendMode {
            self.mode
        }

        async fn generate(&self, _request: &GenerationRequest) -> BackendResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BackendError::new(
                    BackendErrorKind::InvalidRequest,
                    "scripted failure",
                ));
            }
            Ok(prose(self.words_per_reply))
        }
    }

    /// Deterministic prose: sentences of eight words each
    fn prose(words: usize) -> String {
        let mut text = String::new();
        for i in 0..words {
            text.push_str("word");
            if (i + 1) % 8 == 0 || i + 1 == words {
                text.push('.');
                text.push(' ');
            } else {
                text.push(' ');
            }
        }
        text.trim_end().to_string()
    }

    fn request_with_target(target: usize, keywords: Vec<&str>) -> ContentRequest {
        validate(RawContentRequest {
            topic: Some("AI in healthcare".to_string()),
            brand: Some("Acme".to_string()),
            audience: Some("CTOs".to_string()),
            tone: Some("professional".to_string()),
            seo_keywords: keywords.into_iter().map(String::from).collect(),
            target_word_count: Some(target),
        })
        .unwrap()
    }

    fn assembler_with(backend: Arc<ProseBackend>) -> ContentAssembler {
        let config = PipelineConfig {
            retry_count: 0,
            per_call_timeout_secs: 5,
            ..PipelineConfig::default()
        };
        let direct = ProseBackend::new(BackendMode::Direct, 10);
        let gateway = ModelGateway::new(backend, direct, &config);
        ContentAssembler::new(gateway, &config)
    }

    fn artifacts(writer_words: usize, editor_words: usize) -> Vec<AgentArtifact> {
        vec![
            AgentArtifact::new(Role::Researcher, prose(40)),
            AgentArtifact::new(Role::Outliner, prose(30)),
            AgentArtifact::new(Role::Writer, prose(writer_words)),
            AgentArtifact::new(Role::Editor, prose(editor_words)),
        ]
    }

    #[tokio::test]
    async fn test_in_band_document_untouched_by_length_pass() {
        let backend = ProseBackend::new(BackendMode::MultiAgent, 100);
        let assembler = assembler_with(backend.clone());
        let request = request_with_target(500, vec![]);

        let document = assembler
            .assemble(&artifacts(250, 250), &request, BackendMode::MultiAgent)
            .await
            .unwrap();

        assert_eq!(count_words(&document), 500);
        // No expansion call was needed
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_over_band_truncated_into_tolerance() {
        let backend = ProseBackend::new(BackendMode::MultiAgent, 100);
        let assembler = assembler_with(backend);
        let request = request_with_target(500, vec![]);

        let document = assembler
            .assemble(&artifacts(500, 400), &request, BackendMode::MultiAgent)
            .await
            .unwrap();

        let words = count_words(&document);
        assert!(words >= 450 && words <= 550, "got {} words", words);
        // Truncation lands on a sentence boundary
        assert!(document.ends_with('.'));
    }

    #[tokio::test]
    async fn test_under_band_gets_one_expansion_call() {
        let backend = ProseBackend::new(BackendMode::MultiAgent, 200);
        let assembler = assembler_with(backend.clone());
        let request = request_with_target(500, vec![]);

        let document = assembler
            .assemble(&artifacts(150, 150), &request, BackendMode::MultiAgent)
            .await
            .unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(count_words(&document), 500);
    }

    #[tokio::test]
    async fn test_failed_expansion_keeps_short_document() {
        let backend = ProseBackend::failing(BackendMode::MultiAgent);
        let assembler = assembler_with(backend.clone());
        let request = request_with_target(500, vec![]);

        let document = assembler
            .assemble(&artifacts(150, 150), &request, BackendMode::MultiAgent)
            .await
            .unwrap();

        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(count_words(&document), 300);
    }

    #[tokio::test]
    async fn test_missing_keywords_appended_case_insensitively() {
        let backend = ProseBackend::new(BackendMode::MultiAgent, 100);
        let assembler = assembler_with(backend);
        let request = request_with_target(500, vec!["AI", "healthcare"]);

        let mut stage_artifacts = artifacts(250, 230);
        // The writer already mentions one keyword, in different case
        stage_artifacts[2] = AgentArtifact::new(
            Role::Writer,
            format!("{} Hospitals adopt ai systems quickly.", prose(244)),
        );

        let document = assembler
            .assemble(&stage_artifacts, &request, BackendMode::MultiAgent)
            .await
            .unwrap();

        let lowered = document.to_lowercase();
        assert!(lowered.contains("ai"));
        assert!(lowered.contains("healthcare"));
        // "AI" was already covered; only "healthcare" is appended
        assert!(!document.contains("how AI fits into this picture"));
        assert!(document.contains("how healthcare fits into this picture"));
    }

    #[tokio::test]
    async fn test_missing_writer_artifact_is_assembly_error() {
        let backend = ProseBackend::new(BackendMode::MultiAgent, 100);
        let assembler = assembler_with(backend);
        let request = request_with_target(500, vec![]);

        let only_editor = vec![AgentArtifact::new(Role::Editor, prose(100))];
        let err = assembler
            .assemble(&only_editor, &request, BackendMode::MultiAgent)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "assembly_error");
    }

    #[test]
    fn test_truncate_picks_nearest_boundary() {
        // Three sentences of 8 words each
        let text = prose(24);
        let truncated = truncate_at_sentence_boundary(&text, 10);
        // 8 words (distance 2) beats 16 words (distance 6)
        assert_eq!(count_words(&truncated), 8);

        let truncated = truncate_at_sentence_boundary(&text, 15);
        assert_eq!(count_words(&truncated), 16);
    }

    #[test]
    fn test_split_sentences_handles_mixed_punctuation() {
        let sentences = split_sentences("One two. Three four! Five six? Seven");
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences[0], "One two.");
        assert_eq!(sentences[3], "Seven");
    }
}
