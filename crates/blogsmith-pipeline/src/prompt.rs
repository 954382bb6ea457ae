//! Prompt builders for pipeline stages
//!
//! Each stage prompt carries the request brief plus the artifacts of every
//! prior stage, so a stage never depends on backend-side conversation state.

use blogsmith_core::{AgentArtifact, ContentRequest, Role};

/// Build the prompt for a pipeline stage
pub fn build_role_prompt(
    role: Role,
    request: &ContentRequest,
    prior: &[AgentArtifact],
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&brief_section(request));
    push_prior_work(&mut prompt, prior);

    match role {
        Role::Researcher => push_research_task(&mut prompt, request),
        Role::Outliner => push_outline_task(&mut prompt),
        Role::Writer => push_write_task(&mut prompt, request),
        Role::Editor => push_edit_task(&mut prompt),
    }

    prompt
}

/// Build the one-shot expansion prompt used when the assembled document is
/// under the target length
pub fn build_expansion_prompt(request: &ContentRequest, document: &str, deficit: usize) -> String {
    let mut prompt = String::new();

    prompt.push_str(&brief_section(request));
    prompt.push_str("## DOCUMENT\n\n");
    prompt.push_str(document.trim());
    prompt.push_str("\n\n## TASK\n\n");
    prompt.push_str(&format!(
        "The article above is roughly {} words short of its target length. \
         Write additional prose that deepens its weakest sections, in the same voice. \
         Return only the new paragraphs, no commentary.\n",
        deficit
    ));

    prompt
}

fn brief_section(request: &ContentRequest) -> String {
    let mut section = String::new();

    section.push_str("## BRIEF\n\n");
    section.push_str(&format!("**Topic:** {}\n", request.topic));
    section.push_str(&format!("**Brand:** {}\n", request.brand));
    section.push_str(&format!("**Audience:** {}\n", request.audience));
    section.push_str(&format!("**Tone:** {}\n", request.tone.descriptor()));
    section.push_str(&format!(
        "**Target length:** {} words\n",
        request.target_word_count
    ));

    if request.seo_keywords.is_empty() {
        section.push_str("**SEO keywords:** none provided\n");
    } else {
        let keywords: Vec<&str> = request.seo_keywords.iter().map(String::as_str).collect();
        section.push_str(&format!("**SEO keywords:** {}\n", keywords.join(", ")));
    }
    section.push('\n');

    section
}

fn push_prior_work(prompt: &mut String, prior: &[AgentArtifact]) {
    if prior.is_empty() {
        return;
    }

    prompt.push_str("## PRIOR WORK\n\n");
    for artifact in prior {
        prompt.push_str(&format!("### {} output\n\n", artifact.role));
        prompt.push_str(artifact.content.trim());
        prompt.push_str("\n\n");
    }
}

fn push_research_task(prompt: &mut String, request: &ContentRequest) {
    prompt.push_str("## TASK\n\n");
    prompt.push_str(&format!(
        "Conduct research for a blog article about '{}'.\n\nDeliver:\n",
        request.topic
    ));
    prompt.push_str("- 6-10 bullet points with key insights, stats (with approximate figures), and pain points\n");
    prompt.push_str("- 8-12 SEO keyword ideas (short and long-tail), prioritizing any provided above\n");
    prompt.push_str("- 3-5 proposed angles for the article\n");
}

fn push_outline_task(prompt: &mut String) {
    prompt.push_str("## TASK\n\n");
    prompt.push_str("Create a detailed outline using the research above. Include:\n");
    prompt.push_str("- 1-2 title options\n");
    prompt.push_str("- 5-8 H2 sections (with optional H3s) and bullet notes per section\n");
    prompt.push_str("- An SEO snippet plan (title tag + meta description)\n");
}

fn push_write_task(prompt: &mut String, request: &ContentRequest) {
    prompt.push_str("## TASK\n\n");
    prompt.push_str(&format!(
        "Write a {}-word article based on the outline above. Maintain a {} tone for {}. \
         We are {}. Incorporate the most important keywords naturally and avoid keyword stuffing.\n\n",
        request.target_word_count,
        request.tone.descriptor(),
        request.audience,
        request.brand
    ));
    prompt.push_str(
        "Deliver a cohesive article with an intro, sections per the outline, and a conclusion. \
         No outline or notes, only prose.\n",
    );
}

fn push_edit_task(prompt: &mut String) {
    prompt.push_str("## TASK\n\n");
    prompt.push_str(
        "Revise the drafted article for clarity, correctness, brand voice, and SEO. \
         Ensure factual consistency with the research. \
         Add a short meta description (<= 160 chars) and a closing call to action.\n\n",
    );
    prompt.push_str("Return only the final publication-ready article text.\n");
}
