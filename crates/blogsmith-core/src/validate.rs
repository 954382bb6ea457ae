//! Request validation
//!
//! Normalizes a raw payload into an immutable `ContentRequest`. Rejection
//! happens here, before any backend or storage component is touched; this
//! module performs no I/O.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::error::{BlogsmithError, Result};
use crate::types::{ContentRequest, RawContentRequest, Tone};

const DEFAULT_BRAND: &str = "our brand";
const DEFAULT_AUDIENCE: &str = "a general business audience";
const DEFAULT_WORD_COUNT: usize = 700;

/// Validate a raw request and assign its request id
///
/// Only `topic` is strictly required. `brand`, `audience`, `tone`, and
/// `target_word_count` default when absent, but a present-and-invalid value
/// (unknown tone, zero word count) is still rejected.
pub fn validate(raw: RawContentRequest) -> Result<ContentRequest> {
    let topic = match raw.topic {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        Some(_) => {
            return Err(BlogsmithError::Validation("topic must not be empty".to_string()));
        }
        None => {
            return Err(BlogsmithError::Validation("missing required field: topic".to_string()));
        }
    };

    let tone = match raw.tone {
        Some(t) => t
            .parse::<Tone>()
            .map_err(BlogsmithError::Validation)?,
        None => Tone::default(),
    };

    let target_word_count = match raw.target_word_count {
        Some(0) => {
            return Err(BlogsmithError::Validation(
                "target_word_count must be positive".to_string(),
            ));
        }
        Some(n) => n,
        None => DEFAULT_WORD_COUNT,
    };

    let brand = raw
        .brand
        .filter(|b| !b.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BRAND.to_string());
    let audience = raw
        .audience
        .filter(|a| !a.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_AUDIENCE.to_string());

    // Trim entries and drop empties; the set collapses duplicates.
    let seo_keywords: BTreeSet<String> = raw
        .seo_keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    Ok(ContentRequest {
        topic,
        brand,
        audience,
        tone,
        seo_keywords,
        target_word_count,
        request_id: Uuid::new_v4(),
    })
}
