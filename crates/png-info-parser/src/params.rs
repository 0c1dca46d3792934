//! Stable Diffusion web UI generation-parameter extraction.
//!
//! The web UI stores everything in a single `parameters` tEXt chunk:
//!
//! ```text
//! <prompt>
//! Negative prompt: <negative prompt>
//! Steps: 20, Sampler: Euler a, CFG scale: 7, Seed: 1234, ...
//! ```
//!
//! Both marker lines are optional. Other tools write separate `prompt` /
//! `negative prompt` chunks, which are used when `parameters` is absent.

use crate::types::*;

/// Split the `tEXt` chunks of an image into prompt, negative prompt,
/// trailing parameters and everything else.
pub fn extract(chunks: &[RawChunk]) -> GenerationInfo {
    let mut info = GenerationInfo::default();

    if let Some(parameters) = chunks.iter().find(|c| c.keyword == PARAMETERS_KEYWORD) {
        let (prompt, negative_prompt, trailing) = split_generation_text(&parameters.text);
        info.prompt = prompt;
        info.negative_prompt = negative_prompt;
        info.trailing_parameters = trailing;
    } else {
        if let Some(c) = find_keyword(chunks, PROMPT_KEYWORD) {
            info.prompt = c.text.clone();
        }
        if let Some(c) = find_keyword(chunks, NEGATIVE_PROMPT_KEYWORD) {
            info.negative_prompt = c.text.clone();
        }
    }

    // Same filter on both paths: a `parameters` chunk is never listed here.
    info.others = chunks
        .iter()
        .filter(|c| !is_generation_keyword(&c.keyword))
        .cloned()
        .collect();

    info
}

fn find_keyword<'a>(chunks: &'a [RawChunk], keyword: &str) -> Option<&'a RawChunk> {
    chunks
        .iter()
        .find(|c| c.keyword.eq_ignore_ascii_case(keyword))
}

/// `parameters` matches exactly, the prompt labels in any case.
fn is_generation_keyword(keyword: &str) -> bool {
    keyword == PARAMETERS_KEYWORD
        || keyword.eq_ignore_ascii_case(PROMPT_KEYWORD)
        || keyword.eq_ignore_ascii_case(NEGATIVE_PROMPT_KEYWORD)
}

/// Returns `(prompt, negative_prompt, trailing_parameters)`.
///
/// A `Steps:` that precedes `Negative prompt:` is not treated as the
/// parameter block; everything after the negative marker is then the
/// negative prompt.
fn split_generation_text(text: &str) -> (String, String, String) {
    let negative = text.find(NEGATIVE_PROMPT_MARKER);
    let steps = text.find(STEPS_MARKER);

    match (negative, steps) {
        (Some(neg), Some(steps)) if steps >= neg + NEGATIVE_PROMPT_MARKER.len() => (
            text[..neg].trim().to_string(),
            text[neg + NEGATIVE_PROMPT_MARKER.len()..steps]
                .trim()
                .to_string(),
            parameter_lines(&text[steps..]),
        ),
        (Some(neg), _) => (
            text[..neg].trim().to_string(),
            text[neg + NEGATIVE_PROMPT_MARKER.len()..].trim().to_string(),
            String::new(),
        ),
        (None, Some(steps)) => (
            text[..steps].trim().to_string(),
            String::new(),
            parameter_lines(&text[steps..]),
        ),
        (None, None) => (text.trim().to_string(), String::new(), String::new()),
    }
}

/// `Steps: 20, Sampler: Euler` → `Steps: 20\nSampler: Euler`.
fn parameter_lines(tail: &str) -> String {
    tail.trim().replace(PARAMETER_SEPARATOR, "\n")
}
