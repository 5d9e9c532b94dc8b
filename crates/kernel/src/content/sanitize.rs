//! Inbound payload sanitization and validation.
//!
//! Titles are plain text: every tag is stripped and entities are decoded, so
//! `Q&A` is stored as typed. Content keeps the safe HTML subset ammonia
//! allows. Length rules count visible characters after sanitization, so
//! markup such as `<b></b>` never counts towards a minimum.

use std::collections::HashSet;

use crate::error::{AppError, AppResult};
use crate::models::ContentInput;

/// Minimum title length, in characters.
pub const MIN_TITLE_LEN: usize = 3;

/// Minimum content length, in characters.
pub const MIN_CONTENT_LEN: usize = 15;

/// Rounds of strip-and-decode before giving up on a converged result.
const MAX_TEXT_PASSES: usize = 4;

/// Sanitize HTML input using ammonia with default settings.
///
/// Strips dangerous elements like `<script>`, event handlers, and
/// other XSS vectors while preserving safe formatting tags.
pub fn sanitize_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Reduce `input` to its visible text.
///
/// Entity-encoded markup (`&lt;script&gt;`) decodes into tags on one pass
/// and is stripped on the next, so passes repeat until the text is stable.
/// Input that never settles is returned in its escaped form.
pub fn plain_text(input: &str) -> String {
    let mut text = input.to_string();
    for _ in 0..MAX_TEXT_PASSES {
        let decoded = unescape_text(&strip_tags(&text));
        if decoded == text {
            return decoded;
        }
        text = decoded;
    }
    strip_tags(&text)
}

fn strip_tags(input: &str) -> String {
    ammonia::Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(input)
        .to_string()
}

/// Undo the escaping the HTML serializer applies to text nodes.
fn unescape_text(text: &str) -> String {
    // `&amp;` last, so `&amp;lt;` decodes to `&lt;` and not `<`.
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Sanitize every text field of a payload.
pub fn sanitize_input(input: ContentInput) -> ContentInput {
    ContentInput {
        title: plain_text(&input.title),
        content: sanitize_html(&input.content),
    }
}

/// Check required fields and minimum lengths on visible text.
pub fn validate_input(input: &ContentInput) -> AppResult<()> {
    check_field("title", &plain_text(&input.title), MIN_TITLE_LEN)?;
    check_field("content", &plain_text(&input.content), MIN_CONTENT_LEN)?;
    Ok(())
}

/// Sanitize, then validate.
pub fn prepare_input(input: ContentInput) -> AppResult<ContentInput> {
    let input = sanitize_input(input);
    validate_input(&input)?;
    Ok(input)
}

fn check_field(name: &str, value: &str, min_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} is required")));
    }
    if value.chars().count() < min_len {
        return Err(AppError::Validation(format!(
            "{name} must be at least {min_len} characters"
        )));
    }
    Ok(())
}
