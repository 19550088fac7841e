use regex::Regex;
use std::sync::LazyLock;

// Only tag-like tokens: "<b>", "</p>", "<br/>". A lone "<" followed by
// non-tag text ("1 < 2") is not a tag and must keep its surroundings.
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("markup tag pattern is valid"));

/// Strips markup from guest-supplied free text and caps its length.
///
/// Tags are removed wholesale, then any stray angle brackets; the result is
/// whitespace-trimmed and truncated on a character boundary.
pub fn sanitize_text(input: &str, max_len: usize) -> String {
    let without_tags = MARKUP_TAG.replace_all(input, "");
    let cleaned: String = without_tags
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect();
    let trimmed = cleaned.trim();

    trimmed.chars().take(max_len).collect()
}

/// Sanitizes an optional field, collapsing empty results to `None`.
pub fn sanitize_optional(input: Option<&str>, max_len: usize) -> Option<String> {
    input
        .map(|s| sanitize_text(s, max_len))
        .filter(|s| !s.is_empty())
}
