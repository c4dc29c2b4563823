//! Helpful utilities for working with text.

use htmlentity::entity::{self, ICodedDataTrait};

/// The question appended to a post that does not already end with one.
///
/// Posts that close with a question invite replies, and replies carry far
/// more algorithmic weight than likes, so a missing question is patched
/// rather than let through.
pub const FALLBACK_QUESTION: &str = "Where do you get stuck the most?";

/// Converts HTML entities into their single-character equivalents.
///
/// RSS feeds frequently encode "&" as "&amp;", ">" as "&gt;", and
/// "<" as "&lt;" in item titles and summaries; this function converts
/// those HTML entities into single, human-readable characters.
///
/// Leading and trailing whitespace will also be trimmed from the string.
///
/// # Examples
///
/// ```
/// use threadsmith::text::convert_html_entities;
/// let raw = "Markets &amp; Machines: AI earnings &gt; expectations";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, "Markets & Machines: AI earnings > expectations");
/// ```
///
/// ```
/// use threadsmith::text::convert_html_entities;
/// let raw = "  A Plaintext Headline  ";
/// let converted = convert_html_entities(raw);
/// assert_eq!(converted, "A Plaintext Headline");
/// ```
pub fn convert_html_entities(text: &str) -> String {
    let text = text.trim();
    entity::decode(text.as_bytes())
        .to_string()
        .unwrap_or(text.to_string())
}

/// Truncates a string to at most `max` characters.
///
/// Counts characters, not bytes, so multi-byte text (Japanese posts, emoji)
/// is cut on a character boundary rather than mid-codepoint.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// A short snippet of the given text, at most `max` characters.
///
/// Used when embedding feed summaries into an LLM prompt, where a full
/// article body would crowd out the instructions.
pub fn snippet(text: &str, max: usize) -> String {
    truncate_chars(text, max)
}

/// True if the text contains a question mark, half- or full-width.
pub fn has_question(text: &str) -> bool {
    text.contains('?') || text.contains('？')
}

/// Ensures the text closes with a question, staying within `max` characters.
///
/// If the text already contains a question it is returned unchanged (apart
/// from the character cap). Otherwise the text is shortened enough to make
/// room and [`FALLBACK_QUESTION`] is appended.
pub fn ensure_question(text: &str, max: usize) -> String {
    if has_question(text) {
        return truncate_chars(text, max);
    }
    let reserved = FALLBACK_QUESTION.chars().count() + 2;
    let head = truncate_chars(text, max.saturating_sub(reserved));
    truncate_chars(&format!("{}\n\n{}", head.trim_end(), FALLBACK_QUESTION), max)
}
