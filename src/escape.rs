//! Basic Telegram MarkdownV2 escaping.
//!
//! Used by [`crate::Bridge::escape_markdown`] when the runtime cannot
//! produce a result. It knows nothing about markdown structure: every
//! special character is escaped, including ones that were meant as
//! formatting.

/// Characters MarkdownV2 reserves outside of code spans.
pub const MARKDOWN_V2_SPECIALS: &str = "_*[]()~`>#+-=|{}.!";

/// Prefix every MarkdownV2 special character with a backslash.
pub fn escape_basic(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() * 2);
    for ch in input.chars() {
        if MARKDOWN_V2_SPECIALS.contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
