//! Node id normalization
//!
//! Every raw label passes through [`normalize_id`] before it is used as a
//! node key, so two spellings that differ only in punctuation or spacing
//! resolve to the same node.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not a word character, whitespace or `-`
///
/// `\w` is Unicode-aware, so combining marks in decomposed text are kept.
static DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());

/// Maximum length of a normalized id, in characters
pub const MAX_ID_CHARS: usize = 100;

/// Normalize a raw label into a node id
///
/// Characters outside the allow-list (word characters including combining
/// marks, `_`, `-`, whitespace) are removed, whitespace runs collapse to a
/// single space, and the result is trimmed and truncated to
/// [`MAX_ID_CHARS`] characters.
///
/// The function is idempotent: `normalize_id(&normalize_id(s)) == normalize_id(s)`.
///
/// # Examples
///
/// ```
/// use cosmograph_domain::normalize_id;
///
/// assert_eq!(normalize_id("Test!@#$Node"), "TestNode");
/// assert_eq!(normalize_id("  Tribal   Council "), "Tribal Council");
/// assert_eq!(normalize_id("TITLE I — DEFINITIONS"), "TITLE I DEFINITIONS");
/// ```
pub fn normalize_id(raw: &str) -> String {
    let kept = DISALLOWED_RE.replace_all(raw, "");

    let collapsed = kept.split_whitespace().collect::<Vec<_>>().join(" ");

    // Truncation can land right after a space
    let truncated: String = collapsed.chars().take(MAX_ID_CHARS).collect();
    truncated.trim_end().to_string()
}
