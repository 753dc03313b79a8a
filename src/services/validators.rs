//! Safety validators applied to generated values before they reach any
//! downstream API call.

use crate::domain::models::Difficulty;

/// Default language when input is missing or malformed.
pub const DEFAULT_LANGUAGE: &str = "en-US";

const MAX_IDENTIFIER_LEN: usize = 128;

/// Whether a generated content identifier is safe to use in subsequent
/// API calls.
///
/// Accepts ASCII alphanumerics plus `-` and `_`, 1..=128 chars. Rejects
/// path-traversal and injection shapes such as `../evil-id` outright.
pub fn is_safe_identifier(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_IDENTIFIER_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validate a BCP-47 language tag, falling back to [`DEFAULT_LANGUAGE`].
///
/// Checks the tag grammar (primary subtag of 2-8 letters, optional 1-8
/// char alphanumeric subtags), not the IANA registry.
pub fn normalize_language(tag: Option<&str>) -> String {
    normalize_language_or(tag, DEFAULT_LANGUAGE)
}

/// Like [`normalize_language`], but with a caller-supplied fallback such
/// as the configured default language. A malformed fallback still lands
/// on [`DEFAULT_LANGUAGE`].
pub fn normalize_language_or(tag: Option<&str>, fallback: &str) -> String {
    match tag {
        Some(tag) if is_valid_language_tag(tag) => tag.to_string(),
        _ if is_valid_language_tag(fallback) => fallback.to_string(),
        _ => DEFAULT_LANGUAGE.to_string(),
    }
}

fn is_valid_language_tag(tag: &str) -> bool {
    let mut subtags = tag.split('-');
    let Some(primary) = subtags.next() else {
        return false;
    };
    if primary.len() < 2 || primary.len() > 8 || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    subtags.all(|sub| {
        !sub.is_empty() && sub.len() <= 8 && sub.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

/// Normalize a free-form difficulty label to the enum. Unknown input maps
/// to Medium.
pub fn normalize_difficulty(raw: Option<&str>) -> Difficulty {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "easy" | "low" | "beginner" => Difficulty::Easy,
            "hard" | "high" | "advanced" | "difficult" => Difficulty::Hard,
            _ => Difficulty::Medium,
        },
        None => Difficulty::Medium,
    }
}

/// E.164: `+` followed by 8..=15 digits, first digit non-zero.
pub fn is_e164(number: &str) -> bool {
    let Some(rest) = number.strip_prefix('+') else {
        return false;
    };
    (8..=15).contains(&rest.len())
        && rest.chars().all(|c| c.is_ascii_digit())
        && !rest.starts_with('0')
}
