//! crates/notes_core/src/slug.rs
//!
//! Slug derivation and validation. Slugs are the URL-facing identifiers of
//! notes: ASCII letters, digits, underscores and hyphens only.

use regex::Regex;
use std::sync::OnceLock;

/// Upper bound on the length of a stored slug.
pub const MAX_SLUG_LENGTH: usize = 100;

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern is valid"))
}

/// Transliterates `text` to ASCII and turns it into a lowercase,
/// hyphen-joined slug no longer than `MAX_SLUG_LENGTH`.
///
/// `"Текст заголовка"` becomes `"tekst-zagolovka"`.
pub fn slugify(text: &str) -> String {
    let full = ::slug::slugify(text);
    if full.len() <= MAX_SLUG_LENGTH {
        return full;
    }
    // slug output is pure ASCII, so byte slicing is char-safe.
    full[..MAX_SLUG_LENGTH].trim_end_matches('-').to_string()
}

/// Return `true` when `value` is a non-empty slug made of allowed characters.
pub fn is_valid_slug(value: &str) -> bool {
    slug_pattern().is_match(value)
}
