//! Cheap local screening that decides whether a raw string is worth a call to
//! the extraction service.

use crate::pattern::{DIGIT_RUN, HTML_TAG, MONTH, YEAR};

pub const MIN_CHARS: usize = 10;
pub const MAX_CHARS: usize = 400;

/// True when `raw` is both shaped like a conference citation and plausibly
/// carries a date fragment.
pub fn should_extract(raw: Option<&str>) -> bool {
    looks_like_conference(raw) && mentions_date(raw)
}

/// Rejects absent, too short, too long, HTML-laden or digit-noise strings.
pub fn looks_like_conference(raw: Option<&str>) -> bool {
    let Some(raw) = raw else {
        return false;
    };
    let text = raw.trim();
    let len = text.chars().count();
    if !(MIN_CHARS..=MAX_CHARS).contains(&len) {
        return false;
    }
    !HTML_TAG.is_match(text) && !DIGIT_RUN.is_match(text)
}

pub fn mentions_date(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => YEAR.is_match(text) || MONTH.is_match(text),
        _ => false,
    }
}
