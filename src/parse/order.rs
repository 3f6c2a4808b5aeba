use crate::pattern::{ORDINAL_NUMBER, ORDINAL_WORD, ordinal_word_value};

/// Series number of a conference (`5` for "5th International Workshop").
///
/// Numeric ordinals win over spelled-out ones since they are unambiguous.
/// Spelled-out ordinals are only recognised up to "thirtieth".
pub fn extract_order(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }

    if let Some(n) = ORDINAL_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
    {
        return Some(n);
    }

    ORDINAL_WORD
        .find_iter(text)
        .find_map(|m| ordinal_word_value(&m.as_str().to_lowercase()))
}
