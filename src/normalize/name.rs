use super::{capitalize, is_all_upper};

/// Connector words kept lowercase unless they open a segment.
const SMALL_WORDS: &[&str] = &[
    "and", "or", "of", "on", "in", "for", "to", "the", "a", "an", "at", "by", "with",
];

/// Acronyms whose canonical casing cannot be recovered from the source text.
const ACRONYM_OVERRIDES: &[(&str, &str)] = &[("eccomas", "ECCOMAS")];

/// Title-case a conference name.
///
/// Whitespace between words is preserved exactly. Known acronyms take their
/// canonical casing, other all-caps words of two or more characters are kept
/// verbatim, and connector words are lowercased except at the start of a
/// segment. A segment opens at the beginning of the name and after any word
/// containing a colon, so subtitles are capitalized like titles.
pub fn normalize_name(name: &str) -> String {
    let text = name.trim();
    let mut out = String::with_capacity(text.len());
    let mut segment_start = true;

    for token in split_keep_whitespace(text) {
        if token.starts_with(char::is_whitespace) {
            out.push_str(token);
            continue;
        }

        let (word, trailing) = split_leading_word(token);
        out.push_str(&case_word(word, segment_start));
        out.push_str(trailing);

        segment_start = token.contains(':');
    }

    out
}

fn case_word(word: &str, segment_start: bool) -> String {
    let lower = word.to_lowercase();
    if let Some((_, canonical)) = ACRONYM_OVERRIDES.iter().find(|(k, _)| *k == lower) {
        return canonical.to_string();
    }
    if is_all_upper(word) && word.chars().count() > 1 {
        return word.to_string();
    }
    if !segment_start && SMALL_WORDS.contains(&lower.as_str()) {
        return lower;
    }
    capitalize(word)
}

/// Splits into alternating runs of whitespace and non-whitespace.
fn split_keep_whitespace(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (i, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            tokens.push(&text[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Separates the leading alphanumeric run of `token` from whatever follows it.
/// A token that does not open with an alphanumeric character is returned whole.
fn split_leading_word(token: &str) -> (&str, &str) {
    let end = token
        .char_indices()
        .find(|(_, c)| !c.is_alphanumeric())
        .map_or(token.len(), |(i, _)| i);
    if end == 0 {
        (token, "")
    } else {
        token.split_at(end)
    }
}
