use super::is_all_upper;

/// Re-case a place that arrived in ALL CAPS; anything else is trusted as is.
///
/// Mixed-case input is returned trimmed but otherwise untouched, so
/// diacritics supplied by the extraction service are never second-guessed.
pub fn normalize_place(place: &str) -> String {
    if place.is_empty() {
        return String::new();
    }
    let text = place.trim();
    let letters: String = text.chars().filter(|c| c.is_alphabetic()).collect();
    if !letters.is_empty() && is_all_upper(&letters) {
        title_words(&text.to_lowercase())
    } else {
        text.to_string()
    }
}

/// Uppercase the first letter of every run of letters.
fn title_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.push(ch);
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}
