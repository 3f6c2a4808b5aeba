//! Deterministic casing rules applied to names and places.

pub mod name;
pub mod place;

pub use name::normalize_name;
pub use place::normalize_place;

/// First character uppercased, the rest lowercased.
pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// True when `word` has at least one cased character and no lowercase one.
pub(crate) fn is_all_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}
