//! Compiled matchers shared by the gate, the normalizers and the extractors.

use once_cell::sync::Lazy;
use regex::Regex;

/// A four-digit year between 1900 and 2099, on word boundaries.
pub static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// English month names, abbreviated or in full.
pub static MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec|January|February|March|April|June|July|August|September|October|November|December)\b",
    )
    .unwrap()
});

pub static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Six or more consecutive digits: identifiers or OCR noise, never prose.
pub static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{6,}").unwrap());

/// `YYYY[-MM[-DD]]`, optionally followed by `/` and a second date of the same shape.
pub static ISO_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<start>[0-9]{4}(?:-[0-9]{2}(?:-[0-9]{2})?)?)(?:\s*/\s*(?P<end>[0-9]{4}(?:-[0-9]{2}(?:-[0-9]{2})?)?))?$",
    )
    .unwrap()
});

/// Numeric ordinals such as `5th`, `21st` or `3’rd`.
pub static ORDINAL_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([0-9]+)['’]?(st|nd|rd|th)\b").unwrap());

/// Candidate ordinal words, hyphenated compounds included.
pub static ORDINAL_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z-]+").unwrap());

/// Spelled-out ordinals. The table stops at thirty on purpose; larger series
/// numbers are only recognised in numeric form.
pub static ORDINAL_WORDS: &[(&str, u32)] = &[
    ("first", 1),
    ("second", 2),
    ("third", 3),
    ("fourth", 4),
    ("fifth", 5),
    ("sixth", 6),
    ("seventh", 7),
    ("eighth", 8),
    ("ninth", 9),
    ("tenth", 10),
    ("eleventh", 11),
    ("twelfth", 12),
    ("thirteenth", 13),
    ("fourteenth", 14),
    ("fifteenth", 15),
    ("sixteenth", 16),
    ("seventeenth", 17),
    ("eighteenth", 18),
    ("nineteenth", 19),
    ("twentieth", 20),
    ("twenty-first", 21),
    ("twenty-second", 22),
    ("twenty-third", 23),
    ("twenty-fourth", 24),
    ("twenty-fifth", 25),
    ("twenty-sixth", 26),
    ("twenty-seventh", 27),
    ("twenty-eighth", 28),
    ("twenty-ninth", 29),
    ("thirtieth", 30),
];

pub fn ordinal_word_value(word: &str) -> Option<u32> {
    ORDINAL_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, n)| *n)
}
