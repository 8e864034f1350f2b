//! Canonicalization of the free-form answers customers type into the chat.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static CANONICAL_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+628[0-9]{8,12}$").expect("valid phone pattern"));

static PASSENGER_COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+|\w+)\s*(penumpang|orang)?").expect("valid passenger count pattern")
});

const NUMBER_WORDS: [(&str, u32); 10] = [
    ("satu", 1),
    ("dua", 2),
    ("tiga", 3),
    ("empat", 4),
    ("lima", 5),
    ("enam", 6),
    ("tujuh", 7),
    ("delapan", 8),
    ("sembilan", 9),
    ("sepuluh", 10),
];

/// Rewrites a local or international mobile number to `+628…`.
///
/// Returns `None` unless the rewritten number matches `^\+628[0-9]{8,12}$`.
/// Canonical input comes back unchanged.
pub fn normalize_phone(input: &str) -> Option<String> {
    let compact = WHITESPACE.replace_all(input, "");

    let candidate = if compact.starts_with("08") {
        format!("+62{}", &compact[1..])
    } else if compact.starts_with("+62") {
        compact.into_owned()
    } else {
        format!("+62{}", compact.trim_start_matches('0'))
    };

    CANONICAL_PHONE.is_match(&candidate).then_some(candidate)
}

/// Reads a passenger count written as digits or as an Indonesian number word,
/// optionally followed by `penumpang` or `orang`.
///
/// The range check (1..=10) belongs to the dialogue step; this only parses.
pub fn normalize_passengers(input: &str) -> Option<u32> {
    let lowered = input.trim().to_lowercase();
    let token = PASSENGER_COUNT.captures(&lowered)?.get(1)?.as_str();

    if token.chars().all(|ch| ch.is_ascii_digit()) {
        return token.parse().ok();
    }
    NUMBER_WORDS.iter().find(|(word, _)| *word == token).map(|(_, value)| *value)
}
