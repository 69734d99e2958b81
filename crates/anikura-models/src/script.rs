//! Script detection for catalog titles.
//!
//! Chinese (Han) characters are the target script: a title that already
//! contains them stays as-is, everything else with translatable symbols
//! is handed to the translation coordinator. The same predicate
//! validates provider output before it is accepted.

/// True when the string contains at least one Han character
/// (U+4E00..=U+9FA5).
pub fn is_chinese(s: &str) -> bool {
    s.chars().any(is_han)
}

/// True when the string contains kana (U+3040..=U+30FF).
pub fn is_japanese(s: &str) -> bool {
    s.chars().any(|c| ('\u{3040}'..='\u{30ff}').contains(&c))
}

/// A title needs translation when it is not already Chinese but carries
/// at least one symbol worth translating: anything that is not Han, not
/// whitespace, and not an ASCII digit.
pub fn needs_translation(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    !is_chinese(s) && s.chars().any(|c| !is_han(c) && !c.is_whitespace() && !c.is_ascii_digit())
}

fn is_han(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}
