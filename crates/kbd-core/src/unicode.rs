//! Character-level case folding and script helpers.
//!
//! Candidates are compared one char at a time, so these helpers map a char
//! to exactly one char. Multi-char case mappings (e.g. `ß` → `SS`) keep
//! their first char, which keeps texts length-aligned for positional
//! comparisons.

pub fn to_lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Single-char uppercase for keystrokes. Display text goes through
/// `str::to_uppercase` so multi-char mappings survive.
pub fn to_upper(c: char) -> char {
    c.to_uppercase().next().unwrap_or(c)
}

pub fn is_upper(c: char) -> bool {
    c.is_uppercase()
}

/// Lowercase a whole string char-by-char, preserving char count.
pub fn lower_str(s: &str) -> String {
    s.chars().map(to_lower).collect()
}

/// Precomposed Hangul syllables (U+AC00..U+D7A3).
pub fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}
