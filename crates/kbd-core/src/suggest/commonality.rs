use crate::settings::CommonalitySettings;
use crate::unicode::to_lower;

/// Whether `suggestion` looks enough like `original` to replace it
/// automatically. Positions are compared case-insensitively, and a second
/// count tolerates the suggestion having one extra letter.
pub fn has_sufficient_commonality(
    original: &str,
    suggestion: &str,
    settings: &CommonalitySettings,
) -> bool {
    let orig: Vec<char> = original.chars().map(to_lower).collect();
    let sugg: Vec<char> = suggestion.chars().map(to_lower).collect();
    let min_len = orig.len().min(sugg.len());
    if min_len <= settings.always_pass_len {
        return true;
    }

    let mut matching = 0;
    let mut less_matching = 0;
    for i in 0..min_len {
        if orig[i] == sugg[i] {
            matching += 1;
            less_matching += 1;
        } else if i + 1 < sugg.len() && orig[i] == sugg[i + 1] {
            less_matching += 1;
        }
    }
    let matching = matching.max(less_matching);

    if min_len <= settings.short_len {
        matching >= settings.short_min_matches
    } else {
        matching > min_len / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::settings;

    fn common(a: &str, b: &str) -> bool {
        has_sufficient_commonality(a, b, &settings().commonality)
    }

    #[test]
    fn test_short_words_always_pass() {
        assert!(common("ab", "xyz"));
        assert!(common("a", ""));
    }

    #[test]
    fn test_short_words_need_two_matches() {
        assert!(common("teh", "the"));
        assert!(!common("wrod", "completely"));
        assert!(common("wrod", "word"));
    }

    #[test]
    fn test_extra_letter_tolerated() {
        // "helo" vs "hello": h e l match in place, o matches one to the right
        assert!(common("helo", "hello"));
        assert!(common("absolutly", "absolutely"));
    }

    #[test]
    fn test_long_words_need_majority() {
        assert!(!common("abcdefgh", "abcxxxxxxx"));
        assert!(common("abcdefgh", "abcdexxx"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(common("WROD", "word"));
    }
}
