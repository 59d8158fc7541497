use super::{engine_with_main, keys, texts};

#[test]
fn test_length_match_outranks_frequency() {
    let mut engine = engine_with_main(&[("catalog", 5000), ("cat", 800)]);
    engine.get_suggestions(&keys(&["bac", "abc", "tuv"]), true, false, None);
    assert_eq!(texts(&engine), vec!["bat", "cat", "catalog"]);
}

#[test]
fn test_frequency_order_without_length_priority() {
    let mut engine = engine_with_main(&[("catalog", 5000), ("cat", 800)]);
    engine.set_t9_length_priority(false);
    engine.get_suggestions(&keys(&["bac", "abc", "tuv"]), true, false, None);
    assert_eq!(texts(&engine), vec!["bat", "catalog", "cat"]);
}

#[test]
fn test_same_length_words_keep_frequency_order() {
    let mut engine = engine_with_main(&[("act", 10), ("catalog", 5000), ("cat", 800)]);
    engine.get_suggestions(&keys(&["abc", "abc", "tuv"]), true, false, None);
    assert_eq!(texts(&engine), vec!["aat", "cat", "act", "catalog"]);
}

#[test]
fn test_typed_word_loses_to_likelier_same_length_word() {
    let mut engine = engine_with_main(&[("cat", 800), ("bat", 100)]);
    engine.get_suggestions(&keys(&["bac", "abc", "tuv"]), true, false, None);
    assert_eq!(texts(&engine), vec!["bat", "cat"]);
    assert!(!engine.is_valid_word("bat", true, true));
    assert!(engine.is_valid_word("bat", false, true));
}

#[test]
fn test_single_key_lists_its_letters() {
    let mut engine = engine_with_main(&[("way", 100)]);
    engine.get_suggestions(&keys(&["wxy"]), true, false, None);
    assert_eq!(texts(&engine), vec!["w", "x", "y"]);
    assert_eq!(engine.priorities(), vec![0, 0, 0]);
    assert!(!engine.has_minimal_correction());
}

#[test]
fn test_single_key_promotion_rule() {
    let mut engine = engine_with_main(&[]);
    engine.get_suggestions(&keys(&["wxy"]), true, true, None);
    assert_eq!(texts(&engine), vec!["w", "y", "x"]);
    assert!(engine.has_minimal_correction());
}

#[test]
fn test_single_key_rule_without_promotion() {
    let mut engine = engine_with_main(&[]);
    engine.get_suggestions(&keys(&["\u{430}\u{441}\u{431}"]), true, true, None);
    assert_eq!(texts(&engine), vec!["\u{430}", "\u{441}", "\u{431}"]);
    assert!(engine.has_minimal_correction());
}
