use std::sync::Arc;

use super::{engine_with_main, texts, Fixed, MemoryUser};
use crate::composer::WordComposer;
use crate::dict::{Dictionaries, ExpandableDictionary};
use crate::lang::Korean;
use crate::suggest::{CorrectionMode, Suggest};

#[test]
fn test_typed_word_leads_then_frequency_order() {
    let mut engine = engine_with_main(&[("ten", 500), ("the", 9000)]);
    engine.get_suggestions(&WordComposer::from_word("teh"), false, false, None);
    assert_eq!(texts(&engine), vec!["teh", "the", "ten"]);
    assert_eq!(engine.priorities(), vec![0, 9000, 500]);
    // Basic mode without a personal hit makes no correction
    assert!(!engine.has_minimal_correction());
}

#[test]
fn test_ties_prefer_shorter_candidate() {
    let mut engine = engine_with_main(&[("there", 50), ("the", 50)]);
    engine.get_suggestions(&WordComposer::from_word("th"), false, false, None);
    assert_eq!(texts(&engine), vec!["th", "the", "there"]);
}

#[test]
fn test_unrelated_top_candidate_blocks_correction() {
    let mut engine = engine_with_main(&[("xylophonic", 1_000_000)]);
    engine.set_correction_mode(CorrectionMode::Full);
    engine.get_suggestions(&WordComposer::from_word("wrod"), false, false, None);
    assert_eq!(texts(&engine), vec!["wrod", "xylophonic"]);
    assert!(!engine.has_minimal_correction());
}

#[test]
fn test_full_mode_corrects_similar_word() {
    let mut engine = engine_with_main(&[("word", 900)]);
    engine.set_correction_mode(CorrectionMode::Full);
    engine.get_suggestions(&WordComposer::from_word("wrod"), false, false, None);
    assert!(engine.has_minimal_correction());
}

#[test]
fn test_correction_off_returns_nothing() {
    let mut engine = engine_with_main(&[("the", 100)]);
    engine.set_correction_mode(CorrectionMode::None);
    let found = engine.get_suggestions(&WordComposer::from_word("teh"), false, false, None);
    assert!(found.is_empty());
    assert!(!engine.has_minimal_correction());
}

#[test]
fn test_empty_composer() {
    let mut engine = engine_with_main(&[("the", 100)]);
    let found = engine.get_suggestions(&WordComposer::new(), false, false, None);
    assert!(found.is_empty());
}

#[test]
fn test_single_key_skips_dictionaries() {
    let mut engine = engine_with_main(&[("a", 100), ("an", 90)]);
    engine.get_suggestions(&WordComposer::from_word("a"), false, false, None);
    assert_eq!(texts(&engine), vec!["a"]);
}

#[test]
fn test_capacity_drops_the_tail() {
    let words: Vec<(String, i32)> = (1..=20).map(|i| (format!("w{i}"), i * 10)).collect();
    let mut engine = Suggest::new("EN", Dictionaries::new().with_main(Fixed::owned(words)));
    engine.set_max_suggestions(3);
    engine.get_suggestions(&WordComposer::from_word("wx"), false, false, None);
    assert_eq!(texts(&engine), vec!["wx", "w20", "w19"]);

    engine.set_max_suggestions(0);
    assert_eq!(engine.max_suggestions(), 1);
    engine.get_suggestions(&WordComposer::from_word("wx"), false, false, None);
    assert_eq!(texts(&engine), vec!["wx"]);
}

#[test]
fn test_duplicates_removed() {
    let mut engine = engine_with_main(&[("the", 100), ("the", 50), ("teh", 10)]);
    engine.get_suggestions(&WordComposer::from_word("teh"), false, false, None);
    assert_eq!(texts(&engine), vec!["teh", "the"]);
}

#[test]
fn test_case_follows_typed_word() {
    let mut engine = engine_with_main(&[("the", 100)]);
    let mut composer = WordComposer::from_word("Teh");
    composer.set_capitalized(true);
    engine.get_suggestions(&composer, false, false, None);
    assert_eq!(texts(&engine), vec!["Teh", "The"]);

    engine.get_suggestions(&WordComposer::from_word("TEH"), false, false, None);
    assert_eq!(texts(&engine), vec!["TEH", "THE"]);
}

#[test]
fn test_all_caps_uses_full_uppercase_mapping() {
    let mut engine = engine_with_main(&[("straße", 100)]);
    engine.get_suggestions(&WordComposer::from_word("STRA"), false, false, None);
    assert_eq!(texts(&engine), vec!["STRA", "STRASSE"]);
}

#[test]
fn test_capitalized_typed_word_from_dictionary_keeps_its_rank() {
    let mut engine = engine_with_main(&[("xa", 100), ("xb", 90), ("ab", 1)]);
    engine.set_max_suggestions(3);
    let mut composer = WordComposer::from_word("Ab");
    composer.set_capitalized(true);
    engine.get_suggestions(&composer, false, false, None);
    assert_eq!(texts(&engine), vec!["Ab", "Xa", "Xb"]);
    assert_eq!(engine.priorities(), vec![1, 100, 90]);
}

#[test]
fn test_proper_noun_of_typed_word_goes_first() {
    let mut engine = engine_with_main(&[("parish", 500), ("Paris", 100)]);
    engine.get_suggestions(&WordComposer::from_word("paris"), false, false, None);
    assert_eq!(texts(&engine), vec!["paris", "Paris", "parish"]);
    assert_eq!(engine.priorities()[0], 100);
}

#[test]
fn test_personal_hit_on_valid_word_is_a_correction() {
    let user = MemoryUser::new(&[("thx", 100)]);
    let dicts = Dictionaries::new()
        .with_main(Fixed::new(&[("thw", 10)]))
        .with_user(user);
    let mut engine = Suggest::new("EN", dicts);
    engine.get_suggestions(&WordComposer::from_word("thw"), false, false, None);
    assert!(engine.has_minimal_correction());

    let dicts = Dictionaries::new()
        .with_main(Fixed::new(&[("the", 10)]))
        .with_user(MemoryUser::new(&[("thx", 100)]));
    engine.set_dictionaries(dicts);
    engine.get_suggestions(&WordComposer::from_word("thw"), false, false, None);
    assert!(!engine.has_minimal_correction());
}

#[test]
fn test_ideographic_moves_typed_word_last() {
    let mut engine = Suggest::new(
        "ZH",
        Dictionaries::new().with_main(Fixed::new(&[("你好", 10), ("你", 5), ("你", 5)])),
    );
    assert_eq!(engine.max_suggestions(), 500);
    // A single key is enough to query
    engine.get_suggestions(&WordComposer::from_word("n"), false, false, None);
    assert_eq!(texts(&engine), vec!["你好", "你", "你", "n"]);
}

#[test]
fn test_language_switch_resizes() {
    let mut engine = engine_with_main(&[]);
    assert_eq!(engine.max_suggestions(), 12);
    engine.set_language("JP");
    assert_eq!(engine.language(), "JP");
    assert_eq!(engine.max_suggestions(), 500);
    engine.set_language("EN");
    assert_eq!(engine.max_suggestions(), 12);
}

#[test]
fn test_converter_renders_candidates() {
    let korean = Korean::new();
    let mut engine = engine_with_main(&[("ㅎㅏㄴㄱㅡㄹ", 100)]);
    let mut composer = WordComposer::from_word("ㅎㅏㄴ");
    composer.convert_word(Some(&korean));
    engine.get_suggestions(&composer, false, false, Some(&korean));
    assert_eq!(texts(&engine), vec!["한", "한글"]);
}

#[test]
fn test_next_letters_from_trie() {
    let main = ExpandableDictionary::from_words([("the", 100), ("then", 50), ("this", 10)]);
    let mut engine = Suggest::new("EN", Dictionaries::new().with_main(Arc::new(main)));
    engine.get_suggestions(&WordComposer::from_word("th"), false, false, None);
    assert_eq!(texts(&engine), vec!["th", "the", "then", "this"]);
    assert_eq!(engine.next_letter_frequencies().get('e'), 2);
    assert_eq!(engine.next_letter_frequencies().get('i'), 1);

    // Cleared by the next call
    engine.get_suggestions(&WordComposer::from_word("xq"), false, false, None);
    assert_eq!(engine.next_letter_frequencies().get('e'), 0);
}

#[test]
fn test_validity_across_dictionaries() {
    let user = MemoryUser::new(&[("zorp", 100)]);
    let dicts = Dictionaries::new()
        .with_main(Fixed::new(&[("the", 10)]))
        .with_user(user.clone());
    let engine = Suggest::new("EN", dicts);
    assert!(engine.is_valid_word("the", false, false));
    assert!(engine.is_valid_word("zorp", false, false));
    assert!(!engine.is_valid_word("blorb", false, false));
    assert!(!engine.is_valid_word("", false, false));

    engine.add_user_word("zorp");
    engine.add_user_word("blorb");
    let added: Vec<String> = user.words.lock().unwrap().iter().map(|(w, _)| w.clone()).collect();
    assert_eq!(added, vec!["zorp", "blorb"]);
    assert_eq!(user.words.lock().unwrap()[1].1, 128);
}
