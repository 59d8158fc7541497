mod basic;
mod t9;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::composer::WordComposer;
use crate::dict::{
    Dictionaries, Dictionary, NextLetterFrequencies, UsageCounts, UserWords, WordCallback,
};

use super::Suggest;

/// Reports the same candidates whatever was typed.
pub(super) struct Fixed {
    words: Vec<(String, i32)>,
}

impl Fixed {
    pub(super) fn new(words: &[(&str, i32)]) -> Arc<Self> {
        Arc::new(Self {
            words: words.iter().map(|(w, f)| (w.to_string(), *f)).collect(),
        })
    }

    pub(super) fn owned(words: Vec<(String, i32)>) -> Arc<Self> {
        Arc::new(Self { words })
    }
}

impl Dictionary for Fixed {
    fn get_words(
        &self,
        _composer: &WordComposer,
        callback: &mut dyn WordCallback,
        _t9: bool,
        _next_letters: &mut NextLetterFrequencies,
    ) {
        for (word, freq) in &self.words {
            let chars: Vec<char> = word.chars().collect();
            if !callback.add_word(&chars, *freq) {
                break;
            }
        }
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.words.iter().any(|(w, _)| w == word)
    }
}

/// A writable word list that remembers what was added.
#[derive(Default)]
pub(super) struct MemoryUser {
    pub(super) words: Mutex<Vec<(String, i32)>>,
}

impl MemoryUser {
    pub(super) fn new(words: &[(&str, i32)]) -> Arc<Self> {
        Arc::new(Self {
            words: Mutex::new(words.iter().map(|(w, f)| (w.to_string(), *f)).collect()),
        })
    }
}

impl Dictionary for MemoryUser {
    fn get_words(
        &self,
        _composer: &WordComposer,
        callback: &mut dyn WordCallback,
        _t9: bool,
        _next_letters: &mut NextLetterFrequencies,
    ) {
        let words = self.words.lock().unwrap().clone();
        for (word, freq) in words {
            let chars: Vec<char> = word.chars().collect();
            callback.add_word(&chars, freq);
        }
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.words.lock().unwrap().iter().any(|(w, _)| w == word)
    }
}

impl UserWords for MemoryUser {
    fn add_word(&self, word: &str, freq: i32) {
        self.words.lock().unwrap().push((word.to_string(), freq));
    }
}

#[derive(Default)]
pub(super) struct Counts {
    counts: Mutex<HashMap<String, i32>>,
}

impl Counts {
    pub(super) fn new(counts: &[(&str, i32)]) -> Arc<Self> {
        Arc::new(Self {
            counts: Mutex::new(counts.iter().map(|(w, c)| (w.to_string(), *c)).collect()),
        })
    }
}

impl UsageCounts for Counts {
    fn word_count(&self, word: &str) -> i32 {
        self.counts.lock().unwrap().get(word).copied().unwrap_or(0)
    }

    fn increase_word_count(&self, word: &str) {
        *self.counts.lock().unwrap().entry(word.to_string()).or_default() += 1;
    }
}

pub(super) fn engine_with_main(words: &[(&str, i32)]) -> Suggest {
    Suggest::new("EN", Dictionaries::new().with_main(Fixed::new(words)))
}

pub(super) fn texts(engine: &Suggest) -> Vec<&str> {
    engine.suggestions().iter().map(|c| c.text.as_str()).collect()
}

/// One keystroke per slot; the first char of each slot is the pressed key.
pub(super) fn keys(slots: &[&str]) -> WordComposer {
    let mut composer = WordComposer::new();
    for slot in slots {
        let codes: Vec<char> = slot.chars().collect();
        composer.add(codes[0], codes);
    }
    composer
}
