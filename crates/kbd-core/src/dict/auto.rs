//! Words seen often enough to become suggestions before the user saves
//! them explicitly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tracing::debug;

use super::{Dictionary, ExpandableDictionary, NextLetterFrequencies, WordCallback};
use crate::composer::WordComposer;
use crate::settings::settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoAddOutcome {
    /// Too short or too long to track.
    Ignored,
    Added,
    /// Seen often enough to move into the user dictionary.
    Promote,
}

#[derive(Default)]
pub struct AutoDictionary {
    words: RwLock<ExpandableDictionary>,
    auto_add_to_user: AtomicBool,
}

impl AutoDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Promote every word on its first sighting.
    pub fn set_auto_add_to_user(&self, enabled: bool) {
        self.auto_add_to_user.store(enabled, Ordering::Relaxed);
    }

    pub fn word_frequency(&self, word: &str) -> Option<i32> {
        self.words.read().unwrap().word_frequency(word)
    }

    /// Count another sighting of `word` worth `add_freq`.
    pub fn add_word(&self, word: &str, add_freq: i32) -> AutoAddOutcome {
        let learning = &settings().learning;
        let len = word.chars().count();
        if len < 2 || len > learning.max_word_length {
            return AutoAddOutcome::Ignored;
        }
        let mut words = self.words.write().unwrap();
        let freq = match words.word_frequency(word) {
            Some(f) => f.saturating_add(add_freq),
            None => add_freq,
        };
        words.add_word(word, freq);
        let promotion_threshold = learning.frequency_for_picked * learning.auto_promotion_multiplier;
        if self.auto_add_to_user.load(Ordering::Relaxed) || freq > promotion_threshold {
            debug!(word, freq, "auto word promoted");
            AutoAddOutcome::Promote
        } else {
            AutoAddOutcome::Added
        }
    }
}

impl Dictionary for AutoDictionary {
    fn get_words(
        &self,
        composer: &WordComposer,
        callback: &mut dyn WordCallback,
        t9: bool,
        next_letters: &mut NextLetterFrequencies,
    ) {
        self.words
            .read()
            .unwrap()
            .get_words(composer, callback, t9, next_letters);
    }

    /// Only words seen repeatedly count as valid.
    fn is_valid_word(&self, word: &str) -> bool {
        let learning = &settings().learning;
        let threshold = learning.frequency_for_picked * learning.auto_validity_multiplier;
        self.word_frequency(word).is_some_and(|f| f > threshold)
    }
}
