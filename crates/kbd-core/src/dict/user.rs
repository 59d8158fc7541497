//! Words the user taught the keyboard.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::reload::{ReloadState, ReloadableDictionary, WordSource};
use super::{Dictionary, NextLetterFrequencies, UserWords, WordCallback, WordListFile};
use crate::composer::WordComposer;
use crate::settings::settings;

/// Persists words added at runtime.
pub trait UserWordSink: Send + Sync {
    fn persist(&self, word: &str, freq: i32) -> io::Result<()>;
}

impl UserWordSink for WordListFile {
    fn persist(&self, word: &str, freq: i32) -> io::Result<()> {
        if let Some(parent) = self.path().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())?;
        writeln!(file, "{word}\t{freq}")
    }
}

pub struct UserDictionary {
    words: ReloadableDictionary,
    sink: Option<Box<dyn UserWordSink>>,
}

impl UserDictionary {
    pub fn new(source: Arc<dyn WordSource>) -> Self {
        Self {
            words: ReloadableDictionary::new("user", source),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn UserWordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn mark_stale(&self) {
        self.words.mark_stale();
    }

    pub fn state(&self) -> ReloadState {
        self.words.poll()
    }

    pub fn wait_until_loaded(&self, timeout: Duration) -> bool {
        self.words.wait_until_loaded(timeout)
    }

    pub fn word_frequency(&self, word: &str) -> Option<i32> {
        self.words.with_dict(|d| d.word_frequency(word)).flatten()
    }
}

impl UserWords for UserDictionary {
    /// Add in memory and hand the word to the sink. While reloading only
    /// the sink sees it; the reload picks it up from storage.
    fn add_word(&self, word: &str, freq: i32) {
        if word.chars().count() >= settings().learning.max_word_length {
            return;
        }
        if self.words.with_dict_mut(|d| d.add_word(word, freq)).is_none() {
            debug!(word, "user dictionary reloading, in-memory add skipped");
        }
        if let Some(sink) = &self.sink {
            if let Err(e) = sink.persist(word, freq) {
                warn!(word, error = %e, "failed to persist user word");
            }
        }
    }
}

impl Dictionary for UserDictionary {
    fn get_words(
        &self,
        composer: &WordComposer,
        callback: &mut dyn WordCallback,
        t9: bool,
        next_letters: &mut NextLetterFrequencies,
    ) {
        self.words.get_words(composer, callback, t9, next_letters);
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.words.is_valid_word(word)
    }
}
