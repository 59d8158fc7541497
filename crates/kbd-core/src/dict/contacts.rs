use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use super::reload::{ReloadState, ReloadableDictionary, WordSource};
use super::{Dictionary, LoadError, NextLetterFrequencies, WordCallback};
use crate::composer::WordComposer;
use crate::settings::settings;

const FREQUENCY_FOR_CONTACTS: i32 = 128;
const MIN_RELOAD_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Supplies contact display names.
pub trait ContactSource: Send + Sync + 'static {
    fn names(&self) -> Result<Vec<String>, LoadError>;
}

impl ContactSource for Vec<String> {
    fn names(&self) -> Result<Vec<String>, LoadError> {
        Ok(self.clone())
    }
}

/// Split a display name into words: a run starts at a letter and goes on
/// through letters, `-` and `'`.
pub fn tokenize_name(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if !c.is_alphabetic() {
            continue;
        }
        let mut word = String::from(c);
        while let Some(&next) = chars.peek() {
            if next.is_alphabetic() || next == '-' || next == '\'' {
                word.push(next);
                chars.next();
            } else {
                break;
            }
        }
        words.push(word);
    }
    words
}

struct ContactWords<S>(S);

impl<S: ContactSource> WordSource for ContactWords<S> {
    fn load(&self) -> Result<Vec<(String, i32)>, LoadError> {
        let max_len = settings().learning.max_word_length;
        let words = self
            .0
            .names()?
            .iter()
            .flat_map(|name| tokenize_name(name))
            .filter(|w| {
                let len = w.chars().count();
                len > 1 && len < max_len
            })
            .map(|w| (w, FREQUENCY_FOR_CONTACTS))
            .collect();
        Ok(words)
    }
}

pub struct ContactsDictionary {
    words: ReloadableDictionary,
    min_reload_interval: Duration,
    last_reload: Mutex<Instant>,
}

impl ContactsDictionary {
    pub fn new(source: impl ContactSource) -> Self {
        Self {
            words: ReloadableDictionary::new("contacts", Arc::new(ContactWords(source))),
            min_reload_interval: MIN_RELOAD_INTERVAL,
            last_reload: Mutex::new(Instant::now()),
        }
    }

    pub fn with_min_reload_interval(mut self, interval: Duration) -> Self {
        self.min_reload_interval = interval;
        self
    }

    /// Contacts changed. Ignored if the last reload was too recent.
    pub fn mark_stale(&self) {
        let mut last = self.last_reload.lock().unwrap();
        if last.elapsed() < self.min_reload_interval {
            debug!("contacts reload throttled");
            return;
        }
        *last = Instant::now();
        self.words.mark_stale();
    }

    pub fn state(&self) -> ReloadState {
        self.words.poll()
    }

    pub fn wait_until_loaded(&self, timeout: Duration) -> bool {
        self.words.wait_until_loaded(timeout)
    }
}

impl Dictionary for ContactsDictionary {
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
