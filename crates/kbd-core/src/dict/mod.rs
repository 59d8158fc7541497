//! Word sources consulted by the suggestion engine.
//!
//! Every source implements `Dictionary`: given the composer it reports
//! candidates through a `WordCallback`. Sources backed by external storage
//! reload in the background (see `reload`) and answer empty meanwhile.

mod auto;
mod contacts;
mod expandable;
mod reload;
mod smart;
mod source;
#[cfg(test)]
mod tests;
mod user;

pub use auto::{AutoAddOutcome, AutoDictionary};
pub use contacts::{tokenize_name, ContactSource, ContactsDictionary};
pub use expandable::ExpandableDictionary;
pub use reload::{ReloadState, ReloadableDictionary, WordSource};
pub use smart::SmartDictionary;
pub use source::{parse_word_list, StaticWords, WordListFile};
pub use user::{UserDictionary, UserWordSink};

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::autotext::{AutoText, CustomAutoText};
use crate::composer::WordComposer;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("source unavailable: {0}")]
    Source(String),
}

/// Receives candidates from a dictionary.
pub trait WordCallback {
    /// Offer one candidate. Returns `false` to stop the enumeration early.
    fn add_word(&mut self, word: &[char], freq: i32) -> bool;
}

impl<F> WordCallback for F
where
    F: FnMut(&[char], i32) -> bool,
{
    fn add_word(&mut self, word: &[char], freq: i32) -> bool {
        self(word, freq)
    }
}

pub trait Dictionary: Send + Sync {
    /// Report every candidate for `composer`. Dictionaries that are
    /// reloading report nothing.
    fn get_words(
        &self,
        composer: &WordComposer,
        callback: &mut dyn WordCallback,
        t9: bool,
        next_letters: &mut NextLetterFrequencies,
    );

    /// Membership test, independent of any composition.
    fn is_valid_word(&self, word: &str) -> bool;
}

/// Per-call counters of which letter follows the typed prefix in the
/// completions found. Codes beyond the table size are not counted.
#[derive(Debug, Clone)]
pub struct NextLetterFrequencies {
    counts: Vec<u32>,
}

impl NextLetterFrequencies {
    pub fn new(size: usize) -> Self {
        Self {
            counts: vec![0; size],
        }
    }

    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    pub fn register(&mut self, c: char) {
        if let Some(slot) = self.counts.get_mut(c as usize) {
            *slot += 1;
        }
    }

    pub fn get(&self, c: char) -> u32 {
        self.counts.get(c as usize).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Provenance of a word source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictionaryRole {
    Main,
    User,
    Contacts,
    Auto,
    Smart,
    AutoText,
}

impl fmt::Display for DictionaryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DictionaryRole::Main => "main",
            DictionaryRole::User => "user",
            DictionaryRole::Contacts => "contacts",
            DictionaryRole::Auto => "auto",
            DictionaryRole::Smart => "smart",
            DictionaryRole::AutoText => "autotext",
        };
        f.write_str(name)
    }
}

/// Writable source of user-approved words.
pub trait UserWords: Dictionary {
    fn add_word(&self, word: &str, freq: i32);
}

/// Per-word pick counts.
pub trait UsageCounts: Send + Sync {
    /// Count for `word`, 0 when unknown or unavailable.
    fn word_count(&self, word: &str) -> i32;
    /// Record one more pick. Never blocks on storage.
    fn increase_word_count(&self, word: &str);
}

/// The word sources an engine consults, one slot per role. Every slot is
/// optional; an engine with none still returns the typed word.
#[derive(Clone, Default)]
pub struct Dictionaries {
    pub main: Option<Arc<dyn Dictionary>>,
    pub user: Option<Arc<dyn UserWords>>,
    pub contacts: Option<Arc<dyn Dictionary>>,
    pub auto: Option<Arc<dyn Dictionary>>,
    pub smart: Option<Arc<dyn UsageCounts>>,
    pub auto_text: Option<Arc<dyn AutoText>>,
    pub custom_auto_text: Option<Arc<CustomAutoText>>,
}

impl Dictionaries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_main(mut self, dict: Arc<dyn Dictionary>) -> Self {
        self.main = Some(dict);
        self
    }

    pub fn with_user(mut self, dict: Arc<dyn UserWords>) -> Self {
        self.user = Some(dict);
        self
    }

    pub fn with_contacts(mut self, dict: Arc<dyn Dictionary>) -> Self {
        self.contacts = Some(dict);
        self
    }

    pub fn with_auto(mut self, dict: Arc<dyn Dictionary>) -> Self {
        self.auto = Some(dict);
        self
    }

    pub fn with_smart(mut self, counts: Arc<dyn UsageCounts>) -> Self {
        self.smart = Some(counts);
        self
    }

    pub fn with_auto_text(mut self, table: Arc<dyn AutoText>) -> Self {
        self.auto_text = Some(table);
        self
    }

    pub fn with_custom_auto_text(mut self, table: Arc<CustomAutoText>) -> Self {
        self.custom_auto_text = Some(table);
        self
    }

    /// Roles that currently have a source.
    pub fn roles(&self) -> Vec<DictionaryRole> {
        let mut roles = Vec::new();
        if self.main.is_some() {
            roles.push(DictionaryRole::Main);
        }
        if self.user.is_some() {
            roles.push(DictionaryRole::User);
        }
        if self.contacts.is_some() {
            roles.push(DictionaryRole::Contacts);
        }
        if self.auto.is_some() {
            roles.push(DictionaryRole::Auto);
        }
        if self.smart.is_some() {
            roles.push(DictionaryRole::Smart);
        }
        if self.auto_text.is_some() || self.custom_auto_text.is_some() {
            roles.push(DictionaryRole::AutoText);
        }
        roles
    }
}
