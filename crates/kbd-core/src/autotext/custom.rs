use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use tracing::debug;

use super::macros::expand_macros;
use crate::dict::WordCallback;
use crate::settings::settings;
use crate::unicode;

/// User-defined shortcuts. One key may expand to several values.
#[derive(Default)]
pub struct CustomAutoText {
    entries: RwLock<HashMap<String, Vec<String>>>,
    typed_word_valid: AtomicBool,
}

impl CustomAutoText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let table = Self::new();
        table.replace_entries(entries);
        table
    }

    /// Swap in a fresh set of shortcuts.
    pub fn replace_entries<I, K, V>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in entries {
            map.entry(unicode::lower_str(key.as_ref()))
                .or_default()
                .push(value.into());
        }
        debug!(keys = map.len(), "custom autotext loaded");
        *self.entries.write().unwrap() = map;
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Report every expansion of `typed_lower`. Returns whether the key
    /// exists.
    pub fn get_words(&self, typed_lower: &str, callback: &mut dyn WordCallback) -> bool {
        self.typed_word_valid.store(false, Ordering::Relaxed);
        let entries = self.entries.read().unwrap();
        let Some(values) = entries.get(typed_lower) else {
            return false;
        };
        let len = typed_lower.chars().count() as i32;
        let freq = settings().autotext.custom_frequency.saturating_mul(len);
        for value in values {
            let expanded: Vec<char> = expand_macros(value).chars().collect();
            callback.add_word(&expanded, freq);
            if value == typed_lower {
                self.typed_word_valid.store(true, Ordering::Relaxed);
            }
        }
        true
    }

    /// Whether the last lookup found a value equal to the typed word.
    pub fn is_typed_word_valid(&self) -> bool {
        self.typed_word_valid.load(Ordering::Relaxed)
    }
}
