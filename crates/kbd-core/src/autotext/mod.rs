//! Shortcut expansion: built-in per-language tables and user shortcuts.

mod config;
mod custom;
mod macros;

pub use config::{parse_autotext_toml, parse_custom_autotext_toml, AutoTextConfigError};
pub use custom::CustomAutoText;
pub use macros::{expand_macros, expand_macros_at};

use std::collections::HashMap;

/// Built-in expansion table of a language.
pub trait AutoText: Send + Sync {
    /// Expansion for a lowercased word.
    fn lookup(&self, word: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct AutoTextTable {
    entries: HashMap<String, String>,
}

impl AutoTextTable {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, AutoTextConfigError> {
        parse_autotext_toml(toml_str).map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AutoTextTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl AutoText for AutoTextTable {
    fn lookup(&self, word: &str) -> Option<String> {
        self.entries.get(word).cloned()
    }
}
