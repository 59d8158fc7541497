//! Turns commit events into dictionary updates.

use std::sync::Arc;

use tracing::debug;

use crate::dict::{AutoAddOutcome, AutoDictionary, Dictionary};
use crate::lang::Converter;
use crate::settings::settings;
use crate::suggest::Suggest;
use crate::unicode;

pub struct Learner {
    auto: Arc<AutoDictionary>,
    use_smart: bool,
}

impl Learner {
    pub fn new(auto: Arc<AutoDictionary>) -> Self {
        Self {
            auto,
            use_smart: false,
        }
    }

    pub fn set_use_smart(&mut self, enabled: bool) {
        self.use_smart = enabled;
    }

    pub fn auto_dictionary(&self) -> &Arc<AutoDictionary> {
        &self.auto
    }

    /// The user picked `word` from the suggestion list right after
    /// `engine` produced it.
    pub fn picked_suggestion(&self, word: &str, engine: &Suggest, converter: Option<&dyn Converter>) {
        let key = learning_key(word, converter);
        let auto_text_found = engine.was_auto_text_found();
        // Keep feeding words the auto dictionary already trusts, and pick up
        // ones no dictionary knows.
        let should_learn =
            self.auto.is_valid_word(&key) || !engine.is_valid_word(&key, false, false);
        if should_learn && !auto_text_found {
            self.add_to_auto(&key, settings().learning.frequency_for_picked, engine);
        }
        if self.use_smart && !auto_text_found {
            engine.increase_word_count(&key);
        }
    }

    /// The user committed what they typed without picking a suggestion.
    pub fn typed_word_committed(&self, word: &str, engine: &Suggest, converter: Option<&dyn Converter>) {
        if word.is_empty() {
            return;
        }
        let key = learning_key(word, converter);
        self.add_to_auto(&key, settings().learning.frequency_for_typed, engine);
        if self.use_smart {
            engine.increase_word_count(&key);
        }
    }

    fn add_to_auto(&self, key: &str, freq: i32, engine: &Suggest) {
        if self.auto.add_word(key, freq) == AutoAddOutcome::Promote {
            debug!(word = key, "promoting to user dictionary");
            engine.add_user_word_at(key, settings().learning.frequency_for_auto_add);
        }
    }
}

/// Words are learned lowercased, or in raw key form when a converter is
/// active.
fn learning_key(word: &str, converter: Option<&dyn Converter>) -> String {
    match converter {
        Some(conv) => conv.reverse(word),
        None => unicode::lower_str(word),
    }
}
