//! The suggestion engine: queries every configured dictionary for the
//! current composition and merges the results into one bounded ranked list,
//! deciding along the way whether the top alternative is safe to apply as
//! an automatic correction.

mod buffer;
mod commonality;
#[cfg(test)]
mod tests;

pub use buffer::Candidate;
pub use commonality::has_sufficient_commonality;

use serde::Deserialize;
use tracing::{debug, debug_span};

use self::buffer::SuggestionBuffer;
use crate::composer::WordComposer;
use crate::dict::{Dictionaries, NextLetterFrequencies, UsageCounts, WordCallback};
use crate::lang::Converter;
use crate::settings::{settings, LanguageProfile};
use crate::unicode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionMode {
    /// No suggestions at all.
    None,
    /// Fix obvious typos only.
    Basic,
    /// Aggressive correction and completion.
    Full,
}

/// Per-call scoring state. Rebuilt by every `get_suggestions`.
#[derive(Debug, Default, Clone, Copy)]
struct Stats {
    typed_freq: i32,
    best_freq: i32,
    best_len_matching_freq: i32,
    have_correction: bool,
    auto_text_found: bool,
    auto_text_typed_word_valid: bool,
}

pub struct Suggest {
    language: String,
    profile: LanguageProfile,
    dictionaries: Dictionaries,
    correction_mode: CorrectionMode,
    use_smart: bool,
    t9_length_priority: bool,
    buffer: SuggestionBuffer,
    next_letters: NextLetterFrequencies,
    scratch: Vec<char>,
    stats: Stats,
}

impl Suggest {
    pub fn new(language: &str, dictionaries: Dictionaries) -> Self {
        let s = settings();
        Self {
            language: language.to_string(),
            profile: s.language(language),
            dictionaries,
            correction_mode: s.suggest.correction_mode,
            use_smart: false,
            t9_length_priority: s.suggest.t9_length_priority,
            buffer: SuggestionBuffer::new(s.max_suggestions_for(language)),
            next_letters: NextLetterFrequencies::new(s.suggest.next_letters_size),
            scratch: Vec::with_capacity(32),
            stats: Stats::default(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Switch language. The capacity follows the new language profile.
    pub fn set_language(&mut self, language: &str) {
        if self.language == language {
            return;
        }
        let s = settings();
        self.language = language.to_string();
        self.profile = s.language(language);
        self.buffer.set_capacity(s.max_suggestions_for(language));
        debug!(language, capacity = self.buffer.capacity(), "language set");
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dictionaries
    }

    pub fn set_dictionaries(&mut self, dictionaries: Dictionaries) {
        self.dictionaries = dictionaries;
    }

    pub fn correction_mode(&self) -> CorrectionMode {
        self.correction_mode
    }

    pub fn set_correction_mode(&mut self, mode: CorrectionMode) {
        self.correction_mode = mode;
    }

    pub fn max_suggestions(&self) -> usize {
        self.buffer.capacity()
    }

    /// Values below 1 are raised to 1.
    pub fn set_max_suggestions(&mut self, max: usize) {
        self.buffer.set_capacity(max);
    }

    pub fn use_smart_dictionary(&mut self, enabled: bool) {
        self.use_smart = enabled;
    }

    pub fn set_t9_length_priority(&mut self, enabled: bool) {
        self.t9_length_priority = enabled;
    }

    /// Whether the top alternative of the last call is safe to apply.
    pub fn has_minimal_correction(&self) -> bool {
        self.stats.have_correction
    }

    /// Whether the last call matched a custom autotext shortcut.
    pub fn was_auto_text_found(&self) -> bool {
        self.stats.auto_text_found
    }

    /// Whether the last shortcut match expands to the typed word itself.
    pub fn is_auto_text_typed_word_valid(&self) -> bool {
        self.stats.auto_text_typed_word_valid
    }

    /// Next-letter counts gathered during the last call.
    pub fn next_letter_frequencies(&self) -> &NextLetterFrequencies {
        &self.next_letters
    }

    /// Priorities aligned with the last returned list.
    pub fn priorities(&self) -> Vec<i32> {
        self.buffer.entries().iter().map(|c| c.frequency).collect()
    }

    /// The list built by the last call.
    pub fn suggestions(&self) -> &[Candidate] {
        self.buffer.entries()
    }

    /// Save `word` in the user dictionary unless it is already there.
    pub fn add_user_word(&self, word: &str) {
        self.add_user_word_at(word, settings().learning.user_word_frequency);
    }

    /// Like `add_user_word` with an explicit frequency.
    pub fn add_user_word_at(&self, word: &str, freq: i32) {
        let Some(user) = &self.dictionaries.user else {
            return;
        };
        if !user.is_valid_word(word) {
            user.add_word(word, freq);
        }
    }

    pub fn increase_word_count(&self, word: &str) {
        if let Some(smart) = &self.dictionaries.smart {
            smart.increase_word_count(word);
        }
    }

    /// Rank candidates for `composer`.
    ///
    /// The list starts with the typed word (or, for a single ambiguous T9
    /// key, with the letters of that key), followed by dictionary matches
    /// best first. Autotext expansions are spliced in after the entry they
    /// expand.
    pub fn get_suggestions(
        &mut self,
        composer: &WordComposer,
        t9: bool,
        is_t9_prediction: bool,
        converter: Option<&dyn Converter>,
    ) -> &[Candidate] {
        let _span = debug_span!("get_suggestions", size = composer.size(), t9).entered();
        let s = settings();

        self.buffer.clear();
        self.next_letters.clear();
        self.stats = Stats::default();
        if self.correction_mode == CorrectionMode::None {
            return self.buffer.entries();
        }

        let preprocessed = match converter {
            Some(conv) if t9 => conv.preprocess_t9(composer),
            _ => None,
        };
        let query = preprocessed.as_ref().unwrap_or(composer);

        let original = composer.converted_word().to_string();
        let lower_original = unicode::lower_str(&original);
        let typed: Vec<char> = original.chars().collect();
        let lower_typed: Vec<char> = lower_original.chars().collect();
        let caps = composer.capitalization();
        let word_size = query.size();
        let dicts = self.dictionaries.clone();

        if word_size > 1 || self.profile.always_segment {
            let smart = if self.use_smart && self.profile.smart_dictionary {
                dicts.smart.as_deref()
            } else {
                None
            };
            let mut ranker = Ranker {
                buffer: &mut self.buffer,
                stats: &mut self.stats,
                scratch: &mut self.scratch,
                typed: &typed,
                lower_typed: &lower_typed,
                converter,
                all_caps: caps.all_caps,
                first_cap: caps.first_letter,
                smart,
                smart_on: self.use_smart,
                length_divisor: s.smart.length_divisor,
                t9_length_priority: t9 && self.t9_length_priority,
            };

            let mut personal_hit = false;
            if dicts.user.is_some() || dicts.contacts.is_some() {
                if let Some(user) = &dicts.user {
                    user.get_words(query, &mut ranker, t9, &mut self.next_letters);
                }
                if let Some(contacts) = &dicts.contacts {
                    contacts.get_words(query, &mut ranker, t9, &mut self.next_letters);
                }
                personal_hit = !ranker.buffer.is_empty();
            }
            if let Some(main) = &dicts.main {
                main.get_words(query, &mut ranker, t9, &mut self.next_letters);
            }

            if personal_hit && self.is_valid_word(&original, false, false) {
                self.stats.have_correction = true;
            }
            if self.correction_mode == CorrectionMode::Full && !self.buffer.is_empty() {
                self.stats.have_correction = true;
            }
        }

        let single_letter_t9 = word_size == 1 && t9;
        if single_letter_t9 {
            self.place_single_letter(query, is_t9_prediction);
        } else if !original.is_empty() {
            let mut text = self.buffer.take_text();
            text.push_str(&original);
            self.buffer.insert(0, self.stats.typed_freq, text);
        }

        // Shortcut lookup comes first so the commonality gate can see it.
        let mut shortcuts: Vec<(String, i32)> = Vec::new();
        if let Some(custom) = &dicts.custom_auto_text {
            self.stats.auto_text_found =
                custom.get_words(&lower_original, &mut |w: &[char], f: i32| {
                    let raw: String = w.iter().collect();
                    let text = match converter {
                        Some(conv) => conv.convert(&raw),
                        None => raw,
                    };
                    shortcuts.push((text, f));
                    true
                });
            self.stats.auto_text_typed_word_valid = custom.is_typed_word_valid();
        }

        if !t9
            && self.correction_mode == CorrectionMode::Full
            && self.buffer.len() > 1
            && !has_sufficient_commonality(&lower_original, self.buffer.text(1), &s.commonality)
            && !self.stats.auto_text_found
        {
            debug!(top = self.buffer.text(1), "commonality gate failed");
            self.stats.have_correction = false;
        }

        self.add_auto_text(t9, single_letter_t9);

        for (text, freq) in shortcuts {
            let pos = self.buffer.len().min(1);
            let mut owned = self.buffer.take_text();
            owned.push_str(&text);
            self.buffer.insert(pos, freq, owned);
        }

        if self.profile.ideographic && !self.buffer.is_empty() {
            self.buffer.relocate(0, self.buffer.len() - 1);
        }
        if !self.profile.keep_duplicates {
            self.buffer.dedup();
        }

        debug!(
            count = self.buffer.len(),
            have_correction = self.stats.have_correction,
            "suggestions ready"
        );
        self.buffer.entries()
    }

    /// One ambiguous T9 key: offer its letters directly, then apply the
    /// first matching promotion rule.
    fn place_single_letter(&mut self, composer: &WordComposer, is_t9_prediction: bool) {
        let codes = composer.codes_at(0);
        for (i, &code) in codes.iter().enumerate() {
            let mut text = self.buffer.take_text();
            text.push(code);
            self.buffer.insert(i, 0, text);
        }
        if !is_t9_prediction {
            return;
        }
        let rule = settings()
            .t9_single_letter
            .iter()
            .find(|r| codes.get(r.index).is_some_and(|c| r.codes.contains(c)));
        if let Some(rule) = rule {
            if rule.promote {
                self.buffer.relocate(rule.index, 1);
            }
            self.stats.have_correction = true;
        }
    }

    /// Splice built-in expansions after the candidates they expand.
    fn add_auto_text(&mut self, t9: bool, single_letter_t9: bool) {
        let Some(table) = self.dictionaries.auto_text.clone() else {
            return;
        };
        let s = settings();
        let basic = self.correction_mode == CorrectionMode::Basic;
        let max = if basic && !t9 {
            s.autotext.basic_max_lookups
        } else {
            s.autotext.max_lookups
        };

        let mut i = 0;
        while i < self.buffer.len() && i < max {
            let lower = unicode::lower_str(self.buffer.text(i));
            let Some(expansion) = table.lookup(&lower) else {
                i += 1;
                continue;
            };
            let mut can_add = expansion != self.buffer.text(i);
            if can_add && i + 1 < self.buffer.len() && !basic {
                can_add = expansion != self.buffer.text(i + 1);
            }
            if can_add {
                self.stats.have_correction = !s.is_no_correction_autotext(&expansion);
                let pos = if single_letter_t9 { 1 } else { i + 1 };
                let freq = self.buffer.priority(i);
                let mut text = self.buffer.take_text();
                text.push_str(&expansion);
                self.buffer.insert(pos, freq, text);
                i += 1;
            }
            i += 1;
        }
    }

    /// Whether `word` is known to any dictionary.
    ///
    /// With `check_frequency`, a known word can still be rejected when the
    /// last call found a much more likely alternative: in T9 when the typed
    /// word scored below the best alternative, and with smart weighting
    /// when a user-only word is rarely picked.
    pub fn is_valid_word(&self, word: &str, check_frequency: bool, t9: bool) -> bool {
        if word.is_empty() {
            return false;
        }
        let d = &self.dictionaries;
        let mut valid = d.main.as_ref().is_some_and(|m| m.is_valid_word(word))
            || d.auto.as_ref().is_some_and(|a| a.is_valid_word(word))
            || d.contacts.as_ref().is_some_and(|c| c.is_valid_word(word));
        let mut user_only = false;
        if !valid {
            valid = d.user.as_ref().is_some_and(|u| u.is_valid_word(word));
            user_only = true;
        }

        if valid && check_frequency && self.buffer.len() > 1 {
            let Stats {
                typed_freq,
                best_freq,
                ..
            } = self.stats;
            if t9 {
                let same_len = self.buffer.text(1).chars().count() == word.chars().count();
                if typed_freq < best_freq && (!self.t9_length_priority || same_len) {
                    return false;
                }
            } else if user_only && self.use_smart {
                if let Some(smart) = &d.smart {
                    let smart_settings = &settings().smart;
                    let count = smart.word_count(word);
                    if smart_settings.typed_freq_ratio.saturating_mul(typed_freq) < best_freq
                        && count < smart_settings.min_usage_count
                    {
                        return false;
                    }
                }
            }
        }
        valid
    }
}

/// Length of `word` not counting apostrophes the user did not type at the
/// same position (so "don't" matches a typed "dont").
fn effective_len(word: &[char], typed: &[char]) -> usize {
    let skipped = word
        .iter()
        .zip(typed)
        .filter(|&(&w, &t)| w == '\'' && t != '\'')
        .count();
    word.len() - skipped
}

/// The callback every dictionary reports to during one call.
struct Ranker<'a> {
    buffer: &'a mut SuggestionBuffer,
    stats: &'a mut Stats,
    scratch: &'a mut Vec<char>,
    typed: &'a [char],
    lower_typed: &'a [char],
    converter: Option<&'a dyn Converter>,
    all_caps: bool,
    first_cap: bool,
    /// Usage counts to blend in, when smart weighting applies.
    smart: Option<&'a dyn UsageCounts>,
    smart_on: bool,
    length_divisor: i32,
    t9_length_priority: bool,
}

impl WordCallback for Ranker<'_> {
    fn add_word(&mut self, word: &[char], freq: i32) -> bool {
        if !word.is_empty() {
            self.admit(word, freq);
        }
        // Every dictionary contributes in full.
        true
    }
}

impl Ranker<'_> {
    fn admit(&mut self, raw: &[char], freq: i32) {
        // `scratch` holds the chars the dictionary reported (converted when a
        // converter is active); `text` is what the list shows.
        let mut text = self.buffer.take_text();
        self.scratch.clear();
        let mut orig_lower = None;
        match self.converter {
            Some(conv) => {
                let raw: String = raw.iter().collect();
                text.push_str(&conv.convert(&raw));
                self.scratch.extend(text.chars());
                orig_lower = Some(unicode::lower_str(&raw));
            }
            None => {
                self.scratch.extend_from_slice(raw);
                if self.all_caps {
                    text.extend(raw.iter().flat_map(|c| c.to_uppercase()));
                } else if self.first_cap {
                    text.extend(raw[0].to_uppercase());
                    text.extend(&raw[1..]);
                } else {
                    text.extend(raw);
                }
            }
        }
        if self.scratch.is_empty() {
            self.buffer.give_back(text);
            return;
        }
        let len = self.scratch.len();

        let mut freq = freq;
        if let Some(smart) = self.smart {
            let lower = orig_lower.unwrap_or_else(|| unicode::lower_str(&text));
            let count = smart.word_count(&lower);
            let divisor = self.length_divisor.saturating_mul(len as i32);
            freq = (1 + freq / divisor).saturating_add(count);
        }

        let is_typed = len == self.lower_typed.len()
            && self
                .scratch
                .iter()
                .zip(self.lower_typed)
                .all(|(&c, &t)| unicode::to_lower(c) == t);
        let eff_len = effective_len(&self.scratch[..], self.typed);

        if is_typed {
            self.stats.typed_freq = freq;
        } else {
            if self.t9_length_priority
                && eff_len == self.typed.len()
                && freq > self.stats.best_len_matching_freq
            {
                self.stats.best_len_matching_freq = freq;
                self.stats.best_freq = freq;
            }
            if freq > self.stats.best_freq && self.stats.best_len_matching_freq == 0 {
                self.stats.best_freq = freq;
            }
        }

        let pos = if is_typed && unicode::is_upper(self.scratch[0]) && !self.smart_on {
            // Same word, only the case differs.
            0
        } else if self.t9_length_priority {
            self.t9_position(eff_len == self.typed.len(), freq)
        } else {
            let floor = if self.buffer.is_full() {
                self.buffer.priority(self.buffer.capacity() - 1)
            } else {
                0
            };
            if floor >= freq {
                self.buffer.give_back(text);
                return;
            }
            self.normal_position(freq, len)
        };

        self.buffer.insert(pos, freq, text);
    }

    /// Same-length words outrank the rest; frequency orders within a class.
    fn t9_position(&self, same_length: bool, freq: i32) -> usize {
        let typed_len = self.typed.len();
        let mut pos = 0;
        while pos < self.buffer.len() {
            let cur_freq = self.buffer.priority(pos);
            let cur: Vec<char> = self.buffer.text(pos).chars().collect();
            let cur_len = effective_len(&cur, self.typed);
            if same_length {
                if cur_freq < freq || cur_len != typed_len {
                    break;
                }
            } else if cur_len != typed_len && cur_freq < freq {
                break;
            }
            pos += 1;
        }
        pos
    }

    /// Higher frequency first; the shorter word wins a tie.
    fn normal_position(&self, freq: i32, len: usize) -> usize {
        (0..self.buffer.len())
            .find(|&pos| {
                let cur_freq = self.buffer.priority(pos);
                cur_freq < freq
                    || (cur_freq == freq && len < self.buffer.text(pos).chars().count())
            })
            .unwrap_or(self.buffer.len())
    }
}
