//! The word being composed.
//!
//! Each keystroke is a slot of candidate chars ordered by likelihood: the
//! pressed key first, then proximity neighbours or the other letters of a
//! multi-tap key. The engine only reads a composer; the input controller
//! owns every mutation.


use crate::lang::Converter;
use crate::unicode;

/// Capitalization derived from what the user typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capitalization {
    /// The word was started with shift held.
    pub first_letter: bool,
    /// Every typed char is uppercase.
    pub all_caps: bool,
    /// Two or more typed chars are uppercase. Used to hold back autocorrect.
    pub mostly_caps: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WordComposer {
    codes: Vec<Vec<char>>,
    typed_word: String,
    /// Set by `convert_word`; cleared whenever the keystrokes change.
    converted_word: Option<String>,
    preferred_word: Option<String>,
    caps_count: usize,
    capitalized: bool,
}

impl WordComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a composer where every keystroke is unambiguous.
    pub fn from_word(word: &str) -> Self {
        let mut composer = Self::new();
        composer.force_typed_word(word);
        composer
    }

    /// Number of keystrokes.
    pub fn size(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Candidate chars of slot `index`, most likely first.
    ///
    /// Panics when `index >= size()`.
    pub fn codes_at(&self, index: usize) -> &[char] {
        &self.codes[index]
    }

    pub fn typed_word(&self) -> &str {
        &self.typed_word
    }

    /// The typed word after transliteration, or the typed word itself when
    /// no converter ran.
    pub fn converted_word(&self) -> &str {
        self.converted_word.as_deref().unwrap_or(&self.typed_word)
    }

    /// The word picked by the user, falling back to the converted word.
    pub fn preferred_word(&self) -> &str {
        self.preferred_word
            .as_deref()
            .unwrap_or_else(|| self.converted_word())
    }

    pub fn set_preferred_word(&mut self, preferred: Option<String>) {
        self.preferred_word = preferred;
    }

    pub fn set_capitalized(&mut self, capitalized: bool) {
        self.capitalized = capitalized;
    }

    pub fn is_capitalized(&self) -> bool {
        self.capitalized
    }

    pub fn is_all_upper_case(&self) -> bool {
        self.caps_count > 0 && self.caps_count == self.size()
    }

    pub fn is_mostly_caps(&self) -> bool {
        self.caps_count > 1
    }

    pub fn capitalization(&self) -> Capitalization {
        Capitalization {
            first_letter: self.is_capitalized(),
            all_caps: self.is_all_upper_case(),
            mostly_caps: self.is_mostly_caps(),
        }
    }

    /// Append a keystroke. `codes` lists the candidates for this slot; an
    /// empty list means the pressed key is the only candidate.
    pub fn add(&mut self, primary: char, mut codes: Vec<char>) {
        if codes.is_empty() {
            codes.push(primary);
        }
        correct_primary_juxtapos(primary, &mut codes);
        self.typed_word.push(primary);
        self.codes.push(codes);
        if unicode::is_upper(primary) {
            self.caps_count += 1;
        }
        self.converted_word = None;
    }

    /// Add a keystroke coming from the keyboard and return the char that
    /// was actually added.
    ///
    /// With `replace` the previous slot is a multi-tap cycle of the same
    /// key: it is dropped first and its case carries over. A shifted first
    /// key marks the word as capitalized.
    pub fn add_character(
        &mut self,
        primary: char,
        codes: Vec<char>,
        replace: bool,
        shifted: bool,
    ) -> char {
        let mut primary = primary;
        if replace {
            if let Some(prev) = self.typed_word.chars().last() {
                if unicode::is_upper(prev) {
                    primary = unicode::to_upper(primary);
                }
                self.delete_last();
            }
        }
        if shifted && self.is_empty() {
            self.set_capitalized(true);
        }
        self.add(primary, codes);
        primary
    }

    /// Remove the last keystroke. No-op on an empty word.
    pub fn delete_last(&mut self) {
        if self.codes.pop().is_none() {
            return;
        }
        if let Some(last) = self.typed_word.pop() {
            if unicode::is_upper(last) {
                self.caps_count = self.caps_count.saturating_sub(1);
            }
        }
        self.converted_word = None;
    }

    /// Replace the keystrokes with `word`, one unambiguous slot per char.
    pub fn force_typed_word(&mut self, word: &str) {
        self.codes.clear();
        self.typed_word.clear();
        self.caps_count = 0;
        self.converted_word = None;
        for c in word.chars() {
            self.add(c, vec![c]);
        }
    }

    /// Run the typed word through `converter`, or drop any previous
    /// conversion when there is none.
    pub fn convert_word(&mut self, converter: Option<&dyn Converter>) {
        self.converted_word = converter.map(|c| c.convert(&self.typed_word));
    }

    /// Start a new word.
    pub fn reset(&mut self) {
        self.codes.clear();
        self.typed_word.clear();
        self.converted_word = None;
        self.preferred_word = None;
        self.caps_count = 0;
        self.capitalized = false;
    }
}

/// The touch may land nearer a neighbour than the key the keyboard decided
/// on; keep the decided key first.
fn correct_primary_juxtapos(primary: char, codes: &mut [char]) {
    if codes.len() < 2 {
        return;
    }
    if codes[0] != primary && codes[1] == primary {
        codes.swap(0, 1);
    }
}
