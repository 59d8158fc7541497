//! In-memory char trie with proximity-aware lookup.
//!
//! Used directly as a main dictionary and as the storage behind the
//! user, contacts, auto and smart dictionaries.

use tracing::{debug, debug_span};

use super::{Dictionary, NextLetterFrequencies, WordCallback};
use crate::composer::WordComposer;
use crate::settings::settings;
use crate::unicode;

#[derive(Debug, Clone, Default)]
struct Node {
    code: char,
    frequency: i32,
    terminal: bool,
    children: Vec<Node>,
}

impl Node {
    fn child(&self, c: char) -> Option<&Node> {
        self.children.iter().find(|n| n.code == c)
    }

    fn child_mut(&mut self, c: char) -> Option<&mut Node> {
        self.children.iter_mut().find(|n| n.code == c)
    }

    fn child_or_insert(&mut self, c: char) -> &mut Node {
        let idx = match self.children.iter().position(|n| n.code == c) {
            Some(idx) => idx,
            None => {
                self.children.push(Node {
                    code: c,
                    ..Node::default()
                });
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExpandableDictionary {
    root: Node,
    word_count: usize,
}

impl ExpandableDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: AsRef<str>,
    {
        let mut dict = Self::new();
        for (word, freq) in words {
            dict.add_word(word.as_ref(), freq);
        }
        dict
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    /// Insert `word`, keeping the higher of the stored and given frequency.
    pub fn add_word(&mut self, word: &str, freq: i32) {
        self.insert(word, freq, settings().learning.max_frequency);
    }

    /// Like `add_word` without the `max_frequency` cap, for usage counts.
    pub fn add_word_uncapped(&mut self, word: &str, freq: i32) {
        self.insert(word, freq, i32::MAX);
    }

    fn insert(&mut self, word: &str, freq: i32, cap: i32) {
        if word.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.child_or_insert(c);
        }
        if !node.terminal {
            node.terminal = true;
            self.word_count += 1;
        }
        node.frequency = node.frequency.max(freq).min(cap);
    }

    pub fn word_frequency(&self, word: &str) -> Option<i32> {
        self.find(word).map(|n| n.frequency)
    }

    /// Bump the frequency of an existing word and return the new value.
    /// Not capped.
    pub fn increase_word_frequency(&mut self, word: &str) -> Option<i32> {
        let node = self.find_mut(word)?;
        node.frequency = node.frequency.saturating_add(1);
        Some(node.frequency)
    }

    pub fn clear(&mut self) {
        self.root.children.clear();
        self.word_count = 0;
    }

    /// All stored words with their frequencies, in trie order.
    pub fn words(&self) -> Vec<(String, i32)> {
        fn collect(node: &Node, prefix: &mut String, out: &mut Vec<(String, i32)>) {
            for child in &node.children {
                prefix.push(child.code);
                if child.terminal {
                    out.push((prefix.clone(), child.frequency));
                }
                collect(child, prefix, out);
                prefix.pop();
            }
        }
        let mut out = Vec::with_capacity(self.word_count);
        collect(&self.root, &mut String::new(), &mut out);
        out
    }

    /// Top candidates for the keystroke slots in `codes`, best first.
    ///
    /// `skip_pos` lets one trie level absorb a letter the user did not type.
    pub fn suggestions(
        &self,
        codes: &[&[char]],
        skip_pos: Option<usize>,
        t9: bool,
        next_letters: Option<&mut NextLetterFrequencies>,
    ) -> Vec<(String, i32)> {
        let mut found = Collector::new(settings().dictionary.max_words);
        self.search(codes, skip_pos, t9, next_letters, &mut found);
        found.into_words()
    }

    fn search(
        &self,
        codes: &[&[char]],
        skip_pos: Option<usize>,
        t9: bool,
        next_letters: Option<&mut NextLetterFrequencies>,
        found: &mut Collector,
    ) {
        if codes.is_empty() {
            return;
        }
        let dict = &settings().dictionary;
        let mut search = Search {
            codes,
            skip_pos,
            t9,
            max_depth: codes.len() * dict.max_depth_factor,
            typed_multiplier: dict.typed_letter_multiplier,
            full_multiplier: dict.full_word_multiplier,
            word: Vec::with_capacity(codes.len() * 2),
            next_letters,
            found,
        };
        search.walk(&self.root, 0, false, 1, 0);
    }

    fn find(&self, word: &str) -> Option<&Node> {
        if word.is_empty() {
            return None;
        }
        let mut node = &self.root;
        for c in word.chars() {
            node = node.child(c)?;
        }
        node.terminal.then_some(node)
    }

    fn find_mut(&mut self, word: &str) -> Option<&mut Node> {
        if word.is_empty() {
            return None;
        }
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.child_mut(c)?;
        }
        if node.terminal {
            Some(node)
        } else {
            None
        }
    }
}

impl Dictionary for ExpandableDictionary {
    fn get_words(
        &self,
        composer: &WordComposer,
        callback: &mut dyn WordCallback,
        t9: bool,
        next_letters: &mut NextLetterFrequencies,
    ) {
        let size = composer.size();
        let s = settings();
        if size == 0 || size >= s.learning.max_word_length {
            return;
        }
        let _span = debug_span!("expandable_get_words", size, t9).entered();

        let max_alternatives = s.dictionary.max_alternatives;
        let codes: Vec<&[char]> = (0..size)
            .map(|i| {
                let slot = composer.codes_at(i);
                &slot[..slot.len().min(max_alternatives)]
            })
            .collect();

        let mut found = Collector::new(s.dictionary.max_words);
        self.search(&codes, None, t9, Some(next_letters), &mut found);

        // Few hits: assume one letter was left out and let each position
        // in turn absorb it. Results accumulate with the first pass.
        if found.len() < s.dictionary.skip_retry_below {
            for skip in 0..size {
                self.search(&codes, Some(skip), t9, None, &mut found);
                if !found.is_empty() {
                    debug!(skip, found = found.len(), "skip retry");
                    break;
                }
            }
        }

        for (word, freq) in &found.entries {
            if !callback.add_word(word, *freq) {
                break;
            }
        }
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.find(word).is_some()
    }
}

/// Bounded best-first list of search hits.
struct Collector {
    capacity: usize,
    entries: Vec<(Vec<char>, i32)>,
}

impl Collector {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn add(&mut self, word: &[char], freq: i32) {
        if freq <= 0 {
            return;
        }
        let pos = self
            .entries
            .iter()
            .position(|(w, f)| freq > *f || (freq == *f && word.len() < w.len()))
            .unwrap_or(self.entries.len());
        if pos >= self.capacity {
            return;
        }
        self.entries.insert(pos, (word.to_vec(), freq));
        self.entries.truncate(self.capacity);
    }

    fn into_words(self) -> Vec<(String, i32)> {
        self.entries
            .into_iter()
            .map(|(w, f)| (w.into_iter().collect(), f))
            .collect()
    }
}

struct Search<'a> {
    codes: &'a [&'a [char]],
    skip_pos: Option<usize>,
    t9: bool,
    max_depth: usize,
    typed_multiplier: i32,
    full_multiplier: i32,
    word: Vec<char>,
    next_letters: Option<&'a mut NextLetterFrequencies>,
    found: &'a mut Collector,
}

impl Search<'_> {
    fn set_char(&mut self, depth: usize, c: char) {
        self.word.truncate(depth);
        self.word.push(c);
    }

    /// Visit the children of `node`, whose chars sit at `depth` in the
    /// word. `input_index` is the next keystroke to match; `snr` is the
    /// weight gathered so far.
    fn walk(&mut self, node: &Node, depth: usize, completion: bool, snr: i32, input_index: usize) {
        if !self.t9 && depth > self.max_depth {
            return;
        }
        let input_len = self.codes.len();
        let completion = completion || input_index >= input_len;

        for child in &node.children {
            let c = child.code;
            let freq = if child.terminal { child.frequency } else { 1 };

            if completion {
                self.set_char(depth, c);
                if child.terminal {
                    self.found.add(&self.word, freq.saturating_mul(snr));
                    if depth >= input_len && self.skip_pos.is_none() {
                        if let Some(next) = self.next_letters.as_deref_mut() {
                            next.register(self.word[input_len]);
                        }
                    }
                }
                self.walk(child, depth + 1, true, snr, input_index);
                continue;
            }

            let current = self.codes[input_index];
            let untyped_apostrophe = c == '\'' && current.first() != Some(&'\'');
            if untyped_apostrophe || self.skip_pos == Some(depth) {
                self.set_char(depth, c);
                self.walk(child, depth + 1, false, snr, input_index);
                continue;
            }

            let lower = unicode::to_lower(c);
            for (j, &alt) in current.iter().enumerate() {
                if alt == lower || alt == c {
                    let weight = if !self.t9 && j == 0 {
                        self.typed_multiplier
                    } else {
                        1
                    };
                    let weighted = snr.saturating_mul(weight);
                    self.set_char(depth, c);
                    if input_index + 1 == input_len {
                        if child.terminal {
                            let mut final_freq = freq.saturating_mul(weighted);
                            if self.skip_pos.is_none() {
                                final_freq = final_freq.saturating_mul(self.full_multiplier);
                            }
                            self.found.add(&self.word, final_freq);
                        }
                        self.walk(child, depth + 1, true, weighted, input_index + 1);
                    } else {
                        self.walk(child, depth + 1, false, weighted, input_index + 1);
                    }
                }
                // A skipped letter only pairs with what was actually typed.
                if self.skip_pos.is_some() {
                    break;
                }
            }
        }
    }
}
