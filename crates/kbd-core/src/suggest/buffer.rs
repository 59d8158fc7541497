//! Bounded, ordered candidate list with a freelist of text buffers.

/// A ranked suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub frequency: i32,
}

pub(crate) struct SuggestionBuffer {
    capacity: usize,
    entries: Vec<Candidate>,
    pool: Vec<String>,
}

impl SuggestionBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
            pool: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, dropping entries past the new end.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.truncate_to_capacity();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    pub fn text(&self, index: usize) -> &str {
        &self.entries[index].text
    }

    pub fn priority(&self, index: usize) -> i32 {
        self.entries[index].frequency
    }

    /// Recycle every text and empty the list.
    pub fn clear(&mut self) {
        for entry in self.entries.drain(..) {
            recycle(&mut self.pool, self.capacity, entry.text);
        }
    }

    /// An empty string, reused when possible.
    pub fn take_text(&mut self) -> String {
        self.pool.pop().unwrap_or_else(|| String::with_capacity(32))
    }

    /// Hand back a text that did not make it into the list.
    pub fn give_back(&mut self, text: String) {
        recycle(&mut self.pool, self.capacity, text);
    }

    /// Insert at `pos`, shifting later entries down and dropping whatever
    /// falls off the end. Returns `false` (and recycles `text`) when `pos`
    /// is outside the list or beyond capacity.
    pub fn insert(&mut self, pos: usize, frequency: i32, text: String) -> bool {
        if pos >= self.capacity || pos > self.entries.len() {
            self.give_back(text);
            return false;
        }
        self.entries.insert(pos, Candidate { text, frequency });
        self.truncate_to_capacity();
        true
    }

    /// Move entry `from` to position `to`.
    pub fn relocate(&mut self, from: usize, to: usize) {
        if from >= self.entries.len() || to >= self.entries.len() || from == to {
            return;
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
    }

    /// Drop entries whose text repeats an earlier one.
    pub fn dedup(&mut self) {
        let mut i = 1;
        while i < self.entries.len() {
            let dup = self.entries[..i]
                .iter()
                .any(|e| e.text == self.entries[i].text);
            if dup {
                let entry = self.entries.remove(i);
                recycle(&mut self.pool, self.capacity, entry.text);
            } else {
                i += 1;
            }
        }
    }

    fn truncate_to_capacity(&mut self) {
        while self.entries.len() > self.capacity {
            if let Some(entry) = self.entries.pop() {
                recycle(&mut self.pool, self.capacity, entry.text);
            }
        }
    }
}

/// The pool never holds more buffers than the list can use.
fn recycle(pool: &mut Vec<String>, capacity: usize, mut text: String) {
    if pool.len() < capacity {
        text.clear();
        pool.push(text);
    }
}
