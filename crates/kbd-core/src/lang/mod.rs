//! Language-specific text transforms.
//!
//! A `Converter` turns what the keys produce into the script the user
//! reads (jamo into hangul, for instance). The engine runs every candidate
//! through the active converter before scoring, and learned words are
//! stored in their raw form via `reverse`.

mod korean;

pub use korean::Korean;

use crate::composer::WordComposer;

pub trait Converter: Send + Sync {
    /// Raw key output to display text.
    fn convert(&self, raw: &str) -> String;

    /// Display text back to raw key output.
    fn reverse(&self, text: &str) -> String;

    /// Rewrite the keystrokes before dictionaries see them in T9 mode.
    /// `None` keeps the composer as typed.
    fn preprocess_t9(&self, _composer: &WordComposer) -> Option<WordComposer> {
        None
    }
}
