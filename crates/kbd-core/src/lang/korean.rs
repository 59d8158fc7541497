//! Jamo → hangul composition.
//!
//! Syllables are built by a small state machine over compatibility jamo
//! (U+3131..U+3163). The T9 layout has no dedicated vowel keys; vowels are
//! spelled with ㆍ, ㅣ and ㅡ strokes and merged by `VowelFsm` first.

use std::sync::OnceLock;

use super::Converter;
use crate::composer::WordComposer;
use crate::unicode;

const JAMO_BASE: u32 = 0x3130;
const FIRST_VOWEL: u32 = 0x314F;
const LAST_JAMO: u32 = 0x3164;
const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLES_PER_LEAD: u32 = 588;
const SYLLABLES_PER_VOWEL: u32 = 28;

/// T9 vowel strokes.
const DOT: char = '\u{318D}';
const VERTICAL: char = '\u{3163}';
const HORIZONTAL: char = '\u{3161}';

/// Jamo index (from `JAMO_BASE`) to lead position, 1-based. 0 cannot lead.
const LEAD_CHARS: [u32; 31] = [
    0, 1, 2, 0, 3, 0, 0, 4, 5, 6, 0, 0, 0, 0, 0, 0, 0, 7, 8, 9, 0, 10, 11, 12, 13, 14, 15, 16, 17,
    18, 19,
];

/// Jamo index to tail position. 0 cannot be a tail.
const TAIL_CHARS: [u32; 31] = [
    0, 1, 2, 3, 4, 5, 6, 7, 0, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 0, 18, 19, 20, 21, 22, 0, 23,
    24, 25, 26, 27,
];

/// Clusters starting with ㄹ, indexed by second tail - 1.
const TAIL_L_CHARS: [u32; 27] = [
    9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 10, 11, 0, 12, 0, 0, 0, 0, 0, 13, 14, 15,
];

const REVERSE_LEAD: [u32; 19] = [
    1, 2, 4, 7, 8, 9, 17, 18, 19, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30,
];

const REVERSE_TAIL: [u32; 27] = [
    1, 2, 3, 4, 5, 6, 7, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 20, 21, 22, 23, 24, 26, 27, 28, 29,
    30,
];

/// Stroke sequences of the T9 layout and the vowel each one spells.
const T9_VOWELS: &[(&[usize], char)] = &[
    (&[0, 2], '\u{3157}'),
    (&[0, 0, 2], '\u{315B}'),
    (&[1, 0, 1], '\u{3150}'),
    (&[1, 0, 0, 1], '\u{3152}'),
    (&[0, 1, 1], '\u{3154}'),
    (&[0, 0, 1, 1], '\u{3156}'),
    (&[0, 1], '\u{3153}'),
    (&[0, 0, 1], '\u{3155}'),
    (&[1, 0], '\u{314F}'),
    (&[1, 0, 0], '\u{3151}'),
    (&[2, 0], '\u{315C}'),
    (&[2, 0, 0], '\u{3160}'),
    (&[2, 0, 0, 1], '\u{315D}'),
    (&[2, 0, 0, 1, 1], '\u{315E}'),
];

#[derive(Default)]
struct VowelNode {
    vowel: Option<char>,
    children: [Option<usize>; 3],
}

/// Trie over stroke indices; nodes live in one arena.
struct VowelFsm {
    nodes: Vec<VowelNode>,
}

impl VowelFsm {
    fn build() -> Self {
        let mut fsm = Self {
            nodes: vec![VowelNode::default()],
        };
        for (seq, vowel) in T9_VOWELS {
            let mut node = 0;
            for &stroke in *seq {
                node = match fsm.nodes[node].children[stroke] {
                    Some(child) => child,
                    None => {
                        fsm.nodes.push(VowelNode::default());
                        let child = fsm.nodes.len() - 1;
                        fsm.nodes[node].children[stroke] = Some(child);
                        child
                    }
                };
            }
            fsm.nodes[node].vowel = Some(*vowel);
        }
        fsm
    }

    /// Follow strokes from `text[start..]` as far as the trie goes. Returns
    /// the vowel of the deepest node reached and how many chars it spans,
    /// or `None` when that node spells nothing.
    fn longest(&self, text: &[char], start: usize) -> Option<(char, usize)> {
        let mut node = 0;
        let mut depth = 0;
        while let Some(stroke) = text.get(start + depth).copied().and_then(stroke_index) {
            match self.nodes[node].children[stroke] {
                Some(child) => {
                    node = child;
                    depth += 1;
                }
                None => break,
            }
        }
        if depth == 0 {
            return None;
        }
        self.nodes[node].vowel.map(|v| (v, depth))
    }
}

fn vowel_fsm() -> &'static VowelFsm {
    static FSM: OnceLock<VowelFsm> = OnceLock::new();
    FSM.get_or_init(VowelFsm::build)
}

fn stroke_index(c: char) -> Option<usize> {
    match c {
        DOT => Some(0),
        VERTICAL => Some(1),
        HORIZONTAL => Some(2),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unknown,
    Lead,
    Vowel1,
    Vowel2,
    Tail,
}

/// Korean converter for both the standard and the T9 layouts.
#[derive(Debug, Default, Clone, Copy)]
pub struct Korean;

impl Korean {
    pub fn new() -> Self {
        Self
    }
}

impl Converter for Korean {
    fn convert(&self, raw: &str) -> String {
        let text: Vec<char> = raw.chars().collect();
        let mut out = String::with_capacity(raw.len());
        let mut state = State::Unknown;
        let (mut lead, mut vowel, mut tail) = (0u32, 0u32, 0u32);
        let mut prev;
        let mut c = 0u32;
        let fsm = vowel_fsm();

        let mut i = 0;
        while i < text.len() {
            prev = c;
            c = text[i] as u32;
            if let Some((merged, span)) = fsm.longest(&text, i) {
                c = merged as u32;
                i += span - 1;
            }

            if !(JAMO_BASE + 1..LAST_JAMO).contains(&c) {
                if state != State::Unknown {
                    combine_all(&mut out, lead, vowel, tail);
                    (lead, vowel, tail) = (0, 0, 0);
                }
                out.push(char::from_u32(c).unwrap_or(char::REPLACEMENT_CHARACTER));
                state = State::Unknown;
                i += 1;
                continue;
            }

            let is_vowel = c >= FIRST_VOWEL;
            c -= if is_vowel { FIRST_VOWEL - 1 } else { JAMO_BASE };

            state = match (state, is_vowel) {
                (State::Unknown, true) => {
                    (lead, vowel) = (0, c);
                    State::Vowel1
                }
                (State::Unknown, false) => {
                    lead = c;
                    State::Lead
                }
                (State::Lead, true) => {
                    vowel = c;
                    State::Vowel1
                }
                (State::Lead, false) => {
                    combine_all(&mut out, lead, 0, 0);
                    lead = c;
                    State::Lead
                }
                (State::Vowel1, true) => match combine_vowels(vowel, c) {
                    Some(combined) => {
                        vowel = combined;
                        State::Vowel2
                    }
                    None => {
                        combine_all(&mut out, lead, vowel, 0);
                        (lead, vowel) = (0, c);
                        State::Vowel1
                    }
                },
                (State::Vowel2, true) => {
                    combine_all(&mut out, lead, vowel, 0);
                    (lead, vowel) = (0, c);
                    State::Vowel1
                }
                (State::Vowel1 | State::Vowel2, false) => {
                    let candidate = TAIL_CHARS[c as usize];
                    if lead == 0 || candidate == 0 {
                        // No syllable to close: flush and start over from this consonant
                        combine_all(&mut out, lead, vowel, 0);
                        (lead, vowel) = (c, 0);
                        State::Lead
                    } else {
                        tail = candidate;
                        State::Tail
                    }
                }
                (State::Tail, true) => {
                    // The tail consonant moves on to lead the next syllable
                    combine_all(&mut out, lead, vowel, 0);
                    (lead, vowel, tail) = (prev, c, 0);
                    State::Vowel1
                }
                (State::Tail, false) => {
                    let new_tail = TAIL_CHARS[c as usize];
                    let combined = if new_tail != 0 {
                        combine_tail(tail, new_tail)
                    } else {
                        None
                    };
                    let next_is_vowel = text.get(i + 1).is_some_and(|&n| {
                        (FIRST_VOWEL..LAST_JAMO).contains(&(n as u32)) || n == DOT
                    });
                    match combined {
                        Some(cluster) if !next_is_vowel => {
                            combine_all(&mut out, lead, vowel, cluster);
                            (lead, vowel, tail) = (0, 0, 0);
                            State::Unknown
                        }
                        _ => {
                            combine_all(&mut out, lead, vowel, tail);
                            (lead, vowel, tail) = (c, 0, 0);
                            State::Lead
                        }
                    }
                }
            };
            i += 1;
        }

        if state != State::Unknown {
            combine_all(&mut out, lead, vowel, tail);
        }
        out
    }

    fn reverse(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() * 3);
        for ch in text.chars() {
            if !unicode::is_hangul_syllable(ch) {
                out.push(ch);
                continue;
            }
            let offset = ch as u32 - SYLLABLE_BASE;
            let tail = offset % SYLLABLES_PER_VOWEL;
            let vowel = (offset % SYLLABLES_PER_LEAD) / SYLLABLES_PER_VOWEL;
            let lead = offset / SYLLABLES_PER_LEAD;
            push_code(&mut out, REVERSE_LEAD[lead as usize] + JAMO_BASE);
            push_code(&mut out, vowel + FIRST_VOWEL);
            if tail > 0 {
                push_code(&mut out, REVERSE_TAIL[(tail - 1) as usize] + JAMO_BASE);
            }
        }
        out
    }

    fn preprocess_t9(&self, composer: &WordComposer) -> Option<WordComposer> {
        let text: Vec<char> = composer.typed_word().chars().collect();
        let fsm = vowel_fsm();
        let mut out = WordComposer::new();
        let mut i = 0;
        while i < text.len() {
            let mut c = text[i];
            if let Some((merged, span)) = fsm.longest(&text, i) {
                c = merged;
                i += span - 1;
            }
            // ㅝ and ㅞ are kept as two jamo so dictionaries can match them
            match c {
                '\u{315D}' => {
                    out.add('\u{315C}', vec!['\u{315C}']);
                    out.add('\u{3153}', vec!['\u{3153}']);
                }
                '\u{315E}' => {
                    out.add('\u{315C}', vec!['\u{315C}']);
                    out.add('\u{3154}', vec!['\u{3154}']);
                }
                _ => out.add(c, vec![c]),
            }
            i += 1;
        }
        Some(out)
    }
}

fn push_code(out: &mut String, code: u32) {
    out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
}

fn combine_vowels(first: u32, second: u32) -> Option<u32> {
    match (first, second) {
        (9, 1) => Some(10),   // ㅗ + ㅏ = ㅘ
        (9, 2) => Some(11),   // ㅗ + ㅐ = ㅙ
        (9, 21) => Some(12),  // ㅗ + ㅣ = ㅚ
        (14, 5) => Some(15),  // ㅜ + ㅓ = ㅝ
        (14, 6) => Some(16),  // ㅜ + ㅔ = ㅞ
        (14, 21) => Some(17), // ㅜ + ㅣ = ㅟ
        (19, 21) => Some(20), // ㅡ + ㅣ = ㅢ
        _ => None,
    }
}

fn combine_tail(first: u32, second: u32) -> Option<u32> {
    let cluster = match (first, second) {
        (1, 19) => 3,  // ㄳ
        (4, 22) => 5,  // ㄵ
        (4, 27) => 6,  // ㄶ
        (8, s) => TAIL_L_CHARS.get(s as usize - 1).copied().unwrap_or(0),
        (17, 19) => 18, // ㅄ
        _ => 0,
    };
    (cluster != 0).then_some(cluster)
}

/// Emit the syllable for `lead`/`vowel`/`tail` (indices, 0 = absent).
fn combine_all(out: &mut String, lead: u32, vowel: u32, tail: u32) {
    if lead == 0 {
        push_code(out, FIRST_VOWEL - 1 + vowel);
        return;
    }
    if vowel == 0 {
        push_code(out, JAMO_BASE + lead);
        return;
    }
    let lead_pos = LEAD_CHARS[lead as usize];
    if lead_pos == 0 {
        // A cluster consonant cannot open a syllable
        push_code(out, JAMO_BASE + lead);
        push_code(out, FIRST_VOWEL - 1 + vowel);
        return;
    }
    push_code(
        out,
        SYLLABLE_BASE
            + tail
            + SYLLABLES_PER_VOWEL * (vowel - 1)
            + SYLLABLES_PER_LEAD * (lead_pos - 1),
    );
}
