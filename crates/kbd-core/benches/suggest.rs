use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kbd_core::composer::WordComposer;
use kbd_core::dict::{Dictionaries, ExpandableDictionary};
use kbd_core::suggest::{CorrectionMode, Suggest};

const SYLLABLES: &[&str] = &[
    "the", "an", "re", "in", "er", "on", "at", "en", "nd", "ti", "es", "or", "te", "of", "ed",
    "is", "it", "al", "ar", "st",
];

/// Every one- to three-syllable combination, frequencies spread over 1..=255.
fn bench_dict() -> ExpandableDictionary {
    let mut dict = ExpandableDictionary::new();
    let mut n = 0;
    for a in SYLLABLES {
        dict.add_word(a, 255);
        for b in SYLLABLES {
            n += 1;
            dict.add_word(&format!("{a}{b}"), 1 + n % 255);
            for c in SYLLABLES.iter().take(8) {
                n += 1;
                dict.add_word(&format!("{a}{b}{c}"), 1 + n % 255);
            }
        }
    }
    dict
}

static INPUTS: &[(&str, &str)] = &[
    ("exact", "theat"),
    ("typo", "theta"),
    ("missing", "thend"),
    ("prefix", "ar"),
];

fn bench_trie(c: &mut Criterion) {
    let dict = bench_dict();
    let mut group = c.benchmark_group("suggest/trie");
    for &(label, typed) in INPUTS {
        let composer = WordComposer::from_word(typed);
        group.bench_with_input(BenchmarkId::new(label, typed.len()), &composer, |b, composer| {
            let codes: Vec<&[char]> = (0..composer.size()).map(|i| composer.codes_at(i)).collect();
            b.iter(|| dict.suggestions(&codes, None, false, None));
        });
    }
    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let dicts = Dictionaries::new().with_main(Arc::new(bench_dict()));
    let mut group = c.benchmark_group("suggest/engine");
    for mode in [CorrectionMode::Basic, CorrectionMode::Full] {
        let mut engine = Suggest::new("EN", dicts.clone());
        engine.set_correction_mode(mode);
        for &(label, typed) in INPUTS {
            let composer = WordComposer::from_word(typed);
            let id = BenchmarkId::new(format!("{mode:?}/{label}"), typed.len());
            group.bench_with_input(id, &composer, |b, composer| {
                b.iter(|| engine.get_suggestions(composer, false, false, None).len());
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_trie, bench_engine);
criterion_main!(benches);
