use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::composer::WordComposer;
use crate::dict::{
    Dictionary, LoadError, NextLetterFrequencies, ReloadState, ReloadableDictionary, StaticWords,
    WordSource,
};

const WAIT: Duration = Duration::from_secs(5);

/// Loads only after the test lets it through.
struct Gated {
    gate: Mutex<Receiver<()>>,
    words: Mutex<Vec<(String, i32)>>,
    loads: AtomicUsize,
}

impl Gated {
    fn new(words: &[(&str, i32)]) -> (Arc<Self>, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let source = Arc::new(Self {
            gate: Mutex::new(rx),
            words: Mutex::new(words.iter().map(|(w, f)| (w.to_string(), *f)).collect()),
            loads: AtomicUsize::new(0),
        });
        (source, tx)
    }
}

impl WordSource for Gated {
    fn load(&self) -> Result<Vec<(String, i32)>, LoadError> {
        self.gate
            .lock()
            .unwrap()
            .recv_timeout(WAIT)
            .map_err(|e| LoadError::Source(e.to_string()))?;
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.words.lock().unwrap().clone())
    }
}

struct Shared(Mutex<Vec<(String, i32)>>);

impl WordSource for Shared {
    fn load(&self) -> Result<Vec<(String, i32)>, LoadError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

struct Broken;

impl WordSource for Broken {
    fn load(&self) -> Result<Vec<(String, i32)>, LoadError> {
        Err(LoadError::Source("database locked".to_string()))
    }
}

fn count_words(dict: &dyn Dictionary, typed: &str) -> usize {
    let mut n = 0;
    let mut next = NextLetterFrequencies::new(1280);
    dict.get_words(
        &WordComposer::from_word(typed),
        &mut |_: &[char], _: i32| {
            n += 1;
            true
        },
        false,
        &mut next,
    );
    n
}

#[test]
fn test_loads_in_background() {
    let source = Arc::new(StaticWords::new([("hello", 100), ("help", 50)]));
    let dict = ReloadableDictionary::new("static", source);
    assert_eq!(dict.name(), "static");
    assert!(dict.wait_until_loaded(WAIT));
    assert_eq!(dict.state(), ReloadState::Idle);
    assert!(dict.is_valid_word("hello"));
    assert_eq!(count_words(&dict, "hel"), 2);
}

#[test]
fn test_reloading_answers_empty() {
    let (source, gate) = Gated::new(&[("hello", 100)]);
    let dict = ReloadableDictionary::new("gated", source);
    assert_eq!(dict.state(), ReloadState::Reloading);
    assert!(!dict.is_valid_word("hello"));
    assert_eq!(count_words(&dict, "hello"), 0);
    assert!(dict.with_dict(|d| d.len()).is_none());
    assert!(dict.with_dict_mut(|d| d.add_word("lost", 10)).is_none());

    gate.send(()).unwrap();
    assert!(dict.wait_until_loaded(WAIT));
    assert!(dict.is_valid_word("hello"));
    assert!(!dict.is_valid_word("lost"));
}

#[test]
fn test_mark_stale_picks_up_changes() {
    let source = Arc::new(Shared(Mutex::new(vec![("old".to_string(), 10)])));
    let dict = ReloadableDictionary::new("shared", source.clone());
    assert!(dict.wait_until_loaded(WAIT));
    assert!(dict.is_valid_word("old"));

    *source.0.lock().unwrap() = vec![("new".to_string(), 10)];
    // Nothing happens until someone marks the copy stale.
    assert!(dict.is_valid_word("old"));
    dict.mark_stale();
    assert_eq!(dict.state(), ReloadState::Stale);

    assert!(dict.wait_until_loaded(WAIT));
    assert!(dict.is_valid_word("new"));
    assert!(!dict.is_valid_word("old"));
}

#[test]
fn test_change_during_reload_loads_again() {
    let (source, gate) = Gated::new(&[("word", 10)]);
    let dict = ReloadableDictionary::new("gated", source.clone());
    assert_eq!(dict.state(), ReloadState::Reloading);

    dict.mark_stale();
    assert_eq!(dict.state(), ReloadState::Reloading);

    gate.send(()).unwrap();
    gate.send(()).unwrap();
    assert!(dict.wait_until_loaded(WAIT));
    assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    assert_eq!(dict.state(), ReloadState::Idle);
}

#[test]
fn test_failed_load_leaves_empty_dictionary() {
    let dict = ReloadableDictionary::new("broken", Arc::new(Broken));
    assert!(dict.wait_until_loaded(WAIT));
    assert_eq!(dict.state(), ReloadState::Idle);
    assert_eq!(dict.with_dict(|d| d.len()), Some(0));
}

#[test]
fn test_mutation_after_load() {
    let dict = ReloadableDictionary::new("static", Arc::new(StaticWords::new([("a", 1)])));
    assert!(dict.wait_until_loaded(WAIT));
    assert_eq!(dict.with_dict_mut(|d| d.add_word("zorp", 20)), Some(()));
    assert!(dict.is_valid_word("zorp"));
}

#[test]
fn test_overlong_words_dropped_on_load() {
    let long = "x".repeat(48);
    let source = Arc::new(StaticWords::new([(long.clone(), 10), ("ok".to_string(), 10)]));
    let dict = ReloadableDictionary::new("long", source);
    assert!(dict.wait_until_loaded(WAIT));
    assert!(dict.is_valid_word("ok"));
    assert!(!dict.is_valid_word(&long));
}
