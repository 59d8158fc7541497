//! Background reloading for dictionaries mirrored from external storage.
//!
//! State moves `Idle -> Stale` on a change notification, `Stale ->
//! Reloading` on the next query (a loader thread is spawned), and back to
//! `Idle` once a query finds the loader's result on the channel. Queries
//! during `Reloading` see an empty dictionary instead of blocking.

use std::sync::mpsc::{self, TryRecvError};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::{
    Dictionary, ExpandableDictionary, LoadError, NextLetterFrequencies, WordCallback,
};
use crate::composer::WordComposer;
use crate::settings::settings;

/// Where a reloadable dictionary gets its words.
pub trait WordSource: Send + Sync + 'static {
    fn load(&self) -> Result<Vec<(String, i32)>, LoadError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadState {
    Idle,
    Stale,
    Reloading,
}

type LoadResult = Result<ExpandableDictionary, LoadError>;

struct Control {
    state: ReloadState,
    pending: Option<mpsc::Receiver<LoadResult>>,
    /// A change arrived while a load was already running.
    restale: bool,
}

pub struct ReloadableDictionary {
    name: String,
    source: Arc<dyn WordSource>,
    /// Clamp loaded frequencies to `max_frequency`.
    capped: bool,
    control: Mutex<Control>,
    dict: RwLock<ExpandableDictionary>,
}

impl ReloadableDictionary {
    /// Create the dictionary and start loading it right away.
    pub fn new(name: impl Into<String>, source: Arc<dyn WordSource>) -> Self {
        Self::start(name.into(), source, true)
    }

    /// A dictionary of counts rather than frequencies: loaded values are
    /// kept as they are.
    pub fn counting(name: impl Into<String>, source: Arc<dyn WordSource>) -> Self {
        Self::start(name.into(), source, false)
    }

    fn start(name: String, source: Arc<dyn WordSource>, capped: bool) -> Self {
        let dict = Self {
            name,
            source,
            capped,
            control: Mutex::new(Control {
                state: ReloadState::Stale,
                pending: None,
                restale: false,
            }),
            dict: RwLock::new(ExpandableDictionary::new()),
        };
        dict.poll();
        dict
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record that the backing storage changed.
    pub fn mark_stale(&self) {
        let mut ctl = self.control.lock().unwrap();
        match ctl.state {
            ReloadState::Reloading => ctl.restale = true,
            _ => ctl.state = ReloadState::Stale,
        }
        debug!(name = %self.name, "marked stale");
    }

    /// Current state without advancing it.
    pub fn state(&self) -> ReloadState {
        self.control.lock().unwrap().state
    }

    /// Collect a finished load and start a pending one. Returns the state
    /// afterwards.
    pub fn poll(&self) -> ReloadState {
        let mut ctl = self.control.lock().unwrap();

        if ctl.state == ReloadState::Reloading {
            let received = match ctl.pending.as_ref() {
                Some(rx) => match rx.try_recv() {
                    Ok(result) => result,
                    Err(TryRecvError::Empty) => return ReloadState::Reloading,
                    Err(TryRecvError::Disconnected) => {
                        Err(LoadError::Source("loader exited".to_string()))
                    }
                },
                None => Err(LoadError::Source("no loader".to_string())),
            };
            ctl.pending = None;
            let next = match received {
                Ok(loaded) => {
                    debug!(name = %self.name, words = loaded.len(), "reload finished");
                    loaded
                }
                Err(e) => {
                    warn!(name = %self.name, error = %e, "reload failed");
                    ExpandableDictionary::new()
                }
            };
            *self.dict.write().unwrap() = next;
            ctl.state = if std::mem::take(&mut ctl.restale) {
                ReloadState::Stale
            } else {
                ReloadState::Idle
            };
        }

        if ctl.state == ReloadState::Stale {
            match self.spawn_loader() {
                Ok(rx) => {
                    ctl.pending = Some(rx);
                    ctl.state = ReloadState::Reloading;
                }
                Err(e) => {
                    warn!(name = %self.name, error = %e, "failed to spawn loader");
                    ctl.state = ReloadState::Idle;
                }
            }
        }
        ctl.state
    }

    /// Block until no load is pending. Returns `false` on timeout.
    pub fn wait_until_loaded(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.poll() != ReloadState::Reloading {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Read the loaded words. `None` while a reload is in flight.
    pub fn with_dict<R>(&self, f: impl FnOnce(&ExpandableDictionary) -> R) -> Option<R> {
        if self.poll() == ReloadState::Reloading {
            return None;
        }
        let dict = self.dict.read().unwrap();
        Some(f(&dict))
    }

    /// Mutate the loaded words. `None` (and no change) while a reload is in
    /// flight, since the swap would discard the edit.
    pub fn with_dict_mut<R>(&self, f: impl FnOnce(&mut ExpandableDictionary) -> R) -> Option<R> {
        if self.poll() == ReloadState::Reloading {
            return None;
        }
        let mut dict = self.dict.write().unwrap();
        Some(f(&mut dict))
    }

    fn spawn_loader(&self) -> std::io::Result<mpsc::Receiver<LoadResult>> {
        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        let name = self.name.clone();
        let capped = self.capped;
        thread::Builder::new()
            .name(format!("kbd-load-{name}"))
            .spawn(move || {
                let max_len = settings().learning.max_word_length;
                let result = source.load().map(|words| {
                    let mut dict = ExpandableDictionary::new();
                    for (word, freq) in words {
                        if word.chars().count() >= max_len {
                            continue;
                        }
                        if capped {
                            dict.add_word(&word, freq);
                        } else {
                            dict.add_word_uncapped(&word, freq);
                        }
                    }
                    dict
                });
                let _ = tx.send(result);
            })?;
        debug!(name = %self.name, "reload started");
        Ok(rx)
    }
}

impl Dictionary for ReloadableDictionary {
    fn get_words(
        &self,
        composer: &WordComposer,
        callback: &mut dyn WordCallback,
        t9: bool,
        next_letters: &mut NextLetterFrequencies,
    ) {
        self.with_dict(|d| d.get_words(composer, callback, t9, next_letters));
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.with_dict(|d| d.is_valid_word(word)).unwrap_or(false)
    }
}
