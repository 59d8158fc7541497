//! Background persistence of usage counts.
//!
//! Typing must never wait on storage, so count changes are posted to a
//! single worker thread that owns the store.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::dict::{LoadError, WordSource};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageUpdate {
    pub lang: String,
    pub word: String,
    pub count: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum UsageStoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("store rejected {word:?}: {reason}")]
    Rejected { word: String, reason: String },
}

/// Durable home for usage counts. Runs on the worker thread only.
pub trait UsageStore: Send + 'static {
    fn record(&mut self, lang: &str, word: &str, count: i32) -> Result<(), UsageStoreError>;
}

enum Message {
    Update(UsageUpdate),
    Flush(mpsc::Sender<()>),
}

pub struct UsageWorker {
    tx: Option<mpsc::Sender<Message>>,
    handle: Option<JoinHandle<()>>,
}

impl UsageWorker {
    pub fn new(store: impl UsageStore) -> Self {
        let (tx, rx) = mpsc::channel::<Message>();
        let handle = thread::Builder::new()
            .name("kbd-usage".into())
            .spawn(move || usage_worker(rx, store))
            .expect("failed to spawn usage worker");
        Self {
            tx: Some(tx),
            handle: Some(handle),
        }
    }

    /// Queue an update. Never blocks.
    pub fn submit(&self, update: UsageUpdate) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Message::Update(update));
        }
    }

    /// Wait until every update queued so far has been handled.
    pub fn flush(&self) {
        let Some(tx) = &self.tx else {
            return;
        };
        let (ack_tx, ack_rx) = mpsc::channel();
        if tx.send(Message::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.recv();
        }
    }
}

impl Drop for UsageWorker {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn usage_worker(rx: mpsc::Receiver<Message>, mut store: impl UsageStore) {
    while let Ok(msg) = rx.recv() {
        match msg {
            Message::Update(update) => {
                if let Err(e) = store.record(&update.lang, &update.word, update.count) {
                    warn!(word = %update.word, error = %e, "failed to record usage");
                }
            }
            Message::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("usage worker stopped");
}

/// Keeps updates in memory; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct MemoryUsageStore {
    records: Arc<Mutex<Vec<UsageUpdate>>>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<UsageUpdate> {
        self.records.lock().unwrap().clone()
    }
}

impl UsageStore for MemoryUsageStore {
    fn record(&mut self, lang: &str, word: &str, count: i32) -> Result<(), UsageStoreError> {
        self.records.lock().unwrap().push(UsageUpdate {
            lang: lang.to_string(),
            word: word.to_string(),
            count,
        });
        Ok(())
    }
}

/// Appends `lang<TAB>word<TAB>count` lines. Later lines win on load.
pub struct TsvUsageStore {
    path: PathBuf,
    file: Option<File>,
}

impl TsvUsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A word source that reads back the counts of one language.
    pub fn counts_for(&self, lang: &str) -> UsageLog {
        UsageLog {
            path: self.path.clone(),
            lang: lang.to_string(),
        }
    }

    fn open_file(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(f) => f,
            None => {
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?
            }
        };
        Ok(self.file.insert(file))
    }
}

impl UsageStore for TsvUsageStore {
    fn record(&mut self, lang: &str, word: &str, count: i32) -> Result<(), UsageStoreError> {
        if word.contains(['\t', '\n']) {
            return Err(UsageStoreError::Rejected {
                word: word.to_string(),
                reason: "contains a tab or newline".to_string(),
            });
        }
        let file = self.open_file()?;
        writeln!(file, "{lang}\t{word}\t{count}")?;
        Ok(())
    }
}

/// Usage counts of one language read from a `TsvUsageStore` file.
#[derive(Debug, Clone)]
pub struct UsageLog {
    path: PathBuf,
    lang: String,
}

impl WordSource for UsageLog {
    fn load(&self) -> Result<Vec<(String, i32)>, LoadError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut counts: HashMap<String, i32> = HashMap::new();
        for (i, line) in text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let [lang, word, count] = fields[..] else {
                return Err(LoadError::Parse {
                    line: i + 1,
                    reason: "expected lang, word and count".to_string(),
                });
            };
            if lang != self.lang {
                continue;
            }
            let count = count.parse::<i32>().map_err(|e| LoadError::Parse {
                line: i + 1,
                reason: e.to_string(),
            })?;
            counts.insert(word.to_string(), count);
        }
        Ok(counts.into_iter().collect())
    }
}
