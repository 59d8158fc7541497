//! Per-word pick counts that reweight candidates.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::reload::{ReloadState, ReloadableDictionary, WordSource};
use super::UsageCounts;
use crate::settings::settings;
use crate::usage::{UsageUpdate, UsageWorker};

pub struct SmartDictionary {
    lang: String,
    active: bool,
    counts: ReloadableDictionary,
    worker: Option<Arc<UsageWorker>>,
}

impl SmartDictionary {
    /// Counts for `lang`, seeded from `source`. Languages whose profile
    /// turns the smart dictionary off get an inactive instance.
    pub fn new(lang: &str, source: Arc<dyn WordSource>) -> Self {
        let active = settings().language(lang).smart_dictionary;
        Self {
            lang: lang.to_string(),
            active,
            counts: ReloadableDictionary::counting(format!("smart-{lang}"), source),
            worker: None,
        }
    }

    /// Persist count changes through `worker`.
    pub fn with_worker(mut self, worker: Arc<UsageWorker>) -> Self {
        self.worker = Some(worker);
        self
    }

    pub fn language(&self) -> &str {
        &self.lang
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mark_stale(&self) {
        self.counts.mark_stale();
    }

    pub fn state(&self) -> ReloadState {
        self.counts.poll()
    }

    pub fn wait_until_loaded(&self, timeout: Duration) -> bool {
        self.counts.wait_until_loaded(timeout)
    }
}

impl UsageCounts for SmartDictionary {
    fn word_count(&self, word: &str) -> i32 {
        if !self.active {
            return 0;
        }
        self.counts
            .with_dict(|d| d.word_frequency(word))
            .flatten()
            .unwrap_or(0)
    }

    fn increase_word_count(&self, word: &str) {
        if !self.active || word.is_empty() {
            return;
        }
        let updated = self.counts.with_dict_mut(|d| match d.increase_word_frequency(word) {
            Some(count) => count,
            None => {
                d.add_word(word, 1);
                1
            }
        });
        let Some(count) = updated else {
            debug!(word, "smart dictionary reloading, count dropped");
            return;
        };
        if let Some(worker) = &self.worker {
            worker.submit(UsageUpdate {
                lang: self.lang.clone(),
                word: word.to_string(),
                count,
            });
        }
    }
}
