use std::fs;
use std::path::{Path, PathBuf};

use super::{LoadError, WordSource};
use crate::settings::settings;

/// Parse `word<TAB>freq` lines. Blank lines and `#` comments are skipped;
/// a missing frequency means the user word default.
pub fn parse_word_list(text: &str) -> Result<Vec<(String, i32)>, LoadError> {
    let default_freq = settings().learning.user_word_frequency;
    let mut words = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let word = fields.next().unwrap_or_default().trim();
        if word.is_empty() {
            return Err(LoadError::Parse {
                line: i + 1,
                reason: "empty word".to_string(),
            });
        }
        let freq = match fields.next().map(str::trim) {
            None | Some("") => default_freq,
            Some(f) => f.parse::<i32>().map_err(|e| LoadError::Parse {
                line: i + 1,
                reason: format!("bad frequency {f:?}: {e}"),
            })?,
        };
        words.push((word.to_string(), freq));
    }
    Ok(words)
}

/// Fixed word list, mostly for tests and tools.
#[derive(Debug, Clone, Default)]
pub struct StaticWords(pub Vec<(String, i32)>);

impl StaticWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        Self(words.into_iter().map(|(w, f)| (w.into(), f)).collect())
    }
}

impl WordSource for StaticWords {
    fn load(&self) -> Result<Vec<(String, i32)>, LoadError> {
        Ok(self.0.clone())
    }
}

/// Word list file read on every reload. A missing file loads as empty.
#[derive(Debug, Clone)]
pub struct WordListFile {
    path: PathBuf,
}

impl WordListFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WordSource for WordListFile {
    fn load(&self) -> Result<Vec<(String, i32)>, LoadError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => parse_word_list(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}
