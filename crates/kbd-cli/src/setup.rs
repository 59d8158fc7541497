//! Builds a `Suggest` engine from word-list files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use kbd_core::autotext::{
    parse_custom_autotext_toml, AutoTextConfigError, AutoTextTable, CustomAutoText,
};
use kbd_core::composer::WordComposer;
use kbd_core::dict::{
    ContactSource, ContactsDictionary, Dictionaries, ExpandableDictionary, LoadError,
    SmartDictionary, UserDictionary, WordListFile, WordSource,
};
use kbd_core::lang::{Converter, Korean};
use kbd_core::suggest::{CorrectionMode, Suggest};
use kbd_core::usage::{TsvUsageStore, UsageWorker};

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("{}: {source}", .path.display())]
    Load { path: PathBuf, source: LoadError },

    #[error("{}: {source}", .path.display())]
    AutoText {
        path: PathBuf,
        source: AutoTextConfigError,
    },

    #[error("timed out loading the {0} dictionary")]
    Timeout(&'static str),
}

/// Which files to load and how to configure the engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub main: PathBuf,
    pub user: Option<PathBuf>,
    pub contacts: Option<PathBuf>,
    pub autotext: Option<PathBuf>,
    pub custom_autotext: Option<PathBuf>,
    /// Usage log; enables smart weighting.
    pub smart: Option<PathBuf>,
    pub lang: String,
    pub correction: Option<CorrectionMode>,
}

impl EngineOptions {
    pub fn new(main: impl Into<PathBuf>) -> Self {
        Self {
            main: main.into(),
            user: None,
            contacts: None,
            autotext: None,
            custom_autotext: None,
            smart: None,
            lang: "EN".to_string(),
            correction: None,
        }
    }
}

/// An engine plus what it needs at query time.
pub struct Engine {
    pub suggest: Suggest,
    pub converter: Option<Box<dyn Converter>>,
    // Kept alive so queued usage updates reach the log.
    _usage: Option<Arc<UsageWorker>>,
}

/// One display name per line, re-read on every reload.
struct ContactsFile(PathBuf);

impl ContactSource for ContactsFile {
    fn names(&self) -> Result<Vec<String>, LoadError> {
        let text = fs::read_to_string(&self.0)?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}

pub fn load_main(path: &Path) -> Result<ExpandableDictionary, CliError> {
    if !path.exists() {
        return Err(CliError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "word list not found"),
        });
    }
    let words = WordListFile::new(path)
        .load()
        .map_err(|source| CliError::Load {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(ExpandableDictionary::from_words(words))
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn wait(loaded: bool, name: &'static str) -> Result<(), CliError> {
    if loaded {
        Ok(())
    } else {
        Err(CliError::Timeout(name))
    }
}

/// Converter for languages whose keys produce something other than the
/// final script.
pub fn converter_for(lang: &str) -> Option<Box<dyn Converter>> {
    match lang {
        "KO" => Some(Box::new(Korean::new())),
        _ => None,
    }
}

pub fn build_engine(opts: &EngineOptions) -> Result<Engine, CliError> {
    let _span = tracing::debug_span!("build_engine", lang = %opts.lang).entered();
    let mut dicts = Dictionaries::new().with_main(Arc::new(load_main(&opts.main)?));

    if let Some(path) = &opts.user {
        let user = UserDictionary::new(Arc::new(WordListFile::new(path)))
            .with_sink(Box::new(WordListFile::new(path)));
        wait(user.wait_until_loaded(LOAD_TIMEOUT), "user")?;
        dicts = dicts.with_user(Arc::new(user));
    }
    if let Some(path) = &opts.contacts {
        let contacts = ContactsDictionary::new(ContactsFile(path.clone()));
        wait(contacts.wait_until_loaded(LOAD_TIMEOUT), "contacts")?;
        dicts = dicts.with_contacts(Arc::new(contacts));
    }
    if let Some(path) = &opts.autotext {
        let table = AutoTextTable::from_toml(&read(path)?).map_err(|source| {
            CliError::AutoText {
                path: path.clone(),
                source,
            }
        })?;
        dicts = dicts.with_auto_text(Arc::new(table));
    }
    if let Some(path) = &opts.custom_autotext {
        let entries = parse_custom_autotext_toml(&read(path)?).map_err(|source| {
            CliError::AutoText {
                path: path.clone(),
                source,
            }
        })?;
        dicts = dicts.with_custom_auto_text(Arc::new(CustomAutoText::from_entries(entries)));
    }

    let mut usage = None;
    if let Some(path) = &opts.smart {
        let store = TsvUsageStore::new(path);
        let counts = Arc::new(store.counts_for(&opts.lang));
        let worker = Arc::new(UsageWorker::new(store));
        let smart = SmartDictionary::new(&opts.lang, counts).with_worker(worker.clone());
        wait(smart.wait_until_loaded(LOAD_TIMEOUT), "smart")?;
        dicts = dicts.with_smart(Arc::new(smart));
        usage = Some(worker);
    }

    let mut suggest = Suggest::new(&opts.lang, dicts);
    suggest.use_smart_dictionary(usage.is_some());
    if let Some(mode) = opts.correction {
        suggest.set_correction_mode(mode);
    }
    tracing::debug!(roles = ?suggest.dictionaries().roles(), "engine ready");
    Ok(Engine {
        suggest,
        converter: converter_for(&opts.lang),
        _usage: usage,
    })
}

const KEYPAD: [&str; 10] = ["0", "1", "abc", "def", "ghi", "jkl", "mno", "pqrs", "tuv", "wxyz"];

/// Composer for a phone keypad digit sequence. Anything but a letter
/// key is taken literally.
pub fn keypad_composer(digits: &str) -> WordComposer {
    let mut composer = WordComposer::new();
    for d in digits.chars() {
        let codes: Vec<char> = match d.to_digit(10) {
            Some(n @ 2..=9) => KEYPAD[n as usize].chars().collect(),
            _ => vec![d],
        };
        composer.add(codes[0], codes);
    }
    composer
}

#[derive(Debug, Serialize)]
pub struct ReportEntry {
    pub text: String,
    pub priority: i32,
}

#[derive(Debug, Serialize)]
pub struct SuggestReport {
    pub typed: String,
    pub suggestions: Vec<ReportEntry>,
    pub have_correction: bool,
    pub auto_text_found: bool,
}

/// Rank suggestions for `word`, given as letters or, with `t9`, as keypad
/// digits.
pub fn suggest_word(engine: &mut Engine, word: &str, t9: bool) -> SuggestReport {
    let converter = engine.converter.as_deref();
    let mut composer = if t9 {
        keypad_composer(word)
    } else {
        WordComposer::from_word(word)
    };
    composer.convert_word(converter);

    let suggest = &mut engine.suggest;
    let suggestions = suggest
        .get_suggestions(&composer, t9, t9, converter)
        .iter()
        .map(|c| ReportEntry {
            text: c.text.clone(),
            priority: c.frequency,
        })
        .collect();
    SuggestReport {
        typed: composer.converted_word().to_string(),
        suggestions,
        have_correction: suggest.has_minimal_correction(),
        auto_text_found: suggest.was_auto_text_found(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_suggest_from_word_list() {
        let dir = tempfile::tempdir().unwrap();
        let main = write(dir.path(), "main.tsv", "# english\nthe\t200\nten\t20\nthen\t50\n");
        let mut engine = build_engine(&EngineOptions::new(main)).unwrap();
        let report = suggest_word(&mut engine, "th", false);
        let texts: Vec<&str> = report.suggestions.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(report.typed, "th");
        assert_eq!(texts, vec!["th", "the", "then"]);
        assert_eq!(report.suggestions[1].priority, 800);
    }

    #[test]
    fn test_missing_main_list() {
        let dir = tempfile::tempdir().unwrap();
        let opts = EngineOptions::new(dir.path().join("nope.tsv"));
        assert!(matches!(build_engine(&opts), Err(CliError::Io { .. })));
    }

    #[test]
    fn test_bad_word_list_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let main = write(dir.path(), "main.tsv", "ok\t1\nbad\tx\n");
        match build_engine(&EngineOptions::new(main)) {
            Err(CliError::Load {
                source: LoadError::Parse { line, .. },
                ..
            }) => assert_eq!(line, 2),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("expected a load error"),
        }
    }

    #[test]
    fn test_all_sources_wired() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = EngineOptions::new(write(dir.path(), "main.tsv", "hello\t100\n"));
        opts.user = Some(write(dir.path(), "user.tsv", "zorp\t128\n"));
        opts.contacts = Some(write(dir.path(), "contacts.txt", "Ada Lovelace\n"));
        opts.autotext = Some(write(
            dir.path(),
            "autotext.toml",
            "[entries]\nomw = \"on my way\"\n",
        ));
        opts.custom_autotext = Some(write(
            dir.path(),
            "custom.toml",
            "[[entry]]\nkey = \"brb\"\nvalue = \"be right back\"\n",
        ));
        opts.smart = Some(dir.path().join("usage.tsv"));

        let mut engine = build_engine(&opts).unwrap();
        assert_eq!(engine.suggest.dictionaries().roles().len(), 5);
        assert!(engine.suggest.is_valid_word("zorp", false, false));
        assert!(engine.suggest.is_valid_word("Lovelace", false, false));

        let report = suggest_word(&mut engine, "omw", false);
        assert_eq!(report.suggestions[1].text, "on my way");
        let report = suggest_word(&mut engine, "brb", false);
        assert!(report.auto_text_found);
    }

    #[test]
    fn test_keypad_composer() {
        let composer = keypad_composer("228");
        assert_eq!(composer.typed_word(), "aat");
        assert_eq!(composer.codes_at(2), &['t', 'u', 'v']);
        assert_eq!(keypad_composer("1#").typed_word(), "1#");
    }

    #[test]
    fn test_t9_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let main = write(dir.path(), "main.tsv", "cat\t100\nact\t50\nbat\t10\n");
        let mut engine = build_engine(&EngineOptions::new(main)).unwrap();
        let report = suggest_word(&mut engine, "228", true);
        let texts: Vec<&str> = report.suggestions.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["aat", "cat", "act", "bat"]);
    }

    #[test]
    fn test_korean_converter() {
        let dir = tempfile::tempdir().unwrap();
        let main = write(dir.path(), "main.tsv", "ㅎㅏㄴㄱㅡㄹ\t100\n");
        let mut opts = EngineOptions::new(main);
        opts.lang = "KO".to_string();
        let mut engine = build_engine(&opts).unwrap();
        let report = suggest_word(&mut engine, "ㅎㅏㄴ", false);
        assert_eq!(report.typed, "한");
        assert_eq!(report.suggestions[1].text, "한글");
    }
}
