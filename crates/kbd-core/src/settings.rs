//! Engine tuning, read once from TOML.
//!
//! The defaults ship inside the binary (`default_settings.toml`). A host
//! that wants different thresholds hands its own TOML to `init_custom`
//! before anything calls `settings()`; after that the values are frozen.
//!
//! Every ranking threshold the engine uses lives here so that product
//! tuning never requires touching the algorithm.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::suggest::CorrectionMode;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Install a validated custom TOML. Fails once `settings()` has run or a
/// custom TOML is already installed.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// The process-wide settings, parsed on first use.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// The shipped defaults, for `settings export`.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

/// Read and validate a settings file without installing it.
pub fn load_settings_file(path: &Path) -> Result<Settings, SettingsError> {
    let content = fs::read_to_string(path)?;
    parse_settings_toml(&content)
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub suggest: SuggestSettings,
    pub commonality: CommonalitySettings,
    pub smart: SmartSettings,
    pub autotext: AutoTextSettings,
    pub learning: LearningSettings,
    pub dictionary: DictionarySettings,
    #[serde(default)]
    pub t9_single_letter: Vec<T9LetterRule>,
    #[serde(default)]
    languages: HashMap<String, LanguageProfile>,
}

impl Settings {
    /// Profile for a language code. Unknown codes get the alphabetic defaults.
    pub fn language(&self, code: &str) -> LanguageProfile {
        self.languages.get(code).cloned().unwrap_or_default()
    }

    /// Suggestion capacity for a language, honoring per-language overrides.
    pub fn max_suggestions_for(&self, code: &str) -> usize {
        let profile = self.language(code);
        match profile.max_suggestions {
            Some(n) => n,
            None if profile.ideographic => self.suggest.ideographic_max_suggestions,
            None => self.suggest.max_suggestions,
        }
    }

    /// Whether an autotext expansion must not count as a correction.
    pub fn is_no_correction_autotext(&self, text: &str) -> bool {
        self.autotext.no_correction.iter().any(|t| t == text)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestSettings {
    pub max_suggestions: usize,
    pub ideographic_max_suggestions: usize,
    pub next_letters_size: usize,
    pub t9_length_priority: bool,
    pub correction_mode: CorrectionMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommonalitySettings {
    pub always_pass_len: usize,
    pub short_len: usize,
    pub short_min_matches: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmartSettings {
    pub length_divisor: i32,
    pub typed_freq_ratio: i32,
    pub min_usage_count: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutoTextSettings {
    pub max_lookups: usize,
    pub basic_max_lookups: usize,
    pub custom_frequency: i32,
    #[serde(default)]
    pub no_correction: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LearningSettings {
    pub frequency_for_picked: i32,
    pub frequency_for_typed: i32,
    pub auto_validity_multiplier: i32,
    pub auto_promotion_multiplier: i32,
    pub frequency_for_auto_add: i32,
    pub user_word_frequency: i32,
    pub max_word_length: usize,
    pub max_frequency: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictionarySettings {
    pub max_alternatives: usize,
    pub max_words: usize,
    pub skip_retry_below: usize,
    pub typed_letter_multiplier: i32,
    pub full_word_multiplier: i32,
    pub max_depth_factor: usize,
}

/// Promotion applied when a single ambiguous T9 key is the whole word.
#[derive(Debug, Clone, Deserialize)]
pub struct T9LetterRule {
    /// Position in the key's candidate list to test.
    pub index: usize,
    /// Letters that trigger the rule at `index`.
    pub codes: Vec<char>,
    /// Move the candidate at `index` to position 1; otherwise only flag a correction.
    #[serde(default)]
    pub promote: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LanguageProfile {
    /// Suggestions are transliteration choices rather than corrections.
    pub ideographic: bool,
    /// Query dictionaries even for a single keystroke.
    pub always_segment: bool,
    /// Skip the dedup pass.
    pub keep_duplicates: bool,
    pub smart_dictionary: bool,
    pub max_suggestions: Option<usize>,
}

impl Default for LanguageProfile {
    fn default() -> Self {
        Self {
            ideographic: false,
            always_segment: false,
            keep_duplicates: false,
            smart_dictionary: true,
            max_suggestions: None,
        }
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_non_negative {
        ($section:ident . $field:ident) => {
            if s.$section.$field < 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be non-negative".to_string(),
                });
            }
        };
    }
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field <= 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(suggest.max_suggestions);
    check_positive_usize!(suggest.ideographic_max_suggestions);

    if s.commonality.short_len < s.commonality.always_pass_len {
        return Err(SettingsError::InvalidValue {
            field: "commonality.short_len".to_string(),
            reason: "must be at least commonality.always_pass_len".to_string(),
        });
    }

    check_positive!(smart.length_divisor);
    check_positive!(smart.typed_freq_ratio);
    check_non_negative!(smart.min_usage_count);

    check_non_negative!(autotext.custom_frequency);

    check_positive!(learning.frequency_for_picked);
    check_non_negative!(learning.frequency_for_typed);
    check_positive!(learning.auto_validity_multiplier);
    check_positive!(learning.auto_promotion_multiplier);
    check_positive!(learning.frequency_for_auto_add);
    check_positive!(learning.user_word_frequency);
    check_positive!(learning.max_frequency);
    if s.learning.max_word_length < 2 {
        return Err(SettingsError::InvalidValue {
            field: "learning.max_word_length".to_string(),
            reason: "must be at least 2".to_string(),
        });
    }

    check_positive_usize!(dictionary.max_alternatives);
    check_positive_usize!(dictionary.max_words);
    check_positive!(dictionary.typed_letter_multiplier);
    check_positive!(dictionary.full_word_multiplier);
    check_positive_usize!(dictionary.max_depth_factor);

    for (i, rule) in s.t9_single_letter.iter().enumerate() {
        if rule.index == 0 {
            return Err(SettingsError::InvalidValue {
                field: format!("t9_single_letter[{i}].index"),
                reason: "must be at least 1".to_string(),
            });
        }
        if rule.codes.is_empty() {
            return Err(SettingsError::InvalidValue {
                field: format!("t9_single_letter[{i}].codes"),
                reason: "must not be empty".to_string(),
            });
        }
    }

    for (code, profile) in &s.languages {
        if profile.max_suggestions == Some(0) {
            return Err(SettingsError::InvalidValue {
                field: format!("languages.{code}.max_suggestions"),
                reason: "must be positive".to_string(),
            });
        }
    }

    Ok(())
}
