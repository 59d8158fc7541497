use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum AutoTextConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid autotext entry #{index}: {reason}")]
    InvalidEntry { index: usize, reason: String },
}

#[derive(Deserialize)]
struct TableFile {
    #[serde(default)]
    entries: HashMap<String, String>,
}

#[derive(Deserialize)]
struct CustomFile {
    #[serde(default)]
    entry: Vec<CustomEntry>,
}

#[derive(Deserialize)]
struct CustomEntry {
    key: String,
    value: String,
}

/// Parse a built-in expansion table (`[entries]` with `key = "value"`).
pub fn parse_autotext_toml(toml_str: &str) -> Result<HashMap<String, String>, AutoTextConfigError> {
    let file: TableFile =
        toml::from_str(toml_str).map_err(|e| AutoTextConfigError::Parse(e.to_string()))?;
    if let Some(key) = file.entries.keys().find(|k| k.is_empty()) {
        return Err(AutoTextConfigError::InvalidEntry {
            index: 0,
            reason: format!("empty key {key:?}"),
        });
    }
    Ok(file.entries)
}

/// Parse user shortcuts (`[[entry]]` tables with `key` and `value`). A key
/// may appear more than once.
pub fn parse_custom_autotext_toml(
    toml_str: &str,
) -> Result<Vec<(String, String)>, AutoTextConfigError> {
    let file: CustomFile =
        toml::from_str(toml_str).map_err(|e| AutoTextConfigError::Parse(e.to_string()))?;
    let mut entries = Vec::with_capacity(file.entry.len());
    for (index, e) in file.entry.into_iter().enumerate() {
        if e.key.is_empty() {
            return Err(AutoTextConfigError::InvalidEntry {
                index,
                reason: "empty key".to_string(),
            });
        }
        if e.value.is_empty() {
            return Err(AutoTextConfigError::InvalidEntry {
                index,
                reason: format!("empty value for {:?}", e.key),
            });
        }
        entries.push((e.key, e.value));
    }
    Ok(entries)
}
