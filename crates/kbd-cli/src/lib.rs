pub mod commands;
pub mod setup;

pub use setup::{build_engine, suggest_word, CliError, Engine, EngineOptions, SuggestReport};
