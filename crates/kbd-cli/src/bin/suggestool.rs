use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use kbd_cli::commands::{config_ops, korean_ops, suggest_ops};
use kbd_cli::EngineOptions;
use kbd_core::suggest::CorrectionMode;

#[derive(Parser)]
#[command(name = "suggestool", about = "Keyboard suggestion diagnostics")]
struct Cli {
    /// Print engine traces to stderr (filter with RUST_LOG)
    #[arg(long, global = true)]
    trace: bool,

    /// Custom settings TOML to use instead of the defaults
    #[arg(long, global = true)]
    settings: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Correction {
    None,
    Basic,
    Full,
}

impl From<Correction> for CorrectionMode {
    fn from(c: Correction) -> Self {
        match c {
            Correction::None => CorrectionMode::None,
            Correction::Basic => CorrectionMode::Basic,
            Correction::Full => CorrectionMode::Full,
        }
    }
}

#[derive(clap::Args)]
struct Sources {
    /// Main word list (word<TAB>freq per line)
    main: PathBuf,
    /// User word list; new words are appended to it
    #[arg(long)]
    user: Option<PathBuf>,
    /// Contact names, one per line
    #[arg(long)]
    contacts: Option<PathBuf>,
    /// Built-in autotext table ([entries] TOML)
    #[arg(long)]
    autotext: Option<PathBuf>,
    /// User shortcuts ([[entry]] TOML)
    #[arg(long)]
    custom_autotext: Option<PathBuf>,
    /// Usage count log; enables smart weighting
    #[arg(long)]
    smart: Option<PathBuf>,
    /// Language code
    #[arg(long, default_value = "EN")]
    lang: String,
    /// Correction mode (defaults to the settings value)
    #[arg(long, value_enum)]
    correction: Option<Correction>,
}

impl Sources {
    fn into_options(self) -> EngineOptions {
        EngineOptions {
            main: self.main,
            user: self.user,
            contacts: self.contacts,
            autotext: self.autotext,
            custom_autotext: self.custom_autotext,
            smart: self.smart,
            lang: self.lang,
            correction: self.correction.map(Into::into),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Rank suggestions for each word
    Suggest {
        #[command(flatten)]
        sources: Sources,
        /// Words to look up (keypad digits with --t9)
        #[arg(required = true)]
        words: Vec<String>,
        /// Treat input as phone keypad digits
        #[arg(long)]
        t9: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check whether a word is known to any dictionary
    Valid {
        #[command(flatten)]
        sources: Sources,
        word: String,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Settings TOML helpers
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Korean jamo conversion
    Korean {
        #[command(subcommand)]
        action: KoreanAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Export default settings as TOML
    Export,
    /// Validate a custom settings TOML file
    Validate {
        /// Path to the TOML file
        file: String,
    },
}

#[derive(Subcommand)]
enum KoreanAction {
    /// Compose jamo into syllables
    Convert { text: String },
    /// Decompose syllables into jamo
    Reverse { text: String },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    if cli.trace {
        init_tracing();
    }
    if let Some(file) = &cli.settings {
        config_ops::settings_install(file);
    }

    match cli.command {
        Command::Suggest {
            sources,
            words,
            t9,
            json,
        } => suggest_ops::suggest_cmd(&sources.into_options(), &words, t9, json),
        Command::Valid {
            sources,
            word,
            json,
        } => suggest_ops::valid_cmd(&sources.into_options(), &word, json),
        Command::Settings { action } => match action {
            SettingsAction::Export => config_ops::settings_export(),
            SettingsAction::Validate { file } => config_ops::settings_validate(&file),
        },
        Command::Korean { action } => match action {
            KoreanAction::Convert { text } => korean_ops::korean_convert(&text),
            KoreanAction::Reverse { text } => korean_ops::korean_reverse(&text),
        },
    }
}
