use std::path::Path;
use std::process;

use kbd_core::settings;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let s = die!(
        settings::load_settings_file(Path::new(file)),
        "Error in {file}: {}"
    );
    println!(
        "OK: suggest.max_suggestions={}, suggest.correction_mode={:?}, t9 rules={}",
        s.suggest.max_suggestions,
        s.suggest.correction_mode,
        s.t9_single_letter.len()
    );
}

/// Install a custom settings file before anything reads the defaults.
pub fn settings_install(file: &str) {
    let content = die!(std::fs::read_to_string(file), "Error reading {file}: {}");
    die!(settings::init_custom(content), "Error in {file}: {}");
}
