use std::process;

use crate::setup::{build_engine, suggest_word, EngineOptions, SuggestReport};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn suggest_cmd(opts: &EngineOptions, words: &[String], t9: bool, json: bool) {
    let mut engine = die!(build_engine(opts), "Error: {}");
    let reports: Vec<SuggestReport> = words
        .iter()
        .map(|w| suggest_word(&mut engine, w, t9))
        .collect();

    if json {
        let out = die!(serde_json::to_string_pretty(&reports), "Error: {}");
        println!("{out}");
        return;
    }
    for report in &reports {
        print_report(report);
    }
}

fn print_report(report: &SuggestReport) {
    let mut flags = Vec::new();
    if report.have_correction {
        flags.push("correction");
    }
    if report.auto_text_found {
        flags.push("autotext");
    }
    if flags.is_empty() {
        println!("{}", report.typed);
    } else {
        println!("{}  [{}]", report.typed, flags.join(", "));
    }
    if report.suggestions.is_empty() {
        println!("  (none)");
    }
    for (i, entry) in report.suggestions.iter().enumerate() {
        println!("  #{:>2}: {:<24} {:>10}", i, entry.text, entry.priority);
    }
}

pub fn valid_cmd(opts: &EngineOptions, word: &str, json: bool) {
    let engine = die!(build_engine(opts), "Error: {}");
    let valid = engine.suggest.is_valid_word(word, false, false);
    if json {
        println!("{}", serde_json::json!({ "word": word, "valid": valid }));
    } else {
        println!("{word}: {}", if valid { "valid" } else { "unknown" });
    }
}
