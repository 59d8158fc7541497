const REQUIRED_TABLES: &[&str] = &[
    "suggest",
    "commonality",
    "smart",
    "autotext",
    "learning",
    "dictionary",
    "languages",
];

fn main() {
    println!("cargo:rerun-if-changed=src/default_settings.toml");
    check_settings(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
}

fn check_settings(path: &str, content: &str) {
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("{path} contains invalid TOML: {e}"),
    };
    for name in REQUIRED_TABLES {
        if !table.get(*name).is_some_and(toml::Value::is_table) {
            panic!("{path} is missing the [{name}] table");
        }
    }
}
