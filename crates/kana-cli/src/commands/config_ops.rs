use std::fs;

use super::die;

pub fn settings_export() {
    print!("{}", kana_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        kana_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: stream.output_chunk={}, stream.input_chunk={}, convert.default_mode={}",
        s.stream.output_chunk, s.stream.input_chunk, s.convert.default_mode
    );
}

/// Install settings from `file` before anything reads them.
pub fn load_settings(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(
        kana_core::settings::init_custom(content),
        "Error loading settings: {}"
    );
}
