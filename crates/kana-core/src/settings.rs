//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

use crate::mode::ModeConfig;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Smallest output growth step: room for the largest single-step emission
/// (a flushed base plus a decomposed voiced kana) with margin.
pub const MIN_OUTPUT_CHUNK: usize = 12;

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
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

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub stream: StreamSettings,
    pub convert: ConvertSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    /// Bytes added to the output buffer each time a whole-buffer conversion
    /// runs out of room.
    pub output_chunk: usize,
    /// Bytes read per iteration when streaming from a reader.
    pub input_chunk: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertSettings {
    pub default_mode: String,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    if s.stream.output_chunk < MIN_OUTPUT_CHUNK {
        return Err(SettingsError::InvalidValue {
            field: "stream.output_chunk".to_string(),
            reason: format!("must be at least {MIN_OUTPUT_CHUNK}"),
        });
    }
    if s.stream.input_chunk == 0 {
        return Err(SettingsError::InvalidValue {
            field: "stream.input_chunk".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if let Err(e) = ModeConfig::parse(&s.convert.default_mode) {
        return Err(SettingsError::InvalidValue {
            field: "convert.default_mode".to_string(),
            reason: e.to_string(),
        });
    }
    Ok(())
}
