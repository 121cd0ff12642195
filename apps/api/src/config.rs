use thiserror::Error;

use crate::extraction::quality::DEFAULT_MIN_TEXT_CHARS;

const DEFAULT_PORT: u16 = 1000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_OCR_DPI: u32 = 300;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Required credential '{0}' is not set")]
    MissingCredential(&'static str),

    #[error("Environment variable '{key}' has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if the LLM credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Quality gate threshold, in characters of trimmed text.
    pub min_text_chars: usize,
    pub max_upload_bytes: usize,
    pub ocr_lang: String,
    pub ocr_dpi: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingCredential("API_KEY"))?;

        Ok(Config {
            api_key,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            min_text_chars: parse_or(&lookup, "MIN_TEXT_CHARS", DEFAULT_MIN_TEXT_CHARS)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            ocr_lang: lookup("OCR_LANG").unwrap_or_else(|| "eng".to_string()),
            ocr_dpi: parse_or(&lookup, "OCR_DPI", DEFAULT_OCR_DPI)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
