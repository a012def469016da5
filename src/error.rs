//! Errors surfaced by the engine.
//!
//! String resolution never fails observably; only language switching and
//! dictionary loading report errors.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::LanguageCode;

/// Errors from loading a single translation dictionary.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No dictionary is known for the language
    #[error("No translation dictionary available for language '{0}'")]
    NotFound(LanguageCode),
    /// Error when failing to read a translation file
    #[error("Failed to read translation file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Error when the translation file is not valid JSON
    #[error("Failed to parse translation JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Error when the JSON root is not an object
    #[error("Translation root must be a JSON object, found {0}")]
    InvalidRoot(&'static str),
    /// Error when scanning the locales directory
    #[error("Failed to scan locales directory: {0}")]
    Discovery(String),
}

/// Errors from language management.
#[derive(Error, Debug)]
pub enum I18nError {
    #[error("Unsupported language '{language}' (supported: {})", .supported.join(", "))]
    UnsupportedLanguage { language: LanguageCode, supported: Vec<LanguageCode> },

    #[error("Failed to load dictionary for '{language}': {source}")]
    LoadFailed {
        language: LanguageCode,
        #[source]
        source: LoadError,
    },
}

impl I18nError {
    /// The language the failed operation targeted.
    #[must_use]
    pub fn language(&self) -> &str {
        match self {
            Self::UnsupportedLanguage { language, .. } | Self::LoadFailed { language, .. } => {
                language
            }
        }
    }
}
