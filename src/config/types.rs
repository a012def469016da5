use std::collections::HashSet;
use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Configuration file looked up at the workspace root.
pub const CONFIG_FILE_NAME: &str = ".markethub-i18n.json";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "supportedLanguages[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// One numbered line per validation error.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Language active at startup.
    pub default_language: String,

    /// Language consulted when a key is missing from the current language.
    /// Fixed for the lifetime of an engine.
    pub fallback_language: String,

    /// Languages `setLanguage` accepts, in display order.
    pub supported_languages: Vec<String>,

    /// Directory holding translation files, relative to the workspace root.
    pub locales_dir: PathBuf,

    pub translation_files: TranslationFilesConfig,

    /// Suffix of the plural form of a key (`items` -> `items_plural`).
    pub plural_suffix: String,

    pub check: CheckConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    pub file_pattern: String,
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self { file_pattern: "**/*.json".to_string() }
    }
}

/// Settings for the `check` command.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckConfig {
    /// Language whose keys every other language must provide.
    /// If unset, the fallback language is used.
    pub reference_language: Option<String>,

    /// Languages whose values must not contain CJK characters.
    pub foreign_script_languages: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { reference_language: None, foreign_script_languages: vec!["en".to_string()] }
    }
}

impl I18nSettings {
    /// Reference language for key parity checks.
    #[must_use]
    pub fn reference_language(&self) -> &str {
        self.check.reference_language.as_deref().unwrap_or(&self.fallback_language)
    }

    #[must_use]
    pub fn is_supported(&self, language: &str) -> bool {
        self.supported_languages.iter().any(|supported| supported == language)
    }

    /// # Errors
    /// - Required field is empty
    /// - Language not listed in `supportedLanguages`
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.supported_languages.is_empty() {
            errors.push(ValidationError::new(
                "supportedLanguages",
                "At least one language is required. Example: [\"en\", \"zh\"]",
            ));
        }

        let mut seen = HashSet::new();
        for (index, language) in self.supported_languages.iter().enumerate() {
            if language.is_empty() {
                errors.push(ValidationError::new(
                    format!("supportedLanguages[{index}]"),
                    "The language code cannot be empty",
                ));
            } else if !seen.insert(language.as_str()) {
                errors.push(ValidationError::new(
                    format!("supportedLanguages[{index}]"),
                    format!("Duplicate language code '{language}'"),
                ));
            }
        }

        self.validate_listed_language("fallbackLanguage", &self.fallback_language, &mut errors);
        self.validate_listed_language("defaultLanguage", &self.default_language, &mut errors);

        if let Some(reference) = &self.check.reference_language {
            self.validate_listed_language("check.referenceLanguage", reference, &mut errors);
        }

        for (index, language) in self.check.foreign_script_languages.iter().enumerate() {
            self.validate_listed_language(
                &format!("check.foreignScriptLanguages[{index}]"),
                language,
                &mut errors,
            );
        }

        if self.plural_suffix.is_empty() {
            errors.push(ValidationError::new(
                "pluralSuffix",
                "The suffix cannot be empty. Please specify a suffix, for example: \"_plural\"",
            ));
        }

        if self.translation_files.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.filePattern",
                "The pattern cannot be empty. Example: \"**/*.json\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.translation_files.file_pattern) {
            errors.push(ValidationError::new(
                "translationFiles.filePattern",
                format!("Invalid glob pattern '{}': {e}", self.translation_files.file_pattern),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Checks that `language` is non-empty and listed in `supportedLanguages`.
    fn validate_listed_language(
        &self,
        field_path: &str,
        language: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        if language.is_empty() {
            errors.push(ValidationError::new(field_path, "The language code cannot be empty"));
        } else if !self.is_supported(language) {
            errors.push(ValidationError::new(
                field_path,
                format!("Language '{language}' is not listed in 'supportedLanguages'"),
            ));
        }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            fallback_language: "en".to_string(),
            supported_languages: vec!["en".to_string(), "zh".to_string()],
            locales_dir: PathBuf::from("locales"),
            translation_files: TranslationFilesConfig::default(),
            plural_suffix: crate::plural::PLURAL_SUFFIX.to_string(),
            check: CheckConfig::default(),
        }
    }
}
