//! Command-line interface.
//!
//! Subcommands operate on a workspace: the configuration file at its root
//! and the translation files under its locales directory.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{
    Args,
    Parser,
    Subcommand,
};
use thiserror::Error;

use crate::check::{
    check_parity,
    find_foreign_script,
    find_orphan_plurals,
};
use crate::config::{
    ConfigError,
    ConfigManager,
    I18nSettings,
};
use crate::dictionary::TranslationDictionary;
use crate::error::{
    I18nError,
    LoadError,
};
use crate::loader::{
    DictionaryLoader,
    DirectoryLoader,
};
use crate::service::I18nService;
use crate::types::{
    COUNT_PARAM,
    LanguageCode,
    TranslationParams,
};

#[derive(Debug, Parser)]
#[command(
    name = "markethub-i18n",
    about = "Resolve and check MarketHub translation dictionaries",
    version
)]
pub struct Cli {
    /// Workspace root holding the configuration file
    #[arg(short, long, global = true, default_value = ".")]
    pub workspace: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Translate a key.
    Translate(TranslateArgs),

    /// List supported languages and their translation files.
    Languages,

    /// Check key parity between languages and stray CJK text.
    Check,
}

#[derive(Debug, Args)]
pub struct TranslateArgs {
    /// Dot-separated translation key
    pub key: String,

    /// Language to translate into (defaults to `defaultLanguage`)
    #[arg(short, long)]
    pub lang: Option<LanguageCode>,

    /// Interpolation parameter as `name=value`
    #[arg(short, long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Numeric count used for pluralization and `{{count}}`
    #[arg(short, long, allow_negative_numbers = true)]
    pub count: Option<f64>,
}

impl TranslateArgs {
    /// Parameters for `translate`, with `--count` as a number.
    fn translation_params(&self) -> TranslationParams {
        let mut params: TranslationParams =
            self.params.iter().map(|(name, value)| (name.clone(), value.clone())).collect();
        if let Some(count) = self.count {
            params.insert(COUNT_PARAM, count);
        }
        params
    }
}

/// Parse a `--param` value of the form `NAME=VALUE`.
fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    I18n(#[from] I18nError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// A missing key or a failed check
    ProblemsFound,
}

/// Run a parsed command, writing its report to `out`.
///
/// # Errors
/// Configuration, discovery and load failures, and write errors.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<Outcome, CliError> {
    let config = ConfigManager::load(&cli.workspace)?;
    let settings = config.settings();
    let locales_path = config.locales_path();

    let loader =
        DirectoryLoader::discover(&locales_path, &settings.translation_files.file_pattern)?;

    match cli.command {
        Commands::Translate(args) => translate(settings, loader, &args, out).await,
        Commands::Languages => languages(settings, &loader, out),
        Commands::Check => check(settings, &loader, out).await,
    }
}

/// `translate`: print one resolved string.
async fn translate<W: Write>(
    settings: &I18nSettings,
    loader: DirectoryLoader,
    args: &TranslateArgs,
    out: &mut W,
) -> Result<Outcome, CliError> {
    let service = I18nService::start(settings, Arc::new(loader)).await;
    if let Some(language) = &args.lang {
        service.set_language(language).await?;
    }

    let text = service.translate(&args.key, &args.translation_params());
    writeln!(out, "{text}")?;

    if service.missing_keys().is_empty() {
        Ok(Outcome::Success)
    } else {
        tracing::warn!(key = %args.key, language = %service.language(), "No translation found");
        Ok(Outcome::ProblemsFound)
    }
}

/// `languages`: one line per supported language with its roles and file.
fn languages<W: Write>(
    settings: &I18nSettings,
    loader: &DirectoryLoader,
    out: &mut W,
) -> Result<Outcome, CliError> {
    for language in &settings.supported_languages {
        let mut roles = Vec::new();
        if *language == settings.default_language {
            roles.push("default");
        }
        if *language == settings.fallback_language {
            roles.push("fallback");
        }
        let label = if roles.is_empty() {
            language.clone()
        } else {
            format!("{language} ({})", roles.join(", "))
        };
        let file = loader
            .path_for(language)
            .map_or_else(|| "-".to_string(), |path| path.display().to_string());
        writeln!(out, "{label}\t{file}")?;
    }
    Ok(Outcome::Success)
}

/// `check`: missing files, key parity, orphan plurals and CJK text.
async fn check<W: Write>(
    settings: &I18nSettings,
    loader: &DirectoryLoader,
    out: &mut W,
) -> Result<Outcome, CliError> {
    let mut dictionaries: BTreeMap<LanguageCode, Arc<TranslationDictionary>> = BTreeMap::new();
    for language in loader.available_languages() {
        let dictionary = loader.load(&language).await?;
        dictionaries.insert(language, dictionary);
    }

    let reference_language = settings.reference_language();
    let reference = dictionaries
        .get(reference_language)
        .ok_or_else(|| LoadError::NotFound(reference_language.to_string()))?;

    let mut problems = 0usize;
    writeln!(out, "Reference language: {reference_language}")?;

    for language in &settings.supported_languages {
        if !dictionaries.contains_key(language) {
            writeln!(out, "{language}: no translation file")?;
            problems += 1;
        }
    }

    let report = check_parity(
        reference_language,
        reference,
        dictionaries.iter().map(|(language, dictionary)| (language.as_str(), dictionary.as_ref())),
    );
    for (language, parity) in &report.languages {
        for key in &parity.missing {
            writeln!(out, "{language}: missing key '{key}'")?;
        }
        for key in &parity.extra {
            writeln!(out, "{language}: extra key '{key}'")?;
        }
        problems += parity.missing.len() + parity.extra.len();
    }

    for (language, dictionary) in &dictionaries {
        for key in find_orphan_plurals(dictionary, &settings.plural_suffix) {
            writeln!(out, "{language}: plural key '{key}' has no singular form")?;
            problems += 1;
        }
    }

    for language in &settings.check.foreign_script_languages {
        let Some(dictionary) = dictionaries.get(language) else {
            continue;
        };
        for entry in find_foreign_script(dictionary) {
            writeln!(out, "{language}: CJK text in '{}': {}", entry.key, entry.value)?;
            problems += 1;
        }
    }

    if problems == 0 {
        writeln!(out, "No problems found")?;
        Ok(Outcome::Success)
    } else {
        writeln!(out, "{problems} problem(s) found")?;
        Ok(Outcome::ProblemsFound)
    }
}
