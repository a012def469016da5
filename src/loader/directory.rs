//! Loading dictionaries from JSON files in a locales directory.

use std::collections::BTreeMap;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

use futures::future::{
    BoxFuture,
    FutureExt,
};
use globset::Glob;
use ignore::WalkBuilder;

use super::DictionaryLoader;
use crate::dictionary::TranslationDictionary;
use crate::error::LoadError;
use crate::types::LanguageCode;

/// Loads `<language>.json` files discovered under a locales directory.
#[derive(Debug, Clone, Default)]
pub struct DirectoryLoader {
    /// Language code -> translation file
    files: BTreeMap<LanguageCode, PathBuf>,
}

impl DirectoryLoader {
    /// Scan `root` for translation files matching `file_pattern`.
    ///
    /// The pattern is matched against paths relative to `root`. Files whose
    /// language cannot be detected are skipped. When several files map to the
    /// same language the first in path order wins.
    ///
    /// # Errors
    /// - Invalid glob pattern
    /// - `root` is not a readable directory
    pub fn discover(root: &Path, file_pattern: &str) -> Result<Self, LoadError> {
        tracing::debug!(root = %root.display(), file_pattern, "Discovering translation files");

        if !root.is_dir() {
            return Err(LoadError::Discovery(format!(
                "'{}' is not a directory",
                root.display()
            )));
        }

        let matcher = Glob::new(file_pattern)
            .map_err(|e| LoadError::Discovery(format!("Invalid file pattern '{file_pattern}': {e}")))?
            .compile_matcher();

        let mut found = Vec::new();
        for result in WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .follow_links(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let Ok(relative_path) = path.strip_prefix(root) else {
                continue;
            };
            if matcher.is_match(relative_path) {
                found.push(path.to_path_buf());
            }
        }

        let mut files: BTreeMap<LanguageCode, PathBuf> = BTreeMap::new();
        for path in found {
            let Some(language) = detect_language_from_path(&path) else {
                tracing::debug!(path = %path.display(), "Skipping file without a language code");
                continue;
            };
            if let Some(existing) = files.get(&language) {
                tracing::warn!(
                    language = %language,
                    kept = %existing.display(),
                    ignored = %path.display(),
                    "Multiple translation files for one language"
                );
                continue;
            }
            files.insert(language, path);
        }

        tracing::debug!(languages = ?files.keys().collect::<Vec<_>>(), "Translation files discovered");
        Ok(Self { files })
    }

    /// Loader over an explicit language -> file mapping.
    #[must_use]
    pub const fn from_files(files: BTreeMap<LanguageCode, PathBuf>) -> Self {
        Self { files }
    }

    #[must_use]
    pub fn path_for(&self, language: &str) -> Option<&Path> {
        self.files.get(language).map(PathBuf::as_path)
    }
}

impl DictionaryLoader for DirectoryLoader {
    fn load<'a>(
        &'a self,
        language: &'a str,
    ) -> BoxFuture<'a, Result<Arc<TranslationDictionary>, LoadError>> {
        async move {
            let path =
                self.path_for(language).ok_or_else(|| LoadError::NotFound(language.to_string()))?;

            tracing::debug!(language, path = %path.display(), "Loading translation file");
            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

            let dictionary = TranslationDictionary::from_json_str(&content)?;
            tracing::debug!(language, leaves = dictionary.leaf_count(), "Translation file loaded");
            Ok(Arc::new(dictionary))
        }
        .boxed()
    }

    fn available_languages(&self) -> Vec<LanguageCode> {
        self.files.keys().cloned().collect()
    }
}

/// Detect the language of a translation file from its path.
///
/// The file stem is used when it looks like a language tag, otherwise the
/// parent directory name.
///
/// # Examples
/// - `locales/en.json` → `en`
/// - `locales/zh-CN.json` → `zh-CN`
/// - `locales/en/translation.json` → `en`
/// - `locales/common.json` → `None`
#[must_use]
pub fn detect_language_from_path(file_path: &Path) -> Option<String> {
    let file_stem = file_path.file_stem()?.to_string_lossy();
    if is_language_tag(&file_stem) {
        return Some(file_stem.into_owned());
    }

    let parent_name = file_path.parent()?.file_name()?.to_string_lossy();
    is_language_tag(&parent_name).then(|| parent_name.into_owned())
}

/// Loose BCP 47 shape check: a 2-3 letter primary subtag, then 2-8 character
/// alphanumeric subtags separated by `-` or `_`.
fn is_language_tag(candidate: &str) -> bool {
    let mut subtags = candidate.split(['-', '_']);
    let Some(primary) = subtags.next() else {
        return false;
    };
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    subtags.all(|subtag| {
        (2..=8).contains(&subtag.len()) && subtag.chars().all(|c| c.is_ascii_alphanumeric())
    })
}
