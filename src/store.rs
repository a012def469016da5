//! Loaded dictionaries and key resolution.
//!
//! A [`TranslationStore`] pairs the current language's dictionary with the
//! fallback language's dictionary. Stores are immutable; a language switch
//! builds a new store and swaps it in whole, so readers never observe a
//! language paired with another language's dictionary.

use std::sync::Arc;

use crate::dictionary::{
    Lookup,
    TranslationDictionary,
};
use crate::types::LanguageCode;

/// A language code together with its loaded dictionary.
#[derive(Debug, Clone)]
pub struct LoadedLanguage {
    pub language: LanguageCode,
    pub dictionary: Arc<TranslationDictionary>,
}

impl LoadedLanguage {
    #[must_use]
    pub fn new(language: impl Into<LanguageCode>, dictionary: Arc<TranslationDictionary>) -> Self {
        Self { language: language.into(), dictionary }
    }

    /// A language with no translations loaded.
    #[must_use]
    pub fn empty(language: impl Into<LanguageCode>) -> Self {
        Self::new(language, Arc::new(TranslationDictionary::new()))
    }
}

/// Result of resolving a list of candidate keys across both languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Found {
        value: &'a str,
        key: &'a str,
        language: &'a str,
    },
    Missing {
        /// At least one candidate named a nested dictionary rather than a string.
        non_leaf: bool,
    },
}

/// Snapshot of the current and fallback dictionaries.
#[derive(Debug, Clone)]
pub struct TranslationStore {
    /// Language `translate` consults first
    current: LoadedLanguage,
    /// Language consulted when `current` lacks a key
    fallback: LoadedLanguage,
}

impl TranslationStore {
    #[must_use]
    pub const fn new(current: LoadedLanguage, fallback: LoadedLanguage) -> Self {
        Self { current, fallback }
    }

    /// Store where both roles use the same dictionary.
    #[must_use]
    pub fn single(loaded: LoadedLanguage) -> Self {
        Self { current: loaded.clone(), fallback: loaded }
    }

    #[must_use]
    pub fn current_language(&self) -> &str {
        &self.current.language
    }

    #[must_use]
    pub fn fallback_language(&self) -> &str {
        &self.fallback.language
    }

    #[must_use]
    pub const fn current(&self) -> &LoadedLanguage {
        &self.current
    }

    #[must_use]
    pub const fn fallback(&self) -> &LoadedLanguage {
        &self.fallback
    }

    /// New store with `current` replaced; the fallback is kept.
    #[must_use]
    pub fn with_current(&self, current: LoadedLanguage) -> Self {
        Self { current, fallback: self.fallback.clone() }
    }

    /// New store with the fallback dictionary replaced.
    ///
    /// When the current language is the fallback language it shares the new dictionary.
    #[must_use]
    pub fn with_fallback(&self, fallback: LoadedLanguage) -> Self {
        let current = if self.current.language == fallback.language {
            fallback.clone()
        } else {
            self.current.clone()
        };
        Self { current, fallback }
    }

    /// Dictionary for `language` if it is the current or fallback language.
    #[must_use]
    pub fn dictionary(&self, language: &str) -> Option<&TranslationDictionary> {
        if self.current.language == language {
            Some(&self.current.dictionary)
        } else if self.fallback.language == language {
            Some(&self.fallback.dictionary)
        } else {
            None
        }
    }

    /// Resolve `key` in one language.
    #[must_use]
    pub fn resolve(&self, key: &str, language: &str) -> Lookup<'_> {
        self.dictionary(language).map_or(Lookup::Absent, |dictionary| dictionary.get(key))
    }

    /// Try every candidate in the current language, then every candidate in
    /// the fallback language, returning the first string found.
    #[must_use]
    pub fn resolve_first<'a>(&'a self, candidates: &[&'a str]) -> Resolution<'a> {
        let mut non_leaf = false;

        for loaded in self.languages() {
            for &key in candidates {
                match loaded.dictionary.get(key) {
                    Lookup::Found(value) => {
                        return Resolution::Found { value, key, language: &loaded.language };
                    }
                    Lookup::NonLeaf => non_leaf = true,
                    Lookup::Absent => {}
                }
            }
        }

        Resolution::Missing { non_leaf }
    }

    /// Returns true if `key` resolves to a string in either language.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.resolve_first(&[key]), Resolution::Found { .. })
    }

    /// Current then fallback, skipping the fallback when it is the same language.
    fn languages(&self) -> impl Iterator<Item = &LoadedLanguage> {
        let fallback = (self.fallback.language != self.current.language).then_some(&self.fallback);
        std::iter::once(&self.current).chain(fallback)
    }
}
