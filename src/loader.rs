//! Dictionary loading.
//!
//! Loaders hide where dictionaries come from: a bundle compiled into the
//! application ([`StaticLoader`]) or JSON files on disk ([`DirectoryLoader`]).

mod directory;

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::{
    self,
    BoxFuture,
    FutureExt,
};
use serde_json::Value;

pub use self::directory::{
    DirectoryLoader,
    detect_language_from_path,
};
use crate::dictionary::TranslationDictionary;
use crate::error::LoadError;
use crate::types::LanguageCode;

/// Source of translation dictionaries.
pub trait DictionaryLoader: Send + Sync + std::fmt::Debug {
    /// Load the full dictionary for `language`.
    fn load<'a>(
        &'a self,
        language: &'a str,
    ) -> BoxFuture<'a, Result<Arc<TranslationDictionary>, LoadError>>;

    /// Languages this loader can provide.
    fn available_languages(&self) -> Vec<LanguageCode>;
}

/// Dictionaries held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    /// Language code -> dictionary
    dictionaries: BTreeMap<LanguageCode, Arc<TranslationDictionary>>,
}

impl StaticLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, language: impl Into<LanguageCode>, dictionary: TranslationDictionary) -> Self {
        self.insert(language, dictionary);
        self
    }

    pub fn insert(&mut self, language: impl Into<LanguageCode>, dictionary: TranslationDictionary) {
        self.dictionaries.insert(language.into(), Arc::new(dictionary));
    }

    /// Insert a dictionary built from parsed JSON.
    ///
    /// # Errors
    /// Returns an error if the JSON root is not an object.
    pub fn insert_json(
        &mut self,
        language: impl Into<LanguageCode>,
        json: &Value,
    ) -> Result<(), LoadError> {
        self.insert(language, TranslationDictionary::from_json(json)?);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, language: &str) -> Option<Arc<TranslationDictionary>> {
        self.dictionaries.get(language).cloned()
    }
}

impl DictionaryLoader for StaticLoader {
    fn load<'a>(
        &'a self,
        language: &'a str,
    ) -> BoxFuture<'a, Result<Arc<TranslationDictionary>, LoadError>> {
        let result = self.get(language).ok_or_else(|| LoadError::NotFound(language.to_string()));
        future::ready(result).boxed()
    }

    fn available_languages(&self) -> Vec<LanguageCode> {
        self.dictionaries.keys().cloned().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::dictionary::Lookup;

    #[tokio::test]
    async fn static_loader_returns_inserted_dictionary() {
        let mut loader = StaticLoader::new();
        loader.insert_json("en", &json!({ "home": { "title": "Home" } })).unwrap();

        let dictionary = loader.load("en").await.unwrap();

        assert_eq!(dictionary.get("home.title"), Lookup::Found("Home"));
    }

    #[test]
    fn static_loader_reports_unknown_language() {
        let loader = StaticLoader::new().with("en", TranslationDictionary::new());

        let result = tokio_test::block_on(loader.load("fr"));

        assert!(matches!(result, Err(LoadError::NotFound(language)) if language == "fr"));
    }

    #[googletest::test]
    fn static_loader_lists_languages_sorted() {
        let loader = StaticLoader::new()
            .with("zh", TranslationDictionary::new())
            .with("en", TranslationDictionary::new());

        assert_eq!(loader.available_languages(), vec!["en", "zh"]);
    }

    #[googletest::test]
    fn insert_json_rejects_non_object_root() {
        let mut loader = StaticLoader::new();

        expect_that!(loader.insert_json("en", &json!(["a"])).is_err(), eq(true));
        expect_that!(loader.get("en").is_none(), eq(true));
    }
}
