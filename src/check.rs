//! Consistency checks over translation dictionaries.
//!
//! - Key parity: every language provides the reference language's keys.
//! - Orphan plurals: a plural form without its singular cannot degrade.
//! - Foreign script: values of a language (usually English) containing CJK text.

use std::collections::{
    BTreeMap,
    BTreeSet,
};

use crate::dictionary::TranslationDictionary;
use crate::plural::plural_base_key;
use crate::types::LanguageCode;

/// Key differences of one language against the reference language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageParity {
    /// Keys present in the reference language but not here
    pub missing: Vec<String>,
    /// Keys present here but not in the reference language
    pub extra: Vec<String>,
}

impl LanguageParity {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Key parity of every language against a reference language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityReport {
    pub reference: LanguageCode,
    pub languages: BTreeMap<LanguageCode, LanguageParity>,
}

impl ParityReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.languages.values().all(LanguageParity::is_clean)
    }
}

/// Compare the leaf keys of each language with the reference dictionary.
///
/// The reference language itself is skipped if it appears in `languages`.
#[must_use]
pub fn check_parity<'a, I>(
    reference_language: &str,
    reference: &TranslationDictionary,
    languages: I,
) -> ParityReport
where
    I: IntoIterator<Item = (&'a str, &'a TranslationDictionary)>,
{
    let reference_keys: BTreeSet<String> = reference.flatten().into_keys().collect();

    let mut report = ParityReport {
        reference: reference_language.to_string(),
        languages: BTreeMap::new(),
    };

    for (language, dictionary) in languages {
        if language == reference_language {
            continue;
        }
        let keys: BTreeSet<String> = dictionary.flatten().into_keys().collect();
        let parity = LanguageParity {
            missing: reference_keys.difference(&keys).cloned().collect(),
            extra: keys.difference(&reference_keys).cloned().collect(),
        };
        tracing::debug!(
            language,
            missing = parity.missing.len(),
            extra = parity.extra.len(),
            "Checked key parity"
        );
        report.languages.insert(language.to_string(), parity);
    }

    report
}

/// Plural keys whose singular form does not exist as a string.
#[must_use]
pub fn find_orphan_plurals(dictionary: &TranslationDictionary, suffix: &str) -> Vec<String> {
    let flattened = dictionary.flatten();
    flattened
        .keys()
        .filter(|key| {
            plural_base_key(key, suffix).is_some_and(|base| !flattened.contains_key(base))
        })
        .cloned()
        .collect()
}

/// A translation value containing characters from a CJK script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignScriptEntry {
    pub key: String,
    pub value: String,
}

/// Values that contain Chinese, Japanese or Korean characters.
#[must_use]
pub fn find_foreign_script(dictionary: &TranslationDictionary) -> Vec<ForeignScriptEntry> {
    dictionary
        .flatten()
        .into_iter()
        .filter(|(_, value)| value.chars().any(is_cjk))
        .map(|(key, value)| ForeignScriptEntry { key, value })
        .collect()
}

/// Returns true for CJK ideographs, kana, hangul and CJK/fullwidth punctuation.
const fn is_cjk(c: char) -> bool {
    matches!(
        c,
        '\u{3000}'..='\u{303F}' // CJK symbols and punctuation
            | '\u{3040}'..='\u{30FF}' // Hiragana, Katakana
            | '\u{3400}'..='\u{4DBF}' // CJK extension A
            | '\u{4E00}'..='\u{9FFF}' // CJK unified ideographs
            | '\u{AC00}'..='\u{D7AF}' // Hangul syllables
            | '\u{F900}'..='\u{FAFF}' // CJK compatibility ideographs
            | '\u{FF00}'..='\u{FFEF}' // Halfwidth and fullwidth forms
    )
}
