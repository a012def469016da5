//! Core types used throughout the engine.

use std::borrow::Cow;
use std::collections::HashMap;

/// Language identifier (e.g., `"en"`, `"zh"`).
pub type LanguageCode = String;

/// Name of the parameter that drives pluralization.
pub const COUNT_PARAM: &str = "count";

/// A value supplied for a `{{name}}` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(f64),
    /// Explicitly provided but empty; rendered as if the parameter were absent.
    Null,
}

impl ParamValue {
    /// Returns the numeric value, or `None` for text and null.
    ///
    /// Numeric-looking text such as `"2"` is not a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) | Self::Null => None,
        }
    }

    /// String form used for substitution, or `None` when the value is null.
    #[must_use]
    pub fn render(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(text) => Some(Cow::Borrowed(text.as_str())),
            Self::Number(value) => Some(Cow::Owned(format_number(*value))),
            Self::Null => None,
        }
    }
}

/// Plain decimal rendering: no grouping, no trailing `.0` on integral values.
#[allow(clippy::float_cmp)]
fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() { "Infinity" } else { "-Infinity" }.to_string();
    }
    // -0 renders as "0"
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for ParamValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<usize> for ParamValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl<T: Into<Self>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Placeholder values passed to `translate`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationParams {
    values: HashMap<String, ParamValue>,
}

impl TranslationParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// The `count` parameter when it is a genuine number.
    #[must_use]
    pub fn count(&self) -> Option<f64> {
        self.get(COUNT_PARAM).and_then(ParamValue::as_number)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TranslationParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
