//! Translation dictionary tree.
//!
//! A dictionary maps string keys either to a translated string (leaf) or to a
//! nested dictionary (branch). Keys are addressed with dot paths such as
//! `auth.welcomeBack`.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::LoadError;

/// Separator between dot-path segments.
pub const KEY_SEPARATOR: char = '.';

/// A node in the translation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationNode {
    Leaf(String),
    Branch(BTreeMap<String, TranslationNode>),
}

/// Outcome of walking a dot path through one dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The path ends at a string leaf.
    Found(&'a str),
    /// The path exists but ends at a nested dictionary.
    NonLeaf,
    /// Some segment is missing, or an intermediate value is a leaf.
    Absent,
}

/// One language's full translation set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationDictionary {
    /// Top-level entries
    root: BTreeMap<String, TranslationNode>,
}

impl TranslationDictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from parsed JSON.
    ///
    /// Only strings and objects are kept. Numbers, booleans, nulls and arrays
    /// are not translatable and are dropped.
    ///
    /// # Errors
    /// Returns [`LoadError::InvalidRoot`] if `json` is not an object.
    pub fn from_json(json: &Value) -> Result<Self, LoadError> {
        match json {
            Value::Object(map) => Ok(Self { root: convert_object(map, None) }),
            other => Err(LoadError::InvalidRoot(json_kind(other))),
        }
    }

    /// Parse JSON text into a dictionary.
    ///
    /// # Errors
    /// Returns an error if the text is not valid JSON or its root is not an object.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let json: Value = serde_json::from_str(text)?;
        Self::from_json(&json)
    }

    /// Walk `key` segment by segment.
    ///
    /// Empty keys and keys with empty segments (`"."`, `"auth."`, `".auth"`,
    /// `"a..b"`) never match.
    #[must_use]
    pub fn get(&self, key: &str) -> Lookup<'_> {
        if key.split(KEY_SEPARATOR).any(str::is_empty) {
            return Lookup::Absent;
        }

        let mut segments = key.split(KEY_SEPARATOR);
        let Some(mut node) = segments.next().and_then(|first| self.root.get(first)) else {
            return Lookup::Absent;
        };

        for segment in segments {
            let TranslationNode::Branch(children) = node else {
                return Lookup::Absent;
            };
            let Some(child) = children.get(segment) else {
                return Lookup::Absent;
            };
            node = child;
        }

        match node {
            TranslationNode::Leaf(value) => Lookup::Found(value),
            TranslationNode::Branch(_) => Lookup::NonLeaf,
        }
    }

    /// Insert a leaf at `key`, creating intermediate branches.
    ///
    /// An existing leaf on the way is replaced by a branch.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let mut segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut children = &mut self.root;
        for segment in segments {
            let node = children
                .entry(segment.to_string())
                .or_insert_with(|| TranslationNode::Branch(BTreeMap::new()));
            if let TranslationNode::Leaf(_) = node {
                *node = TranslationNode::Branch(BTreeMap::new());
            }
            let TranslationNode::Branch(next) = node else {
                return;
            };
            children = next;
        }
        children.insert(last.to_string(), TranslationNode::Leaf(value.into()));
    }

    /// Flatten into a map of full dot-path keys to leaf strings.
    ///
    /// # Examples
    /// ```
    /// use serde_json::json;
    /// use markethub_i18n::dictionary::TranslationDictionary;
    ///
    /// let dictionary = TranslationDictionary::from_json(&json!({
    ///     "auth": { "signIn": "Sign in" }
    /// }))
    /// .unwrap();
    ///
    /// let flattened = dictionary.flatten();
    /// assert_eq!(flattened.get("auth.signIn"), Some(&"Sign in".to_string()));
    /// ```
    #[must_use]
    pub fn flatten(&self) -> BTreeMap<String, String> {
        let mut result = BTreeMap::new();
        flatten_nodes(&self.root, None, &mut result);
        result
    }

    /// Number of leaf strings.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        /// Leaves under `children`, recursively.
        fn count(children: &BTreeMap<String, TranslationNode>) -> usize {
            children
                .values()
                .map(|node| match node {
                    TranslationNode::Leaf(_) => 1,
                    TranslationNode::Branch(nested) => count(nested),
                })
                .sum()
        }
        count(&self.root)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Convert a JSON object into tree nodes, dropping non-translatable values.
fn convert_object(
    map: &serde_json::Map<String, Value>,
    prefix: Option<&str>,
) -> BTreeMap<String, TranslationNode> {
    let mut children = BTreeMap::new();
    for (key, value) in map {
        let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}{KEY_SEPARATOR}{key}"));
        match value {
            Value::String(text) => {
                children.insert(key.clone(), TranslationNode::Leaf(text.clone()));
            }
            Value::Object(nested) => {
                children.insert(
                    key.clone(),
                    TranslationNode::Branch(convert_object(nested, Some(&full_key))),
                );
            }
            other => {
                tracing::debug!(key = %full_key, kind = json_kind(other), "Skipping non-string translation value");
            }
        }
    }
    children
}

/// Append the leaves under `children` to `result`, keyed by full dot path.
fn flatten_nodes(
    children: &BTreeMap<String, TranslationNode>,
    prefix: Option<&str>,
    result: &mut BTreeMap<String, String>,
) {
    for (key, node) in children {
        let full_key = prefix.map_or_else(|| key.clone(), |p| format!("{p}{KEY_SEPARATOR}{key}"));
        match node {
            TranslationNode::Leaf(value) => {
                result.insert(full_key, value.clone());
            }
            TranslationNode::Branch(nested) => flatten_nodes(nested, Some(&full_key), result),
        }
    }
}

/// JSON type name used in logs and errors.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
