//! `{{name}}` placeholder substitution.

use std::borrow::Cow;

use crate::types::{
    ParamValue,
    TranslationParams,
};

/// Opening placeholder delimiter.
const OPEN: &str = "{{";
/// Closing placeholder delimiter.
const CLOSE: &str = "}}";

/// Substitute every `{{name}}` in `template` with the matching parameter.
///
/// Placeholders whose parameter is absent or null are left untouched. Values
/// are inserted verbatim and never scanned again.
///
/// # Examples
/// ```
/// use markethub_i18n::interpolate::interpolate;
/// use markethub_i18n::TranslationParams;
///
/// let params = TranslationParams::new().with("name", "John");
/// assert_eq!(
///     interpolate("Hello {{name}}, you have {{count}} messages", &params),
///     "Hello John, you have {{count}} messages"
/// );
/// ```
#[must_use]
pub fn interpolate(template: &str, params: &TranslationParams) -> String {
    interpolate_with(template, |name| params.get(name).and_then(ParamValue::render))
}

/// Substitute placeholders using `lookup` to produce each value.
///
/// `lookup` returning `None` keeps the placeholder text as-is.
pub fn interpolate_with<'p, F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<Cow<'p, str>>,
{
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        let (before, from_open) = rest.split_at(start);
        output.push_str(before);

        let Some(body) = from_open.strip_prefix(OPEN) else {
            break;
        };

        match placeholder(body) {
            Some((name, after)) => {
                if let Some(value) = lookup(name) {
                    output.push_str(&value);
                } else {
                    output.push_str(OPEN);
                    output.push_str(name);
                    output.push_str(CLOSE);
                }
                rest = after;
            }
            None => {
                // Not a placeholder here; retry from the next brace.
                output.push('{');
                rest = from_open.strip_prefix('{').unwrap_or_default();
            }
        }
    }

    output.push_str(rest);
    output
}

/// Names of the placeholders in `template`, in order of appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find(OPEN) {
        let body = rest.get(start + OPEN.len()..).unwrap_or_default();
        if let Some((name, after)) = placeholder(body) {
            names.push(name);
            rest = after;
        } else {
            rest = rest.get(start + 1..).unwrap_or_default();
        }
    }
    names
}

/// Split `body` (text following `{{`) into a placeholder name and the text after `}}`.
fn placeholder(body: &str) -> Option<(&str, &str)> {
    let end = body.find(['{', '}'])?;
    let (name, tail) = body.split_at(end);
    if name.is_empty() {
        return None;
    }
    let after = tail.strip_prefix(CLOSE)?;
    Some((name, after))
}
