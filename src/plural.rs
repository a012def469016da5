//! Plural key selection.
//!
//! A pluralizable key has a singular form (`products.productCount`) and a
//! plural form with a suffix (`products.productCount_plural`).

use std::borrow::Cow;

use crate::types::ParamValue;

/// Default suffix appended to the base key for the plural form.
pub const PLURAL_SUFFIX: &str = "_plural";

/// Select the key to try first for `count`.
///
/// Only numeric counts pluralize. Exactly `1` keeps the base key; any other
/// number (zero, negative, fractional) selects `<base_key><suffix>`.
#[must_use]
pub fn resolve_plural_key<'a>(
    base_key: &'a str,
    count: Option<&ParamValue>,
    suffix: &str,
) -> Cow<'a, str> {
    match count.and_then(ParamValue::as_number) {
        Some(count) if is_plural(count) => Cow::Owned(format!("{base_key}{suffix}")),
        _ => Cow::Borrowed(base_key),
    }
}

/// Returns true if `count` takes the plural form.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_plural(count: f64) -> bool {
    count != 1.0
}

/// Returns the base key by stripping the plural suffix, or `None` if no suffix found.
#[must_use]
pub fn plural_base_key<'a>(key: &'a str, suffix: &str) -> Option<&'a str> {
    key.strip_suffix(suffix).filter(|base| !base.is_empty())
}
