//! markethub-i18n
//!
//! Translation lookup, interpolation and pluralization engine for the MarketHub storefront.

pub mod check;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod events;
pub mod interpolate;
pub mod loader;
pub mod missing;
pub mod plural;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use error::{
    I18nError,
    LoadError,
};
pub use service::I18nService;
pub use types::{
    LanguageCode,
    ParamValue,
    TranslationParams,
};
