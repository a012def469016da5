//! Engine configuration
mod manager;
mod types;

pub use manager::ConfigManager;
pub use types::{
    CONFIG_FILE_NAME,
    CheckConfig,
    ConfigError,
    I18nSettings,
    TranslationFilesConfig,
    ValidationError,
};
