//! ワークスペース設定の読み込み

use std::path::{
    Path,
    PathBuf,
};

use super::{
    CONFIG_FILE_NAME,
    ConfigError,
    I18nSettings,
};

/// ワークスペースに対して検証済みの設定
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 検証済みの設定
    settings: I18nSettings,

    /// ワークスペースのルートパス
    workspace_root: PathBuf,
}

impl ConfigManager {
    /// ワークスペースの `.markethub-i18n.json` を読み込んで検証する
    ///
    /// 設定ファイルがなければデフォルト設定を使う
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load(workspace_root: &Path) -> Result<Self, ConfigError> {
        let settings = read_settings(&workspace_root.join(CONFIG_FILE_NAME))?.unwrap_or_default();
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        tracing::debug!(workspace = %workspace_root.display(), ?settings, "Settings loaded");

        Ok(Self { settings, workspace_root: workspace_root.to_path_buf() })
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn settings(&self) -> &I18nSettings {
        &self.settings
    }

    /// 翻訳ファイルのディレクトリを取得
    ///
    /// `localesDir` が相対パスの場合はワークスペースルートからの相対パスとして解決する
    #[must_use]
    pub fn locales_path(&self) -> PathBuf {
        let locales_dir = &self.settings.locales_dir;
        if locales_dir.is_relative() {
            self.workspace_root.join(locales_dir)
        } else {
            locales_dir.clone()
        }
    }
}

/// 設定ファイルを読み込む（ファイルがなければ `None`）
fn read_settings(config_path: &Path) -> Result<Option<I18nSettings>, ConfigError> {
    if !config_path.is_file() {
        tracing::debug!(path = %config_path.display(), "No configuration file, using defaults");
        return Ok(None);
    }

    let content = std::fs::read_to_string(config_path)?;
    Ok(Some(serde_json::from_str(&content)?))
}
