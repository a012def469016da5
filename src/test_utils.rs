//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use futures::future::{
    self,
    BoxFuture,
    FutureExt,
};
use serde_json::json;
use tokio::sync::Notify;

use crate::config::I18nSettings;
use crate::dictionary::TranslationDictionary;
use crate::error::LoadError;
use crate::loader::{
    DictionaryLoader,
    StaticLoader,
};
use crate::service::I18nService;
use crate::types::LanguageCode;

/// デフォルト設定（en / zh、フォールバックは en）
pub(crate) fn settings() -> I18nSettings {
    I18nSettings::default()
}

/// MarketHub の英語・中国語辞書を持つ `StaticLoader` を作成する
///
/// zh には `products.productCount_plural` と `checkout` がない
pub(crate) fn markethub_bundle() -> StaticLoader {
    let mut loader = StaticLoader::new();
    loader
        .insert_json(
            "en",
            &json!({
                "auth": {
                    "welcomeBack": "Welcome back!",
                    "signIn": "Sign in"
                },
                "home": {
                    "title": "MarketHub",
                    "inbox": "Hello {{name}}, you have {{count}} messages"
                },
                "products": {
                    "productCount": "{{count}} product",
                    "productCount_plural": "{{count}} products",
                    "onlyXLeft": "Only {{count}} left!"
                },
                "rewards": {
                    "points": "{{count}} points"
                },
                "checkout": {
                    "placeOrder": "Place order"
                }
            }),
        )
        .unwrap();
    loader
        .insert_json(
            "zh",
            &json!({
                "auth": {
                    "welcomeBack": "欢迎回来！",
                    "signIn": "登录"
                },
                "home": {
                    "title": "MarketHub",
                    "inbox": "{{name}}，您好，您有 {{count}} 条消息"
                },
                "products": {
                    "productCount": "{{count}} 件商品",
                    "onlyXLeft": "仅剩 {{count}} 件！"
                },
                "rewards": {
                    "points": "{{count}} 积分"
                }
            }),
        )
        .unwrap();
    loader
}

/// 英語で起動した `I18nService` を作成する
pub(crate) fn markethub_service() -> I18nService {
    I18nService::from_static(&settings(), markethub_bundle())
}

/// 指定した言語の読み込みだけ失敗するローダー
#[derive(Debug)]
pub(crate) struct FailingLoader {
    /// 正常に読み込める辞書
    inner: StaticLoader,
    /// 読み込みに失敗する言語
    failing_language: LanguageCode,
}

impl FailingLoader {
    pub(crate) fn new(inner: StaticLoader, failing_language: &str) -> Self {
        Self { inner, failing_language: failing_language.to_string() }
    }
}

impl DictionaryLoader for FailingLoader {
    fn load<'a>(
        &'a self,
        language: &'a str,
    ) -> BoxFuture<'a, Result<Arc<TranslationDictionary>, LoadError>> {
        if language == self.failing_language {
            let error = LoadError::Io {
                path: format!("locales/{language}.json").into(),
                source: std::io::Error::other("simulated read failure"),
            };
            return future::ready(Err(error)).boxed();
        }
        self.inner.load(language)
    }

    fn available_languages(&self) -> Vec<LanguageCode> {
        self.inner.available_languages()
    }
}

/// 指定した言語の読み込みを `release` まで待たせるローダー
#[derive(Debug)]
pub(crate) struct GatedLoader {
    /// 辞書の読み込み元
    inner: StaticLoader,
    /// 待たされる言語
    gated_language: LanguageCode,
    /// 読み込みの再開通知
    gate: Notify,
}

impl GatedLoader {
    pub(crate) fn new(inner: StaticLoader, gated_language: &str) -> Self {
        Self { inner, gated_language: gated_language.to_string(), gate: Notify::new() }
    }

    /// 待っている読み込みを再開させる（まだ始まっていなければ次の読み込みが待たずに進む）
    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }
}

impl DictionaryLoader for GatedLoader {
    fn load<'a>(
        &'a self,
        language: &'a str,
    ) -> BoxFuture<'a, Result<Arc<TranslationDictionary>, LoadError>> {
        async move {
            if language == self.gated_language {
                self.gate.notified().await;
            }
            self.inner.load(language).await
        }
        .boxed()
    }

    fn available_languages(&self) -> Vec<LanguageCode> {
        self.inner.available_languages()
    }
}
