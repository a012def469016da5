//! The translation engine.
//!
//! [`I18nService`] ties together the dictionary store, pluralization,
//! interpolation, missing key tracking and language switching. It has no
//! global state: create one per application (or per test) and share it
//! behind an `Arc`.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Key missing in both languages | Literal key returned, miss recorded |
//! | Key names a nested dictionary | Same as missing, logged separately |
//! | Placeholder without a value | Placeholder left in the output |
//! | Unsupported language | `set_language` returns an error, nothing changes |
//! | Dictionary load failure | `set_language` returns an error, nothing changes |

use std::borrow::Cow;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
    RwLock,
};

use tokio::sync::broadcast;

use crate::config::I18nSettings;
use crate::error::I18nError;
use crate::events::{
    LanguageListener,
    ListenerRegistry,
    SubscriptionId,
};
use crate::interpolate::interpolate_with;
use crate::loader::{
    DictionaryLoader,
    StaticLoader,
};
use crate::missing::MissingKeyTracker;
use crate::plural::resolve_plural_key;
use crate::store::{
    LoadedLanguage,
    Resolution,
    TranslationStore,
};
use crate::types::{
    COUNT_PARAM,
    LanguageCode,
    ParamValue,
    TranslationParams,
};

/// Capacity of the language change broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Language switching state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading(LanguageCode),
}

/// Load state plus the generation of the switch that set it.
#[derive(Debug)]
struct LoadTracker {
    /// Generation of the most recent `set_language` call
    generation: u64,
    /// State reported by `load_state`
    state: LoadState,
}

/// Translation engine for one application instance.
pub struct I18nService {
    /// Current and fallback dictionaries, swapped as one value
    store: RwLock<Arc<TranslationStore>>,
    /// Languages `set_language` accepts
    supported_languages: Vec<LanguageCode>,
    /// Suffix appended to a key for its plural form
    plural_suffix: String,
    /// Source of dictionaries for `initialize` and `set_language`
    loader: Arc<dyn DictionaryLoader>,
    /// Keys that failed to resolve since the last clear
    missing: Mutex<MissingKeyTracker>,
    /// Language change callbacks
    listeners: Mutex<ListenerRegistry>,
    /// Language change channel for async consumers
    events: broadcast::Sender<LanguageCode>,
    /// Switching state
    load: Mutex<LoadTracker>,
    /// Source of `set_language` generations
    generations: AtomicU64,
}

impl std::fmt::Debug for I18nService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.store();
        f.debug_struct("I18nService")
            .field("current_language", &store.current_language())
            .field("fallback_language", &store.fallback_language())
            .field("supported_languages", &self.supported_languages)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

impl I18nService {
    /// Create an engine with empty dictionaries.
    ///
    /// Every lookup returns the literal key until [`I18nService::initialize`]
    /// loads the fallback and default languages.
    #[must_use]
    pub fn new(settings: &I18nSettings, loader: Arc<dyn DictionaryLoader>) -> Self {
        let fallback = LoadedLanguage::empty(settings.fallback_language.clone());
        let current = LoadedLanguage::empty(settings.default_language.clone());
        Self::with_store(settings, loader, TranslationStore::new(current, fallback))
    }

    /// Create an engine over bundled dictionaries, without awaiting.
    ///
    /// Missing bundles leave the corresponding language empty.
    #[must_use]
    pub fn from_static(settings: &I18nSettings, bundle: StaticLoader) -> Self {
        let loaded = |language: &str| {
            bundle.get(language).map_or_else(
                || {
                    tracing::warn!(language, "No bundled dictionary for language");
                    LoadedLanguage::empty(language)
                },
                |dictionary| LoadedLanguage::new(language, dictionary),
            )
        };
        let fallback = loaded(&settings.fallback_language);
        let current = if settings.default_language == settings.fallback_language {
            fallback.clone()
        } else {
            loaded(&settings.default_language)
        };
        let store = TranslationStore::new(current, fallback);
        Self::with_store(settings, Arc::new(bundle), store)
    }

    /// Create an engine and load its dictionaries.
    ///
    /// Load failures are logged and leave the affected language empty; the
    /// engine still answers every lookup.
    pub async fn start(settings: &I18nSettings, loader: Arc<dyn DictionaryLoader>) -> Self {
        let service = Self::new(settings, loader);
        if let Err(err) = service.initialize().await {
            tracing::warn!(%err, "Starting with incomplete translations");
        }
        service
    }

    /// Shared constructor.
    fn with_store(
        settings: &I18nSettings,
        loader: Arc<dyn DictionaryLoader>,
        store: TranslationStore,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store: RwLock::new(Arc::new(store)),
            supported_languages: settings.supported_languages.clone(),
            plural_suffix: settings.plural_suffix.clone(),
            loader,
            missing: Mutex::new(MissingKeyTracker::new()),
            listeners: Mutex::new(ListenerRegistry::new()),
            events,
            load: Mutex::new(LoadTracker { generation: 0, state: LoadState::Idle }),
            generations: AtomicU64::new(0),
        }
    }

    /// Load the fallback dictionary, then the current language's dictionary.
    ///
    /// # Errors
    /// Returns the first load failure. A failed fallback load does not stop
    /// the current language from loading.
    pub async fn initialize(&self) -> Result<(), I18nError> {
        let (current_language, fallback_language) = {
            let store = self.store();
            (store.current_language().to_string(), store.fallback_language().to_string())
        };

        let fallback_result = self.loader.load(&fallback_language).await;
        let fallback_error = match fallback_result {
            Ok(dictionary) => {
                let loaded = LoadedLanguage::new(fallback_language.clone(), dictionary);
                self.swap_store(|store| store.with_fallback(loaded));
                None
            }
            Err(source) => {
                tracing::warn!(language = %fallback_language, %source, "Failed to load fallback dictionary");
                Some(I18nError::LoadFailed { language: fallback_language.clone(), source })
            }
        };

        if current_language != fallback_language {
            let dictionary = self.loader.load(&current_language).await.map_err(|source| {
                tracing::warn!(language = %current_language, %source, "Failed to load dictionary");
                I18nError::LoadFailed { language: current_language.clone(), source }
            })?;
            let loaded = LoadedLanguage::new(current_language, dictionary);
            self.swap_store(|store| store.with_current(loaded));
        }

        fallback_error.map_or(Ok(()), Err)
    }

    /// Translate `key`, substituting `params` into the result.
    ///
    /// Never fails: when no language provides the key, the key itself is
    /// returned and recorded as missing.
    #[must_use]
    pub fn translate(&self, key: &str, params: &TranslationParams) -> String {
        let store = self.store();
        let plural_key = resolve_plural_key(key, params.get(COUNT_PARAM), &self.plural_suffix);

        let candidates: Vec<&str> = match &plural_key {
            Cow::Owned(plural) => vec![plural.as_str(), key],
            Cow::Borrowed(_) => vec![key],
        };

        match store.resolve_first(&candidates) {
            Resolution::Found { value, key: resolved_key, language } => {
                if language != store.current_language() {
                    tracing::debug!(key = resolved_key, language, "Using fallback translation");
                }
                render(value, resolved_key, params)
            }
            Resolution::Missing { non_leaf } => {
                self.record_miss(&store, key, non_leaf);
                key.to_string()
            }
        }
    }

    /// Alias of [`I18nService::translate`].
    #[must_use]
    pub fn t(&self, key: &str, params: &TranslationParams) -> String {
        self.translate(key, params)
    }

    /// Returns true if `key` resolves to a string in the current or fallback language.
    ///
    /// Does not record misses.
    #[must_use]
    pub fn has_translation(&self, key: &str) -> bool {
        self.store().contains(key)
    }

    #[must_use]
    pub fn language(&self) -> LanguageCode {
        self.store().current_language().to_string()
    }

    #[must_use]
    pub fn fallback_language(&self) -> LanguageCode {
        self.store().fallback_language().to_string()
    }

    #[must_use]
    pub fn supported_languages(&self) -> &[LanguageCode] {
        &self.supported_languages
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.lock_load().state.clone()
    }

    /// Switch the current language.
    ///
    /// On success the missing key set is cleared and subscribers are
    /// notified. On failure nothing changes.
    ///
    /// # Errors
    /// - [`I18nError::UnsupportedLanguage`] if `language` is not supported
    /// - [`I18nError::LoadFailed`] if its dictionary cannot be loaded
    pub async fn set_language(&self, language: &str) -> Result<(), I18nError> {
        let generation = self.begin_loading(language);
        let result = self.switch_language(language).await;
        self.finish_loading(generation);
        result
    }

    /// Load and activate `language`.
    async fn switch_language(&self, language: &str) -> Result<(), I18nError> {
        if !self.supported_languages.iter().any(|supported| supported == language) {
            tracing::warn!(language, "Rejected unsupported language");
            return Err(I18nError::UnsupportedLanguage {
                language: language.to_string(),
                supported: self.supported_languages.clone(),
            });
        }

        let dictionary = self.loader.load(language).await.map_err(|source| {
            tracing::warn!(language, %source, "Failed to load dictionary, keeping current language");
            I18nError::LoadFailed { language: language.to_string(), source }
        })?;

        let loaded = LoadedLanguage::new(language, dictionary);
        {
            // Lock order: missing keys, then store.
            let mut missing = self.lock_missing();
            self.swap_store(|store| store.with_current(loaded));
            missing.clear();
        }
        tracing::info!(language, "Language changed");

        self.notify(language);
        Ok(())
    }

    /// All keys that failed to resolve since the last clear, sorted.
    #[must_use]
    pub fn missing_keys(&self) -> Vec<String> {
        self.lock_missing().missing_keys()
    }

    pub fn clear_missing_keys(&self) {
        self.lock_missing().clear();
    }

    /// Register a callback for successful language changes.
    pub fn on_language_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let listener: LanguageListener = Arc::new(callback);
        self.lock_listeners().subscribe(listener)
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock_listeners().unsubscribe(id)
    }

    /// Receiver of language codes after each successful change.
    #[must_use]
    pub fn language_events(&self) -> broadcast::Receiver<LanguageCode> {
        self.events.subscribe()
    }

    /// Current store snapshot.
    fn store(&self) -> Arc<TranslationStore> {
        let guard = self.store.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Replace the store with one derived from it, under the write lock.
    fn swap_store<F>(&self, update: F)
    where
        F: FnOnce(&TranslationStore) -> TranslationStore,
    {
        let mut guard = self.store.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(update(&guard));
    }

    /// Record a miss found in `snapshot`; only the first miss of a key is
    /// logged at warn level.
    ///
    /// Misses from a snapshot that has since been replaced are discarded.
    fn record_miss(&self, snapshot: &Arc<TranslationStore>, key: &str, non_leaf: bool) {
        let mut missing = self.lock_missing();
        if !Arc::ptr_eq(snapshot, &self.store()) {
            tracing::trace!(key, "Discarding miss from a replaced dictionary");
            return;
        }
        let first = missing.record_miss(key);
        drop(missing);
        match (first, non_leaf) {
            (true, true) => {
                tracing::warn!(key, "Translation key names a group of translations, not a string");
            }
            (true, false) => tracing::warn!(key, "Missing translation key"),
            (false, _) => tracing::trace!(key, non_leaf, "Missing translation key (repeat)"),
        }
    }

    /// Invoke callbacks, then broadcast the new language.
    fn notify(&self, language: &str) {
        let listeners = self.lock_listeners().snapshot();
        for listener in listeners {
            listener(language);
        }
        if self.events.send(language.to_string()).is_err() {
            tracing::trace!("No language event receivers");
        }
    }

    /// Enter `Loading(language)` and return the generation of this switch.
    fn begin_loading(&self, language: &str) -> u64 {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let mut load = self.lock_load();
        load.generation = generation;
        load.state = LoadState::Loading(language.to_string());
        generation
    }

    /// Return to `Idle` unless a newer switch has started meanwhile.
    fn finish_loading(&self, generation: u64) {
        let mut load = self.lock_load();
        if load.generation == generation {
            load.state = LoadState::Idle;
        }
    }

    /// Missing key tracker, recovering from poisoning.
    fn lock_missing(&self) -> MutexGuard<'_, MissingKeyTracker> {
        self.missing.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Listener registry, recovering from poisoning.
    fn lock_listeners(&self) -> MutexGuard<'_, ListenerRegistry> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load tracker, recovering from poisoning.
    fn lock_load(&self) -> MutexGuard<'_, LoadTracker> {
        self.load.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Interpolate a resolved template.
///
/// `count` is substituted only when it is a number; any other parameter is
/// substituted whenever it is present and not null.
fn render(template: &str, key: &str, params: &TranslationParams) -> String {
    let mut unresolved = Vec::new();
    let rendered = interpolate_with(template, |name| {
        let value = params
            .get(name)
            .filter(|value| name != COUNT_PARAM || value.as_number().is_some())
            .and_then(ParamValue::render);
        if value.is_none() {
            unresolved.push(name.to_string());
        }
        value
    });
    if !unresolved.is_empty() {
        tracing::debug!(key, ?unresolved, "Missing interpolation parameters");
    }
    rendered
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::dictionary::TranslationDictionary;
    use crate::error::LoadError;
    use crate::test_utils::{
        FailingLoader,
        GatedLoader,
        markethub_bundle,
        markethub_service,
        settings,
    };

    fn no_params() -> TranslationParams {
        TranslationParams::new()
    }

    #[googletest::test]
    fn translate_resolves_nested_key() {
        let service = markethub_service();

        expect_that!(service.translate("auth.welcomeBack", &no_params()), eq("Welcome back!"));
        expect_that!(service.missing_keys(), is_empty());
    }

    #[rstest]
    #[case::empty("")]
    #[case::single_dot(".")]
    #[case::dots("...")]
    #[case::trailing_dot("auth.")]
    #[case::leading_dot(".auth")]
    #[case::non_leaf("auth")]
    #[case::absent("missing.key")]
    fn translate_falls_back_to_key(#[case] key: &str) {
        let service = markethub_service();

        assert_eq!(service.translate(key, &no_params()), key);
    }

    #[googletest::test]
    fn literal_key_is_not_interpolated() {
        let service = markethub_service();
        let params = TranslationParams::new().with("name", "John");

        expect_that!(service.translate("missing.{{name}}", &params), eq("missing.{{name}}"));
    }

    #[googletest::test]
    fn missing_key_is_recorded_once() {
        let service = markethub_service();

        for _ in 0..5 {
            let _ = service.translate("missing.key", &no_params());
        }

        expect_that!(service.missing_keys(), elements_are![eq("missing.key")]);
    }

    #[googletest::test]
    fn missing_keys_are_sorted() {
        let service = markethub_service();

        for key in ["zzz.missing", "aaa.missing", "mmm.missing"] {
            let _ = service.translate(key, &no_params());
        }

        expect_that!(
            service.missing_keys(),
            elements_are![eq("aaa.missing"), eq("mmm.missing"), eq("zzz.missing")]
        );
    }

    #[googletest::test]
    fn non_leaf_key_is_recorded_as_missing() {
        let service = markethub_service();

        let _ = service.translate("auth", &no_params());

        expect_that!(service.missing_keys(), elements_are![eq("auth")]);
    }

    #[googletest::test]
    fn clear_missing_keys_empties_the_set() {
        let service = markethub_service();
        let _ = service.translate("missing.key", &no_params());

        service.clear_missing_keys();

        expect_that!(service.missing_keys(), is_empty());
    }

    #[googletest::test]
    fn interpolation_leaves_unknown_placeholders() {
        let service = markethub_service();
        let params = TranslationParams::new().with("name", "John");

        expect_that!(
            service.translate("home.inbox", &params),
            eq("Hello John, you have {{count}} messages")
        );
    }

    #[googletest::test]
    fn null_param_is_left_intact() {
        let service = markethub_service();
        let params = TranslationParams::new().with("count", None::<i32>);

        expect_that!(service.translate("products.onlyXLeft", &params), eq("Only {{count}} left!"));
    }

    #[rstest]
    #[case::one(ParamValue::from(1), "1 product")]
    #[case::zero(ParamValue::from(0), "0 products")]
    #[case::negative(ParamValue::from(-5), "-5 products")]
    #[case::fraction(ParamValue::from(1.5), "1.5 products")]
    #[case::many(ParamValue::from(42), "42 products")]
    #[case::numeric_string(ParamValue::from("2"), "{{count}} product")]
    #[case::null(ParamValue::Null, "{{count}} product")]
    fn pluralization_selects_form(#[case] count: ParamValue, #[case] expected: &str) {
        let service = markethub_service();
        let params = TranslationParams::new().with("count", count);

        assert_eq!(service.translate("products.productCount", &params), expected);
    }

    #[googletest::test]
    fn string_count_does_not_block_other_params() {
        let service = markethub_service();
        let params = TranslationParams::new().with("count", "2").with("name", "John");

        expect_that!(
            service.translate("home.inbox", &params),
            eq("Hello John, you have {{count}} messages")
        );
    }

    #[googletest::test]
    fn missing_plural_form_degrades_to_singular() {
        let service = markethub_service();
        let params = TranslationParams::new().with("count", 3);

        expect_that!(service.translate("rewards.points", &params), eq("3 points"));
        expect_that!(service.missing_keys(), is_empty());
    }

    #[googletest::test]
    fn missing_pluralized_key_records_base_key() {
        let service = markethub_service();
        let params = TranslationParams::new().with("count", 3);

        expect_that!(service.translate("cart.nothing", &params), eq("cart.nothing"));
        expect_that!(service.missing_keys(), elements_are![eq("cart.nothing")]);
    }

    #[rstest]
    #[case::leaf("auth.welcomeBack", true)]
    #[case::fallback_only("checkout.placeOrder", true)]
    #[case::non_leaf("auth", false)]
    #[case::empty("", false)]
    #[case::trailing_dot("auth.", false)]
    #[case::single_dot(".", false)]
    #[case::absent("missing.key", false)]
    fn has_translation_cases(#[case] key: &str, #[case] expected: bool) {
        let service = markethub_service();

        assert_eq!(service.has_translation(key), expected);
        assert!(service.missing_keys().is_empty());
    }

    #[tokio::test]
    async fn set_language_switches_and_clears_misses() {
        let service = markethub_service();
        let _ = service.translate("missing.key", &no_params());

        service.set_language("zh").await.unwrap();

        assert_eq!(service.language(), "zh");
        assert!(service.missing_keys().is_empty());
        assert_eq!(service.translate("auth.welcomeBack", &no_params()), "欢迎回来！");
        assert_eq!(service.load_state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn current_language_precedes_fallback_for_plurals() {
        let service = markethub_service();
        service.set_language("zh").await.unwrap();
        let params = TranslationParams::new().with("count", 3);

        // zh has only the singular form; it wins over the en plural.
        assert_eq!(service.translate("products.productCount", &params), "3 件商品");
        // Keys absent from zh come from en.
        assert_eq!(service.translate("checkout.placeOrder", &no_params()), "Place order");
    }

    #[tokio::test]
    async fn unsupported_language_is_rejected_without_changes() {
        let service = markethub_service();
        let _ = service.translate("missing.key", &no_params());

        let result = service.set_language("fr").await;

        assert!(matches!(
            result,
            Err(I18nError::UnsupportedLanguage { ref language, .. }) if language == "fr"
        ));
        assert_eq!(service.language(), "en");
        assert_eq!(service.missing_keys(), vec!["missing.key".to_string()]);
        assert_eq!(service.load_state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn load_failure_reverts_language() {
        let loader = FailingLoader::new(markethub_bundle(), "zh");
        let service = I18nService::new(&settings(), Arc::new(loader));
        service.initialize().await.unwrap();
        let _ = service.translate("missing.key", &no_params());

        let result = service.set_language("zh").await;

        assert!(matches!(result, Err(I18nError::LoadFailed { source: LoadError::Io { .. }, .. })));
        assert_eq!(service.language(), "en");
        assert_eq!(service.translate("auth.welcomeBack", &no_params()), "Welcome back!");
        assert_eq!(service.missing_keys(), vec!["missing.key".to_string()]);
    }

    #[tokio::test]
    async fn listeners_receive_new_language() {
        let service = markethub_service();
        let calls = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));
        let id = {
            let calls = Arc::clone(&calls);
            let received = Arc::clone(&received);
            service.on_language_changed(move |language| {
                calls.fetch_add(1, Ordering::SeqCst);
                received.lock().unwrap().push(language.to_string());
            })
        };

        service.set_language("zh").await.unwrap();
        let _ = service.set_language("fr").await;
        assert!(service.unsubscribe(id));
        service.set_language("en").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*received.lock().unwrap(), vec!["zh".to_string()]);
        assert!(!service.unsubscribe(id));
    }

    #[tokio::test]
    async fn language_events_are_broadcast() {
        let service = markethub_service();
        let mut events = service.language_events();

        service.set_language("zh").await.unwrap();

        assert_eq!(events.recv().await.unwrap(), "zh");
    }

    #[tokio::test]
    async fn start_loads_fallback_and_default() {
        let settings = I18nSettings { default_language: "zh".to_string(), ..settings() };

        let service = I18nService::start(&settings, Arc::new(markethub_bundle())).await;

        assert_eq!(service.language(), "zh");
        assert_eq!(service.fallback_language(), "en");
        assert_eq!(service.translate("auth.welcomeBack", &no_params()), "欢迎回来！");
        assert_eq!(service.translate("checkout.placeOrder", &no_params()), "Place order");
    }

    #[tokio::test]
    async fn start_without_dictionaries_returns_keys() {
        let service = I18nService::start(&settings(), Arc::new(StaticLoader::new())).await;

        assert_eq!(service.translate("auth.welcomeBack", &no_params()), "auth.welcomeBack");
        assert!(!service.has_translation("auth.welcomeBack"));
        assert_eq!(service.missing_keys(), vec!["auth.welcomeBack".to_string()]);
    }

    #[googletest::test]
    fn instances_do_not_share_state() {
        let first = markethub_service();
        let second = markethub_service();

        let _ = first.translate("missing.key", &no_params());

        expect_that!(first.missing_keys(), len(eq(1)));
        expect_that!(second.missing_keys(), is_empty());
    }

    #[googletest::test]
    fn supported_languages_are_static() {
        let service = markethub_service();

        assert_eq!(service.supported_languages(), ["en".to_string(), "zh".to_string()]);
        expect_that!(service.load_state(), eq(&LoadState::Idle));
    }

    #[googletest::test]
    fn debug_impl_shows_languages() {
        let service = markethub_service();

        let debug_str = format!("{service:?}");

        expect_that!(debug_str, contains_substring("I18nService"));
        expect_that!(debug_str, contains_substring("current_language: \"en\""));
    }

    #[googletest::test]
    fn empty_segments_ignore_empty_json_keys() {
        let bundle = StaticLoader::new().with(
            "en",
            TranslationDictionary::from_json(&serde_json::json!({
                "": "root-empty",
                "auth": { "": "auth-empty", "signIn": "Sign in" }
            }))
            .unwrap(),
        );
        let service = I18nService::from_static(&settings(), bundle);

        expect_that!(service.has_translation(""), eq(false));
        expect_that!(service.has_translation("auth."), eq(false));
        expect_that!(service.translate("", &no_params()), eq(""));
        expect_that!(service.translate("auth.", &no_params()), eq("auth."));
        expect_that!(service.translate("auth.signIn", &no_params()), eq("Sign in"));
        expect_that!(service.missing_keys(), elements_are![eq(""), eq("auth.")]);
    }

    #[tokio::test]
    async fn miss_from_replaced_snapshot_is_discarded() {
        let service = markethub_service();
        let stale = service.store();

        service.set_language("zh").await.unwrap();
        service.record_miss(&stale, "missing.key", false);

        assert!(service.missing_keys().is_empty());

        let current = service.store();
        service.record_miss(&current, "missing.key", false);

        assert_eq!(service.missing_keys(), vec!["missing.key".to_string()]);
    }

    #[tokio::test]
    async fn overlapping_switches_last_completion_wins() {
        let loader = Arc::new(GatedLoader::new(markethub_bundle(), "zh"));
        let shared: Arc<dyn DictionaryLoader> = loader.clone();
        let service = Arc::new(I18nService::new(&settings(), shared));
        service.initialize().await.unwrap();

        let slow = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.set_language("zh").await })
        };
        while service.load_state() != LoadState::Loading("zh".to_string()) {
            tokio::task::yield_now().await;
        }

        // A newer switch finishes while the first is still loading.
        service.set_language("en").await.unwrap();
        assert_eq!(service.language(), "en");
        assert_eq!(service.load_state(), LoadState::Idle);

        loader.release();
        slow.await.unwrap().unwrap();

        assert_eq!(service.language(), "zh");
        assert_eq!(service.translate("auth.welcomeBack", &no_params()), "欢迎回来！");
        assert_eq!(service.load_state(), LoadState::Idle);
    }

}
