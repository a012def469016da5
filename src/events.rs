//! Language change notifications.

use std::sync::Arc;

/// Callback invoked with the new language code after a successful switch.
pub type LanguageListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registered language change callbacks.
#[derive(Default)]
pub struct ListenerRegistry {
    /// Id handed to the next subscriber
    next_id: u64,
    /// Callbacks in subscription order
    listeners: Vec<(SubscriptionId, LanguageListener)>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: LanguageListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns `false` if the subscription was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Copy of the current listeners, so they can be called without holding a lock.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LanguageListener> {
        self.listeners.iter().map(|(_, listener)| Arc::clone(listener)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn subscribe_and_notify() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        let sink = Arc::clone(&received);
        registry.subscribe(Arc::new(move |language: &str| {
            sink.lock().unwrap_or_else(std::sync::PoisonError::into_inner).push(language.to_string());
        }));

        for listener in registry.snapshot() {
            listener("zh");
        }

        let received = received.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        assert_eq!(*received, vec!["zh".to_string()]);
    }

    #[googletest::test]
    fn unsubscribe_removes_only_that_listener() {
        let mut registry = ListenerRegistry::new();
        let first = registry.subscribe(Arc::new(|_: &str| {}));
        let second = registry.subscribe(Arc::new(|_: &str| {}));

        expect_that!(first == second, eq(false));
        expect_that!(registry.unsubscribe(first), eq(true));
        expect_that!(registry.unsubscribe(first), eq(false));
        expect_that!(registry.len(), eq(1));
        expect_that!(registry.unsubscribe(second), eq(true));
        expect_that!(registry.is_empty(), eq(true));
    }

    #[googletest::test]
    fn debug_impl_hides_callbacks() {
        let mut registry = ListenerRegistry::new();
        registry.subscribe(Arc::new(|_: &str| {}));

        let debug_str = format!("{registry:?}");

        expect_that!(debug_str, contains_substring("ListenerRegistry"));
        expect_that!(debug_str, contains_substring("listeners: 1"));
    }
}
