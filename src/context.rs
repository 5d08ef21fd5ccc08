//! Process-wide language context.
//!
//! Holds the active language, exposes translation bound to it, and watches
//! the persisted slot for changes made elsewhere. A detected change is a
//! hard reset: the context reloads the language from the store instead of
//! merging anything.

use crate::i18n::Language;
use crate::language_store::LanguageStore;
use crate::translation::{TranslatableTextSet, TranslationGateway};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// A language change picked up from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChange {
    pub previous: Language,
    pub current: Language,
    pub timestamp: Option<String>,
}

#[derive(Debug)]
struct ContextState {
    language: Language,
    observed_timestamp: Option<String>,
    ready: bool,
}

pub struct LanguageContext {
    store: Arc<dyn LanguageStore>,
    gateway: Arc<TranslationGateway>,
    state: RwLock<ContextState>,
}

impl LanguageContext {
    /// Read the stored language and return a ready context.
    pub fn initialize(store: Arc<dyn LanguageStore>, gateway: Arc<TranslationGateway>) -> Arc<Self> {
        let context = Self::pending(store, gateway);
        context.reload();
        info!("Language context ready ({})", context.language());
        context
    }

    /// A context that has not read the store yet.
    pub(crate) fn pending(store: Arc<dyn LanguageStore>, gateway: Arc<TranslationGateway>) -> Arc<Self> {
        Arc::new(Self {
            store,
            gateway,
            state: RwLock::new(ContextState {
                language: Language::ENGLISH,
                observed_timestamp: None,
                ready: false,
            }),
        })
    }

    pub fn language(&self) -> Language {
        self.read_state(|state| state.language)
    }

    /// True until the stored language has been read.
    pub fn is_loading(&self) -> bool {
        self.read_state(|state| !state.ready)
    }

    pub fn gateway(&self) -> &TranslationGateway {
        &self.gateway
    }

    /// Translate into the current language. Never fails.
    pub async fn translate(&self, text: &str) -> String {
        self.gateway.translate_one(text, self.language()).await
    }

    /// Translate a keyed set into the current language, keeping every key.
    pub async fn translate_batch(&self, texts: &TranslatableTextSet) -> TranslatableTextSet {
        self.gateway.translate_many(texts, self.language()).await
    }

    /// Persist a new language and switch to it.
    pub fn select_language(&self, language: Language) {
        self.store.set(language);
        let timestamp = self.store.change_timestamp();

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        info!("Language changed from {} to {}", state.language, language);
        state.language = language;
        state.observed_timestamp = timestamp;
        state.ready = true;
    }

    /// One staleness check against the store.
    ///
    /// Returns the change when the stored timestamp differs from the one
    /// last observed (an appearing timestamp counts), after reloading.
    pub fn check_for_change(&self) -> Option<LanguageChange> {
        let stored = self.store.change_timestamp();
        let observed = self.read_state(|state| state.observed_timestamp.clone());
        if stored == observed {
            return None;
        }

        let previous = self.language();
        let current = self.reload();
        info!(
            "Language slot changed externally ({} -> {}), reloading",
            previous, current
        );
        Some(LanguageChange {
            previous,
            current,
            timestamp: stored,
        })
    }

    /// Poll the store every `every` and report changes to `on_change`.
    ///
    /// The first check happens one full interval after the call.
    pub fn watch<F>(self: &Arc<Self>, every: Duration, on_change: F) -> StalenessWatcher
    where
        F: Fn(LanguageChange) + Send + 'static,
    {
        let context = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(every.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Some(change) = context.check_for_change() {
                    on_change(change);
                }
            }
        });

        debug!("Started language staleness watcher ({:?})", every);
        StalenessWatcher { handle }
    }

    /// Replace the in-memory state with what the store holds.
    fn reload(&self) -> Language {
        let record = self.store.record();
        let language = record
            .as_ref()
            .map(|record| record.resolve_language())
            .unwrap_or(Language::ENGLISH);

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.language = language;
        state.observed_timestamp = record.map(|record| record.timestamp);
        state.ready = true;
        language
    }

    fn read_state<R>(&self, f: impl FnOnce(&ContextState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }
}

/// Background staleness poller; stops when stopped or dropped.
#[derive(Debug)]
pub struct StalenessWatcher {
    handle: JoinHandle<()>,
}

impl StalenessWatcher {
    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for StalenessWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
