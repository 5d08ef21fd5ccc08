//! Wraps a screen's keyed texts and keeps them translated.

use crate::context::LanguageContext;
use crate::gateway::ApiResult;
use crate::i18n::Language;
use crate::sequence::{RequestSequencer, Ticket};
use crate::translation::TranslatableTextSet;
use std::sync::Mutex;
use tracing::{debug, warn};

const RESOLVE_SLOT: &str = "texts";

#[derive(Debug, Default)]
struct WrapperState {
    texts: TranslatableTextSet,
    /// Translated set and the (language, input) it was produced for
    resolved: Option<(Language, TranslatableTextSet, TranslatableTextSet)>,
    /// Ticket number of the resolution currently in flight
    pending: Option<u64>,
}

impl WrapperState {
    fn current_translation(&self, language: Language) -> Option<&TranslatableTextSet> {
        self.resolved
            .as_ref()
            .filter(|(lang, input, _)| *lang == language && *input == self.texts)
            .map(|(_, _, translated)| translated)
    }
}

/// Translation view wrapper for one screen.
///
/// Renders the originals until a translation for the current language and
/// texts is available, and never lets a superseded translation replace a
/// newer one.
#[derive(Debug, Default)]
pub struct TranslationWrapper {
    state: Mutex<WrapperState>,
    sequencer: RequestSequencer,
}

impl TranslationWrapper {
    pub fn new(texts: TranslatableTextSet) -> Self {
        Self {
            state: Mutex::new(WrapperState {
                texts,
                ..WrapperState::default()
            }),
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn set_texts(&self, texts: TranslatableTextSet) {
        self.lock().texts = texts;
    }

    pub fn texts(&self) -> TranslatableTextSet {
        self.lock().texts.clone()
    }

    /// True while the newest translation is in flight.
    pub fn is_loading(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Translate the texts for the context's language if they changed since
    /// the last resolution, returning what should be displayed.
    pub async fn resolve(&self, context: &LanguageContext) -> TranslatableTextSet {
        let language = context.language();
        let (texts, ticket) = {
            let mut state = self.lock();
            if let Some(translated) = state.current_translation(language) {
                let translated = translated.clone();
                // anything still in flight was asked for other inputs
                self.sequencer.issue(RESOLVE_SLOT);
                state.pending = None;
                return translated;
            }
            let ticket = self.sequencer.issue(RESOLVE_SLOT);
            state.pending = Some(ticket.number());
            (state.texts.clone(), ticket)
        };
        let pending = PendingGuard {
            wrapper: self,
            ticket: &ticket,
        };

        let mut translated = context.gateway().translate_many(&texts, language).await;
        if !translated.same_keys(&texts) {
            warn!("Translated texts lost keys for {}, showing originals", language);
            translated = texts.clone();
        }

        let applied = self.sequencer.apply_if_latest(&ticket, || {
            self.lock().resolved = Some((language, texts, translated));
        });
        if applied.is_none() {
            debug!("Discarding superseded {} translation", language);
        }
        drop(pending);

        self.displayed(language)
    }

    /// Render the translated texts, or the originals while loading.
    pub fn render<R>(&self, context: &LanguageContext, render: impl FnOnce(&TranslatableTextSet) -> R) -> R {
        let state = self.lock();
        if context.is_loading() || state.pending.is_some() {
            return render(&state.texts);
        }
        match state.current_translation(context.language()) {
            Some(translated) => render(translated),
            None => render(&state.texts),
        }
    }

    /// Like [`render`](Self::render) but shows `placeholder` while loading.
    pub fn render_with_placeholder<R>(
        &self,
        context: &LanguageContext,
        render: impl FnOnce(&TranslatableTextSet) -> R,
        placeholder: impl FnOnce() -> R,
    ) -> R {
        if context.is_loading() || self.is_loading() {
            return placeholder();
        }
        self.render(context, render)
    }

    fn displayed(&self, language: Language) -> TranslatableTextSet {
        let state = self.lock();
        state
            .current_translation(language)
            .unwrap_or(&state.texts)
            .clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WrapperState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Clears the loading flag when a resolution ends, including when its
/// future is dropped mid-translation. A newer resolution keeps the flag.
struct PendingGuard<'a> {
    wrapper: &'a TranslationWrapper,
    ticket: &'a Ticket,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.wrapper.lock();
        if state.pending == Some(self.ticket.number()) {
            state.pending = None;
        }
    }
}

/// The translated failure message of a gateway result, if it failed.
pub async fn failure_notice<T>(context: &LanguageContext, result: &ApiResult<T>) -> Option<String> {
    match result.error() {
        Some(message) => Some(context.translate(message).await),
        None => None,
    }
}
