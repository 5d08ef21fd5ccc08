//! Narration and voice input seam.

use crate::i18n::Language;
use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

pub trait SpeechEngine: Send + Sync {
    /// Start narrating `text`, interrupting anything already playing.
    fn speak(&self, text: &str, language: Language);

    fn stop_speaking(&self);

    fn is_speaking(&self) -> bool;

    /// Listen for one utterance and return its transcript.
    fn recognize_once(&self, language: Language) -> BoxFuture<'_, Result<String>>;
}

/// Engine for terminals: narration goes to the log, recognition is unsupported.
#[derive(Debug, Default)]
pub struct LoggingSpeech {
    speaking: AtomicBool,
}

impl LoggingSpeech {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpeechEngine for LoggingSpeech {
    fn speak(&self, text: &str, language: Language) {
        if self.speaking.swap(true, Ordering::SeqCst) {
            info!("Interrupting narration");
        }
        info!(lang = language.code(), "Narrating: {}", text);
    }

    fn stop_speaking(&self) {
        if self.speaking.swap(false, Ordering::SeqCst) {
            info!("Narration stopped");
        }
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    fn recognize_once(&self, language: Language) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            Err::<String, _>(anyhow!(
                "Speech recognition is not supported for {} in this terminal",
                language
            ))
        })
    }
}
