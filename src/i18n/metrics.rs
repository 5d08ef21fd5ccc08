//! Translation metrics and observability module.
//!
//! Tracks how each translation was resolved: remote calls and failures, and
//! which fallback tier answered when the remote provider could not.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for one translation gateway.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Requests answered by the identity fast path (canonical target or blank text)
    identity: AtomicUsize,

    /// Calls made to the remote provider
    remote_calls: AtomicUsize,

    /// Remote calls that failed or produced an invalid translation
    remote_failures: AtomicUsize,

    /// Fallbacks answered by an exact phrase-table match
    phrase_exact: AtomicUsize,

    /// Fallbacks answered by phrase-table substring replacement
    phrase_substring: AtomicUsize,

    /// Fallbacks that passed the source text through untranslated
    untranslated: AtomicUsize,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_identity(&self) {
        self.identity.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_remote_call(&self) {
        self.remote_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_remote_failure(&self) {
        self.remote_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_phrase_exact(&self) {
        self.phrase_exact.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_phrase_substring(&self) {
        self.phrase_substring.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_untranslated(&self) {
        self.untranslated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn remote_calls(&self) -> usize {
        self.remote_calls.load(Ordering::Relaxed)
    }

    pub fn remote_failures(&self) -> usize {
        self.remote_failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let remote_calls = self.remote_calls();
        let remote_failures = self.remote_failures();
        let remote_success_rate = if remote_calls > 0 {
            (remote_calls.saturating_sub(remote_failures) as f64 / remote_calls as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            identity: self.identity.load(Ordering::Relaxed),
            remote_calls,
            remote_failures,
            remote_success_rate,
            phrase_exact: self.phrase_exact.load(Ordering::Relaxed),
            phrase_substring: self.phrase_substring.load(Ordering::Relaxed),
            untranslated: self.untranslated.load(Ordering::Relaxed),
        }
    }
}

/// Translation metrics report.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub identity: usize,
    pub remote_calls: usize,
    pub remote_failures: usize,
    /// Remote success rate as a percentage (0-100)
    pub remote_success_rate: f64,
    pub phrase_exact: usize,
    pub phrase_substring: usize,
    pub untranslated: usize,
}

impl MetricsReport {
    /// Number of translations served by any fallback tier.
    pub fn fallbacks(&self) -> usize {
        self.phrase_exact + self.phrase_substring + self.untranslated
    }
}
