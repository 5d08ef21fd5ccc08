use crate::config::Config;
use crate::i18n::{Language, TranslationMetrics, TranslationValidator};
use anyhow::{anyhow, bail, Context, Result};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

// ==================== Remote providers ====================

/// A remote translation strategy.
///
/// Providers may fail freely; `TranslationGateway` turns every failure into
/// a local fallback.
pub trait TranslationProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    fn translate<'a>(&'a self, text: &'a str, target: Language) -> BoxFuture<'a, Result<String>>;
}

/// Ollama-style `/api/generate` request
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Build the prompt for a single translation
fn build_translation_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text to {}. Only provide the translation, no explanations:\n\"{}\"",
        target_language, text
    )
}

/// LLMs often echo the quotes the prompt wrapped the text in
fn strip_wrapping_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    ['"', '“', '\'']
        .iter()
        .find_map(|quote| {
            let closing = if *quote == '“' { '”' } else { *quote };
            trimmed
                .strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(closing))
        })
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Translates through a local or hosted Ollama model.
#[derive(Debug, Clone)]
pub struct OllamaTranslator {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

impl OllamaTranslator {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            model: model.into(),
        }
    }

    async fn generate(&self, text: &str, target: Language) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: build_translation_prompt(text, target.name()),
            stream: false,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send translation request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            bail!("Translation API error ({}): {}", status, body);
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse translation response")?;

        Ok(strip_wrapping_quotes(&generated.response).to_string())
    }
}

impl TranslationProvider for OllamaTranslator {
    fn name(&self) -> &str {
        "ollama"
    }

    fn translate<'a>(&'a self, text: &'a str, target: Language) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.generate(text, target))
    }
}

/// Provider used when no translation endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTranslator;

impl TranslationProvider for OfflineTranslator {
    fn name(&self) -> &str {
        "offline"
    }

    fn translate<'a>(&'a self, _text: &'a str, _target: Language) -> BoxFuture<'a, Result<String>> {
        Box::pin(async { Err::<String, _>(anyhow!("Remote translation is disabled")) })
    }
}

// ==================== Text sets ====================

/// An insertion-ordered batch of display strings keyed by a stable id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslatableTextSet {
    entries: Vec<(String, String)>,
}

impl TranslatableTextSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) -> Option<String> {
        let key = key.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, text)),
            None => {
                self.entries.push((key, text));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, text)| text.as_str())
    }

    /// Like `get`, but yields the key itself for a missing entry so a view
    /// never renders an empty slot.
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether both sets carry exactly the same keys in the same order.
    pub fn same_keys(&self, other: &TranslatableTextSet) -> bool {
        self.keys().eq(other.keys())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslatableTextSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = TranslatableTextSet::new();
        for (key, text) in iter {
            set.insert(key, text);
        }
        set
    }
}

// ==================== Gateway ====================

/// How a translated string was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationSource {
    /// Canonical target or blank text: returned unchanged without a call
    Identity,
    Remote,
    PhraseExact,
    PhraseSubstring,
    /// Every tier failed; the text is the untranslated source
    Untranslated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub source: TranslationSource,
}

impl Translation {
    /// Whether the text is in the target language (or needed no translation).
    pub fn is_translated(&self) -> bool {
        self.source != TranslationSource::Untranslated
    }
}

/// Total translation boundary: always returns text, never an error.
pub struct TranslationGateway {
    provider: Arc<dyn TranslationProvider>,
    timeout: Duration,
    metrics: Arc<TranslationMetrics>,
}

impl TranslationGateway {
    pub fn new(provider: Arc<dyn TranslationProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            metrics: Arc::new(TranslationMetrics::new()),
        }
    }

    /// Ollama when a translation endpoint is configured, offline otherwise.
    pub fn from_config(client: &reqwest::Client, config: &Config) -> Self {
        let provider: Arc<dyn TranslationProvider> = if config.translation_enabled() {
            Arc::new(OllamaTranslator::new(
                client.clone(),
                &config.translation_api_url,
                &config.translation_model,
            ))
        } else {
            Arc::new(OfflineTranslator)
        };
        Self::new(provider, config.request_timeout)
    }

    pub fn metrics(&self) -> &TranslationMetrics {
        &self.metrics
    }

    pub async fn translate_one(&self, text: &str, target: Language) -> String {
        self.translate_one_detailed(text, target).await.text
    }

    /// Translate one string, reporting which tier produced the result.
    pub async fn translate_one_detailed(&self, text: &str, target: Language) -> Translation {
        if target.is_canonical() || text.trim().is_empty() {
            self.metrics.record_identity();
            return Translation {
                text: text.to_string(),
                source: TranslationSource::Identity,
            };
        }

        match self.remote(text, target).await {
            Ok(translated) => Translation {
                text: translated,
                source: TranslationSource::Remote,
            },
            Err(e) => {
                self.metrics.record_remote_failure();
                warn!(
                    "Translation to {} via {} failed, using local phrases: {:#}",
                    target,
                    self.provider.name(),
                    e
                );
                self.local_fallback(text, target)
            }
        }
    }

    /// Translate every entry independently, one remote call per entry.
    ///
    /// The result always has exactly the input's keys, in the same order.
    pub async fn translate_many(
        &self,
        texts: &TranslatableTextSet,
        target: Language,
    ) -> TranslatableTextSet {
        if target.is_canonical() {
            self.metrics.record_identity();
            return texts.clone();
        }

        let mut translated = TranslatableTextSet::new();
        for (key, text) in texts.iter() {
            translated.insert(key, self.translate_one(text, target).await);
        }
        translated
    }

    async fn remote(&self, text: &str, target: Language) -> Result<String> {
        self.metrics.record_remote_call();

        let translated = tokio::time::timeout(self.timeout, self.provider.translate(text, target))
            .await
            .map_err(|_| anyhow!("Translation timed out after {:?}", self.timeout))??;

        let validation = TranslationValidator::validate(text, &translated);
        if validation.has_errors() {
            bail!("Invalid translation: {}", validation.errors.join("; "));
        }
        if validation.has_warnings() {
            debug!(
                "Translation validation warnings for {} ({}): {:?}",
                target,
                target.code(),
                validation.warnings
            );
        }

        Ok(translated)
    }

    fn local_fallback(&self, text: &str, target: Language) -> Translation {
        if let Some(table) = target.phrases() {
            if let Some(phrase) = table.exact(text) {
                self.metrics.record_phrase_exact();
                return Translation {
                    text: phrase.to_string(),
                    source: TranslationSource::PhraseExact,
                };
            }
            if let Some(replaced) = table.substitute(text) {
                self.metrics.record_phrase_substring();
                return Translation {
                    text: replaced,
                    source: TranslationSource::PhraseSubstring,
                };
            }
        }

        self.metrics.record_untranslated();
        debug!("No {} phrase for {:?}, passing through", target, text);
        Translation {
            text: text.to_string(),
            source: TranslationSource::Untranslated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wiremock::{
        matchers::{body_partial_json, body_string_contains, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== Helpers ====================

    /// Provider answering from a fixed table and failing for anything else
    struct ScriptedTranslator {
        answers: HashMap<&'static str, &'static str>,
    }

    impl TranslationProvider for ScriptedTranslator {
        fn name(&self) -> &str {
            "scripted"
        }

        fn translate<'a>(&'a self, text: &'a str, _target: Language) -> BoxFuture<'a, Result<String>> {
            Box::pin(async move {
                self.answers
                    .get(text)
                    .map(|t| t.to_string())
                    .ok_or_else(|| anyhow!("no scripted answer for {}", text))
            })
        }
    }

    fn scripted(answers: &[(&'static str, &'static str)]) -> TranslationGateway {
        TranslationGateway::new(
            Arc::new(ScriptedTranslator {
                answers: answers.iter().copied().collect(),
            }),
            Duration::from_secs(1),
        )
    }

    fn offline() -> TranslationGateway {
        TranslationGateway::new(Arc::new(OfflineTranslator), Duration::from_secs(1))
    }

    fn ollama(server: &MockServer, timeout: Duration) -> TranslationGateway {
        TranslationGateway::new(
            Arc::new(OllamaTranslator::new(
                reqwest::Client::new(),
                format!("{}/api/generate", server.uri()),
                "llama3:8b",
            )),
            timeout,
        )
    }

    fn create_ollama_response(content: &str) -> serde_json::Value {
        serde_json::json!({
            "model": "llama3:8b",
            "created_at": "2024-01-15T10:30:00Z",
            "response": content,
            "done": true
        })
    }

    // ==================== Prompt Tests ====================

    #[test]
    fn test_build_translation_prompt() {
        let prompt = build_translation_prompt("Featured Sites", "Tamil");
        assert!(prompt.starts_with("Translate the following text to Tamil."));
        assert!(prompt.contains("Only provide the translation"));
        assert!(prompt.ends_with("\"Featured Sites\""));
    }

    #[test]
    fn test_strip_wrapping_quotes() {
        assert_eq!(strip_wrapping_quotes("\"தேடு\""), "தேடு");
        assert_eq!(strip_wrapping_quotes("  “தேடு”\n"), "தேடு");
        assert_eq!(strip_wrapping_quotes("'x'"), "x");
        assert_eq!(strip_wrapping_quotes("plain"), "plain");
        assert_eq!(strip_wrapping_quotes("\"unbalanced"), "\"unbalanced");
    }

    #[test]
    fn test_generate_request_serialization() {
        let request = GenerateRequest {
            model: "llama3:8b",
            prompt: "Translate".to_string(),
            stream: false,
        };
        let json = serde_json::to_string(&request).expect("Should serialize");
        assert!(json.contains("\"model\":\"llama3:8b\""));
        assert!(json.contains("\"stream\":false"));
    }

    // ==================== Text Set Tests ====================

    #[test]
    fn test_text_set_preserves_insertion_order() {
        let set: TranslatableTextSet = [("title", "Discover Heritage"), ("search", "Search")]
            .into_iter()
            .collect();
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["title", "search"]);
        assert_eq!(set.get("search"), Some("Search"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_text_set_insert_replaces_in_place() {
        let mut set = TranslatableTextSet::new();
        set.insert("a", "one");
        set.insert("b", "two");
        assert_eq!(set.insert("a", "uno"), Some("one".to_string()));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![("a", "uno"), ("b", "two")]);
    }

    #[test]
    fn test_text_set_text_falls_back_to_key() {
        let set: TranslatableTextSet = [("a", "Search")].into_iter().collect();
        assert_eq!(set.text("a"), "Search");
        assert_eq!(set.text("missing"), "missing");
    }

    #[test]
    fn test_text_set_same_keys() {
        let a: TranslatableTextSet = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: TranslatableTextSet = [("x", "uno"), ("y", "dos")].into_iter().collect();
        let c: TranslatableTextSet = [("x", "1")].into_iter().collect();
        assert!(a.same_keys(&b));
        assert!(!a.same_keys(&c));
    }

    // ==================== Fast Path Tests ====================

    #[tokio::test]
    async fn test_english_is_identity_without_call() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_ollama_response("x")))
            .expect(0)
            .mount(&mock_server)
            .await;

        let gateway = ollama(&mock_server, Duration::from_secs(1));
        let result = gateway
            .translate_one_detailed("Choose your Language", Language::ENGLISH)
            .await;

        assert_eq!(result.text, "Choose your Language");
        assert_eq!(result.source, TranslationSource::Identity);
    }

    #[tokio::test]
    async fn test_blank_text_is_identity() {
        let gateway = offline();
        let result = gateway.translate_one_detailed("  ", Language::TAMIL).await;
        assert_eq!(result.text, "  ");
        assert_eq!(result.source, TranslationSource::Identity);
        assert_eq!(gateway.metrics().remote_calls(), 0);
    }

    // ==================== Remote Tests ====================

    #[tokio::test]
    async fn test_remote_translation_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(
                serde_json::json!({"model": "llama3:8b", "stream": false}),
            ))
            .and(body_string_contains("to Hindi"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(create_ollama_response("\"खोज\"")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let gateway = ollama(&mock_server, Duration::from_secs(1));
        let result = gateway.translate_one_detailed("Search", Language::HINDI).await;

        assert_eq!(result.text, "खोज");
        assert_eq!(result.source, TranslationSource::Remote);
        assert_eq!(gateway.metrics().remote_calls(), 1);
        assert_eq!(gateway.metrics().remote_failures(), 0);
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_exact_phrase() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&mock_server)
            .await;

        let gateway = ollama(&mock_server, Duration::from_secs(1));
        let result = gateway
            .translate_one_detailed("Choose your Language", Language::TAMIL)
            .await;

        assert_eq!(result.text, "உங்கள் மொழியைத் தேர்ந்தெடுக்கவும்");
        assert_eq!(result.source, TranslationSource::PhraseExact);
        assert!(!result.text.contains("500"));
        assert_eq!(gateway.metrics().remote_failures(), 1);
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let gateway = ollama(&mock_server, Duration::from_secs(1));
        let result = gateway.translate_one_detailed("Reset", Language::TAMIL).await;

        assert_eq!(result.text, "மீட்டமை");
        assert_eq!(result.source, TranslationSource::PhraseExact);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_ollama_response("late"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let gateway = ollama(&mock_server, Duration::from_millis(50));
        let result = gateway.translate_one_detailed("Stop", Language::TAMIL).await;

        assert_eq!(result.text, "நிறுத்து");
        assert_eq!(result.source, TranslationSource::PhraseExact);
    }

    #[tokio::test]
    async fn test_prompt_echo_is_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_ollama_response(
                "Translate the following text to Tamil: Listen",
            )))
            .mount(&mock_server)
            .await;

        let gateway = ollama(&mock_server, Duration::from_secs(1));
        let result = gateway.translate_one_detailed("Listen", Language::TAMIL).await;

        assert_eq!(result.text, "கேளுங்கள்");
        assert_eq!(result.source, TranslationSource::PhraseExact);
    }

    #[tokio::test]
    async fn test_connection_refused_falls_back() {
        let gateway = TranslationGateway::new(
            Arc::new(OllamaTranslator::new(
                reqwest::Client::new(),
                "http://127.0.0.1:1/api/generate",
                "llama3:8b",
            )),
            Duration::from_secs(2),
        );

        let result = gateway.translate_one("Featured Sites", Language::TAMIL).await;
        assert_eq!(result, "சிறப்புத் தளங்கள்");
    }

    // ==================== Fallback Tier Tests ====================

    #[tokio::test]
    async fn test_substring_fallback() {
        let gateway = offline();
        let result = gateway
            .translate_one_detailed("Popular: Mahabalipuram", Language::TAMIL)
            .await;

        assert_eq!(result.text, "பிரபலமானது: Mahabalipuram");
        assert_eq!(result.source, TranslationSource::PhraseSubstring);
    }

    #[tokio::test]
    async fn test_untranslated_passthrough_is_tagged() {
        let gateway = offline();
        let result = gateway
            .translate_one_detailed("Choose your Language", Language::HINDI)
            .await;

        assert_eq!(result.text, "Choose your Language");
        assert_eq!(result.source, TranslationSource::Untranslated);
        assert!(!result.is_translated());
        assert_eq!(gateway.metrics().report().untranslated, 1);
    }

    // ==================== Batch Tests ====================

    #[tokio::test]
    async fn test_batch_english_unchanged() {
        let gateway = offline();
        let texts: TranslatableTextSet = [("a", "Search"), ("b", "Reset")].into_iter().collect();

        let result = gateway.translate_many(&texts, Language::ENGLISH).await;
        assert_eq!(result, texts);
        assert_eq!(gateway.metrics().remote_calls(), 0);
    }

    #[tokio::test]
    async fn test_batch_entries_fail_independently() {
        let gateway = scripted(&[("Discover Heritage", "பாரம்பரியம் கண்டறிக")]);
        let texts: TranslatableTextSet = [
            ("title", "Discover Heritage"),
            ("search", "Search"),
            ("city", "Thanjavur"),
        ]
        .into_iter()
        .collect();

        let result = gateway.translate_many(&texts, Language::TAMIL).await;

        assert!(result.same_keys(&texts));
        assert_eq!(result.get("title"), Some("பாரம்பரியம் கண்டறிக"));
        assert_eq!(result.get("search"), Some("தேடு"));
        assert_eq!(result.get("city"), Some("Thanjavur"));

        let report = gateway.metrics().report();
        assert_eq!(report.remote_calls, 3);
        assert_eq!(report.remote_failures, 2);
    }

    #[tokio::test]
    async fn test_batch_issues_one_call_per_entry() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("\\\"Search\\\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_ollama_response("खोज")))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("\\\"Reset\\\""))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(create_ollama_response("रीसेट")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let gateway = ollama(&mock_server, Duration::from_secs(1));
        let texts: TranslatableTextSet = [("a", "Search"), ("b", "Reset")].into_iter().collect();
        let result = gateway.translate_many(&texts, Language::HINDI).await;

        assert_eq!(result.get("a"), Some("खोज"));
        assert_eq!(result.get("b"), Some("रीसेट"));
    }
}
