//! Translation quality validation module.
//!
//! Remote translations come from a general-purpose LLM, so the raw output
//! is checked before it is shown: an empty reply, a reply that echoes the
//! instruction prompt, or one that drops `{placeholder}` tokens counts as a
//! failed translation and the caller falls back to local phrases.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Validation report containing errors and warnings about a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that make the translation unusable
    pub errors: Vec<String>,

    /// Non-critical observations
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for translation quality.
pub struct TranslationValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// Fragments of the translation prompt that must never reach the user.
const PROMPT_ECHOES: [&str; 2] = ["Translate the following text", "Only provide the translation"];

/// Replies longer than this multiple of the source are suspicious.
const MAX_LENGTH_RATIO: usize = 4;

impl TranslationValidator {
    /// Validate a remote translation against its source text.
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        let trimmed = translated.trim();

        if trimmed.is_empty() {
            report.errors.push("Translation is empty".to_string());
            return report;
        }

        for echo in PROMPT_ECHOES {
            if trimmed.contains(echo) {
                report
                    .errors
                    .push(format!("Translation echoes the prompt: '{}'", echo));
            }
        }

        let missing = Self::missing_placeholders(original, translated);
        if !missing.is_empty() {
            report.errors.push(format!(
                "Missing placeholders: {}",
                missing.into_iter().collect::<Vec<_>>().join(", ")
            ));
        }

        if trimmed == original.trim() && original.chars().any(char::is_alphabetic) {
            report
                .warnings
                .push("Translation is identical to the source text".to_string());
        }

        let source_len = original.chars().count().max(1);
        if trimmed.chars().count() > source_len * MAX_LENGTH_RATIO + 20 {
            report.warnings.push(format!(
                "Translation is much longer than the source ({} vs {} chars)",
                trimmed.chars().count(),
                source_len
            ));
        }

        report
    }

    /// `{name}` tokens present in the original but absent from the translation.
    fn missing_placeholders(original: &str, translated: &str) -> BTreeSet<String> {
        let regex =
            PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{[A-Za-z_][A-Za-z0-9_]*\}").unwrap());

        regex
            .find_iter(original)
            .map(|m| m.as_str())
            .filter(|token| !translated.contains(token))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_translation() {
        let report = TranslationValidator::validate("Featured Sites", "சிறப்புத் தளங்கள்");
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_empty_translation_is_error() {
        let report = TranslationValidator::validate("Search", "   \n");
        assert!(report.has_errors());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_prompt_echo_is_error() {
        let report = TranslationValidator::validate(
            "Reset",
            "Translate the following text to Tamil: Reset",
        );
        assert!(report.has_errors());
        assert!(report.errors[0].contains("echoes the prompt"));
    }

    #[test]
    fn test_missing_placeholder_is_error() {
        let report = TranslationValidator::validate(
            "You can now ask questions about {site_name}!",
            "நீங்கள் இப்போது கேள்விகள் கேட்கலாம்!",
        );
        assert!(report.has_errors());
        assert!(report.errors[0].contains("{site_name}"));
    }

    #[test]
    fn test_preserved_placeholder_is_clean() {
        let report = TranslationValidator::validate(
            "Welcome to {site_name}",
            "{site_name}-க்கு வரவேற்கிறோம்",
        );
        assert!(!report.has_errors());
    }

    #[test]
    fn test_identical_output_is_warning() {
        let report = TranslationValidator::validate("AI", "AI");
        assert!(!report.has_errors());
        assert!(report.has_warnings());
    }

    #[test]
    fn test_identical_numbers_are_not_flagged() {
        let report = TranslationValidator::validate("600009", "600009");
        assert!(report.is_clean());
    }

    #[test]
    fn test_runaway_output_is_warning() {
        let long_reply = "word ".repeat(40);
        let report = TranslationValidator::validate("Stop", &long_reply);
        assert!(!report.has_errors());
        assert!(report.warnings.iter().any(|w| w.contains("much longer")));
    }

    #[test]
    fn test_report_default_is_clean() {
        assert!(ValidationReport::default().is_clean());
    }
}
