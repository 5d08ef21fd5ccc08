//! Language registry: Single source of truth for all supported languages.
//!
//! This module provides a centralized registry of all display languages the
//! guide can be switched to. It uses a singleton pattern with `OnceLock` to
//! ensure thread-safe initialization and access.

use crate::i18n::phrases::{PhraseTable, TAMIL_PHRASES};
use std::sync::OnceLock;

/// Configuration for a supported language.
///
/// Languages are identified by their English display name; the ISO code is
/// metadata used for request headers and font selection only.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "ta")
    pub code: &'static str,

    /// English name of the language, also its identity (e.g., "Tamil")
    pub name: &'static str,

    /// Native name of the language (e.g., "தமிழ்")
    pub native_name: &'static str,

    /// CSS-style font class hint for scripts that need one ("" for Latin)
    pub font_class: &'static str,

    /// Whether this is the canonical/source language (only one should be true)
    pub is_canonical: bool,

    /// Whether this language can be selected
    pub enabled: bool,

    /// Static phrase table used when remote translation fails
    pub phrases: Option<&'static PhraseTable>,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its display name (case-insensitive).
    pub fn get_by_name(&self, name: &str) -> Option<&LanguageConfig> {
        let name = name.trim();
        self.languages
            .iter()
            .find(|lang| lang.name.eq_ignore_ascii_case(name))
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        let code = code.trim();
        self.languages
            .iter()
            .find(|lang| lang.code.eq_ignore_ascii_case(code))
    }

    /// Get all enabled languages, in registry order.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get all languages (including disabled ones).
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Filter enabled languages by a search term, the way the language
    /// selection screen does: case-insensitive substring of the English or
    /// native name. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&LanguageConfig> {
        let term = term.trim().to_lowercase();
        self.list_enabled()
            .into_iter()
            .filter(|lang| {
                term.is_empty()
                    || lang.name.to_lowercase().contains(&term)
                    || lang.native_name.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if no canonical language is found or if multiple canonical
    /// languages are defined (this indicates a configuration error).
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    /// Check if a language name is supported and enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.get_by_name(name)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }
}

/// Default language configurations: English (canonical) and the six
/// Indian languages the guide ships fonts for.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            font_class: "",
            is_canonical: true,
            enabled: true,
            phrases: None,
        },
        LanguageConfig {
            code: "ta",
            name: "Tamil",
            native_name: "தமிழ்",
            font_class: "font-tamil",
            is_canonical: false,
            enabled: true,
            phrases: Some(&TAMIL_PHRASES),
        },
        LanguageConfig {
            code: "hi",
            name: "Hindi",
            native_name: "हिन्दी",
            font_class: "font-hindi",
            is_canonical: false,
            enabled: true,
            phrases: None,
        },
        LanguageConfig {
            code: "te",
            name: "Telugu",
            native_name: "తెలుగు",
            font_class: "font-telugu",
            is_canonical: false,
            enabled: true,
            phrases: None,
        },
        LanguageConfig {
            code: "ml",
            name: "Malayalam",
            native_name: "മലയാളം",
            font_class: "font-malayalam",
            is_canonical: false,
            enabled: true,
            phrases: None,
        },
        LanguageConfig {
            code: "kn",
            name: "Kannada",
            native_name: "ಕನ್ನಡ",
            font_class: "font-kannada",
            is_canonical: false,
            enabled: true,
            phrases: None,
        },
        LanguageConfig {
            code: "bn",
            name: "Bengali",
            native_name: "বাংলা",
            font_class: "font-bengali",
            is_canonical: false,
            enabled: true,
            phrases: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_name_is_case_insensitive() {
        let registry = LanguageRegistry::get();

        let tamil = registry.get_by_name("tamil").expect("Tamil should exist");
        assert_eq!(tamil.name, "Tamil");
        assert_eq!(tamil.code, "ta");
        assert_eq!(tamil.font_class, "font-tamil");
        assert!(registry.get_by_name("  TAMIL ").is_some());
    }

    #[test]
    fn test_get_by_name_nonexistent() {
        let registry = LanguageRegistry::get();
        assert!(registry.get_by_name("Klingon").is_none());
        assert!(registry.get_by_name("").is_none());
    }

    #[test]
    fn test_get_by_code() {
        let registry = LanguageRegistry::get();
        assert_eq!(registry.get_by_code("hi").map(|l| l.name), Some("Hindi"));
        assert_eq!(registry.get_by_code("bn").map(|l| l.name), Some("Bengali"));
        assert!(registry.get_by_code("fr").is_none());
    }

    #[test]
    fn test_list_enabled_contains_all_seven() {
        let registry = LanguageRegistry::get();
        let enabled = registry.list_enabled();

        assert_eq!(enabled.len(), 7);
        assert_eq!(enabled[0].name, "English");
        assert!(enabled.iter().any(|lang| lang.name == "Malayalam"));
        assert_eq!(registry.list_all().len(), 7);
    }

    #[test]
    fn test_canonical_returns_english() {
        let canonical = LanguageRegistry::get().canonical();

        assert_eq!(canonical.name, "English");
        assert!(canonical.is_canonical);
        assert!(canonical.font_class.is_empty());
    }

    #[test]
    fn test_only_tamil_has_phrase_table() {
        let registry = LanguageRegistry::get();
        let with_tables: Vec<_> = registry
            .list_all()
            .into_iter()
            .filter(|lang| lang.phrases.is_some())
            .map(|lang| lang.name)
            .collect();

        assert_eq!(with_tables, vec!["Tamil"]);
    }

    #[test]
    fn test_search_filters_by_name() {
        let registry = LanguageRegistry::get();

        let matches: Vec<_> = registry.search("al").iter().map(|l| l.name).collect();
        assert_eq!(matches, vec!["Malayalam", "Bengali"]);

        assert_eq!(registry.search("").len(), 7);
        assert!(registry.search("xyz").is_empty());
    }

    #[test]
    fn test_search_matches_native_name() {
        let registry = LanguageRegistry::get();
        let matches = registry.search("தமிழ்");

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Tamil");
    }

    #[test]
    fn test_is_enabled() {
        let registry = LanguageRegistry::get();
        assert!(registry.is_enabled("English"));
        assert!(registry.is_enabled("kannada"));
        assert!(!registry.is_enabled("French"));
    }
}
