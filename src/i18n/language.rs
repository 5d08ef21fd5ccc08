//! Language type: validated display-language representation.
//!
//! A `Language` can only be constructed from a registry entry, so any value
//! in hand is a supported, enabled language with a non-empty name.

use crate::i18n::{LanguageConfig, LanguageRegistry, PhraseTable};
use anyhow::{bail, Result};
use std::fmt;

/// A validated language, identified by its English display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// English display name (e.g., "English", "Tamil")
    name: &'static str,
}

impl Language {
    /// The canonical source language of every label and record.
    pub const ENGLISH: Language = Language { name: "English" };

    pub const TAMIL: Language = Language { name: "Tamil" };

    pub const HINDI: Language = Language { name: "Hindi" };

    /// Create a Language from its display name (case-insensitive).
    ///
    /// # Returns
    /// * `Ok(Language)` if the name is known and the language is enabled
    /// * `Err` if the name is not found or the language is disabled
    pub fn from_name(name: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_name(name) {
            Some(config) if config.enabled => Ok(Language { name: config.name }),
            Some(_) => bail!("Language '{}' is not enabled", name),
            None => bail!("Unknown language: '{}'", name),
        }
    }

    /// Create a Language from an ISO 639-1 code.
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { name: config.name }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Get the canonical (source) language.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { name: config.name }
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the name is not found in the registry. This cannot happen
    /// for a Language built through `from_name`, `from_code` or a constant.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_name(self.name)
            .expect("Language name should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn code(&self) -> &'static str {
        self.config().code
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Font class hint for the script ("" when the default font is fine).
    pub fn font_class(&self) -> &'static str {
        self.config().font_class
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }

    /// Static phrase table for this language, if one ships.
    pub fn phrases(&self) -> Option<&'static PhraseTable> {
        self.config().phrases
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::ENGLISH
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
