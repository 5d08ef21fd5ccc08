//! Persisted language slot.
//!
//! The slot holds one `{language, languageTimestamp}` pair. Both values are
//! always written together so a watcher can never observe a new language
//! without its timestamp. Store operations are total: I/O problems are
//! logged and reads fall back to English.

use crate::i18n::Language;
use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// The persisted (language, timestamp) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageChangeRecord {
    pub language: String,
    #[serde(rename = "languageTimestamp")]
    pub timestamp: String,
}

impl LanguageChangeRecord {
    /// A record for `language` stamped strictly after `previous`.
    pub fn next(language: Language, previous: Option<&LanguageChangeRecord>) -> Self {
        let mut stamp = Utc::now();
        if let Some(prev) = previous.and_then(|p| DateTime::parse_from_rfc3339(&p.timestamp).ok()) {
            let prev = prev.with_timezone(&Utc);
            if stamp <= prev {
                stamp = prev + ChronoDuration::nanoseconds(1);
            }
        }

        Self {
            language: language.name().to_string(),
            timestamp: stamp.to_rfc3339_opts(SecondsFormat::Nanos, true),
        }
    }

    /// The stored language, or English if the name is no longer supported.
    pub fn resolve_language(&self) -> Language {
        Language::from_name(&self.language).unwrap_or_else(|e| {
            warn!("Stored language is not usable ({}), using English", e);
            Language::ENGLISH
        })
    }
}

/// Read/write access to the single language slot.
pub trait LanguageStore: Send + Sync {
    /// The raw persisted record, if any.
    fn record(&self) -> Option<LanguageChangeRecord>;

    /// Persist `language` with a fresh timestamp as one write.
    fn set(&self, language: Language);

    /// The persisted language, defaulting to English.
    fn get(&self) -> Language {
        self.record()
            .map(|record| record.resolve_language())
            .unwrap_or(Language::ENGLISH)
    }

    fn change_timestamp(&self) -> Option<String> {
        self.record().map(|record| record.timestamp)
    }
}

// ==================== In-memory store ====================

/// Slot kept in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryLanguageStore {
    slot: Arc<Mutex<Option<LanguageChangeRecord>>>,
}

impl MemoryLanguageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose slot already holds `language`.
    pub fn with_language(language: Language) -> Self {
        let store = Self::new();
        store.set(language);
        store
    }
}

impl LanguageStore for MemoryLanguageStore {
    fn record(&self) -> Option<LanguageChangeRecord> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, language: Language) {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let record = LanguageChangeRecord::next(language, slot.as_ref());
        debug!("Language set to {} at {}", record.language, record.timestamp);
        *slot = Some(record);
    }
}

// ==================== File-backed store ====================

/// Slot persisted as a small JSON file, surviving restarts.
///
/// Writes go to a sibling temp file that is renamed over the slot, so
/// readers see either the old pair or the new one. The temp name carries
/// the process id, as other processes may write the same slot.
#[derive(Debug)]
pub struct FileLanguageStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileLanguageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "language.json".into());
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    fn write_record(&self, record: &LanguageChangeRecord) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(record).map_err(std::io::Error::other)?;
        let temp = self.temp_path();
        std::fs::write(&temp, json)?;
        std::fs::rename(&temp, &self.path)
    }
}

impl LanguageStore for FileLanguageStore {
    fn record(&self) -> Option<LanguageChangeRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read language slot {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    "Language slot {} is malformed, ignoring it: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn set(&self, language: Language) {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let record = LanguageChangeRecord::next(language, self.record().as_ref());

        match self.write_record(&record) {
            Ok(()) => debug!(
                "Language set to {} at {} ({})",
                record.language,
                record.timestamp,
                self.path.display()
            ),
            Err(e) => warn!(
                "Failed to persist language {} to {}: {}",
                record.language,
                self.path.display(),
                e
            ),
        }
    }
}
