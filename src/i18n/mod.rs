//! Internationalization (i18n) module for the guide's display languages.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages and their metadata
//! - `language`: Validated `Language` type, identified by display name
//! - `phrases`: Static phrase tables used when remote translation fails
//! - `validator`: Sanity checks on remote translation output
//! - `metrics`: Counters for how translations were resolved
//!
//! # Example
//!
//! ```rust
//! use heritage_guide::i18n::{Language, LanguageRegistry};
//!
//! let tamil = Language::from_name("tamil").unwrap();
//! assert_eq!(tamil.code(), "ta");
//!
//! let names: Vec<_> = LanguageRegistry::get()
//!     .list_enabled()
//!     .iter()
//!     .map(|lang| lang.name)
//!     .collect();
//! assert!(names.contains(&"English"));
//! ```

mod language;
mod metrics;
mod phrases;
mod registry;
mod validator;

pub use language::Language;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use phrases::{PhraseTable, TAMIL_PHRASES};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use validator::{TranslationValidator, ValidationReport};
