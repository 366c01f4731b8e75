//! Parlance translation engine
//!
//! Resolves a text key into a locale's translation:
//! - [`LocaleDataStore`]: loads each locale once from a [`LocaleSource`] and
//!   degrades missing or malformed data to an empty catalog
//! - [`resolve_index`]: evaluates a locale's [`PluralRule`] and clamps the result
//! - [`TranslationEngine`]: `translate` / `translate_plurals` lookups behind the
//!   [`Translator`] trait
//!
//! Lookups never fail; the worst case echoes the input text.
//!
//! # Example
//!
//! ```rust
//! use parlance_core::{LocaleData, MemorySource, TranslationEngine, Translator};
//!
//! let mut de = LocaleData::new();
//! de.insert_plural("file", ["Datei", "Dateien"]);
//!
//! let engine = TranslationEngine::from_source(MemorySource::new().with_locale("de_DE", de));
//! assert_eq!(engine.translate_plurals("file", "files", 1, "de_DE"), "Datei");
//! assert_eq!(engine.translate_plurals("file", "files", 3, "de_DE"), "Dateien");
//! assert_eq!(engine.translate("folder", "de_DE"), "folder");
//! ```

mod data;
mod engine;
mod error;
mod locale;
mod plural;
mod source;
mod store;

pub use data::{LocaleData, TranslationEntry};
pub use engine::{TranslationEngine, Translator};
pub use error::{PluralExprError, SourceError};
pub use locale::is_path_safe;
pub use plural::{resolve_index, PluralExpr, PluralRule, PluralSelection};
pub use source::{DirSource, LocaleSource, MemorySource};
pub use store::LocaleDataStore;
