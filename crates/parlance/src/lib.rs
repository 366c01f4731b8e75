//! Parlance internationalization (i18n)
//!
//! [`IntlService`] is the application-facing API:
//! - default / current / available locale bookkeeping
//! - `tr` / `tr_n` lookups through any [`Translator`] (usually a
//!   [`TranslationEngine`] over a locale directory)
//! - `${name}` placeholder substitution with a configurable regex template
//! - date/time formatting for the active locale
//!
//! ```rust
//! use std::sync::Arc;
//! use parlance::{replacements, IntlService, LocaleData, MemorySource, TranslationEngine};
//!
//! let mut de = LocaleData::new();
//! de.insert_plural("${n} file", ["${n} Datei", "${n} Dateien"]);
//!
//! let mut intl = IntlService::new("de_DE", vec!["de_DE".into()]);
//! intl.set_translator(Arc::new(TranslationEngine::from_source(
//!     MemorySource::new().with_locale("de_DE", de),
//! )));
//!
//! let r = replacements! { n: 3 };
//! assert_eq!(intl.tr_n("${n} file", "${n} files", 3, Some(&r), None), "3 Dateien");
//! ```

mod args;
mod config;
mod date;
mod error;
mod replace;
mod service;

pub use args::{ArgValue, Replacements};
pub use config::{IntlConfig, CONFIG_FILE_NAME};
pub use date::{chrono_locale, format_date_time, DateStyle, DateTimeFormat};
pub use error::IntlError;
pub use replace::{ReplaceTemplate, DEFAULT_REPLACE_TEMPLATE};
pub use service::IntlService;

pub use parlance_core::{
    resolve_index, DirSource, LocaleData, LocaleDataStore, LocaleSource, MemorySource,
    PluralExpr, PluralExprError, PluralRule, PluralSelection, SourceError, TranslationEngine,
    TranslationEntry, Translator,
};

/// Build [`Replacements`] from `name: value` pairs.
///
/// Examples:
/// - `replacements! {}`
/// - `replacements! { name: user_name, count: 3 }`
#[macro_export]
macro_rules! replacements {
    () => {
        $crate::Replacements::new()
    };
    ($($name:ident : $value:expr),+ $(,)?) => {{
        let mut r = $crate::Replacements::new();
        $(
            r.push(stringify!($name), $value);
        )+
        r
    }};
}
