use std::path::PathBuf;

use thiserror::Error;

/// Failure to read locale data from a [`LocaleSource`](crate::LocaleSource).
///
/// These never reach translation callers: the store logs them and falls back
/// to an empty catalog.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("locale key `{0}` cannot name a locale file")]
    InvalidLocaleKey(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("yaml error in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("json error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("toml error in {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A gettext `Plural-Forms` header that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluralExprError {
    #[error("missing `nplurals` assignment")]
    MissingNplurals,

    #[error("missing `plural` assignment")]
    MissingPlural,

    #[error("invalid nplurals `{0}` (expected an integer >= 1)")]
    InvalidNplurals(String),

    #[error("unexpected assignment `{0}`")]
    UnknownAssignment(String),

    #[error("plural expression syntax error at offset {offset}: {msg}")]
    Syntax { offset: usize, msg: String },
}
