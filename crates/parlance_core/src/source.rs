use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_yaml::Value;

use crate::data::LocaleData;
use crate::error::SourceError;
use crate::locale::is_path_safe;

/// Where locale data comes from.
///
/// `Ok(None)` means "no data for this locale"; errors are logged by the store
/// and treated the same way.
pub trait LocaleSource: Send + Sync {
    fn load(&self, locale: &str) -> Result<Option<LocaleData>, SourceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
    Json,
}

/// Lookup order when several files exist for the same locale.
const EXTENSIONS: [(&str, Format); 4] = [
    ("yaml", Format::Yaml),
    ("yml", Format::Yaml),
    ("toml", Format::Toml),
    ("json", Format::Json),
];

impl Format {
    fn parse(self, path: &Path, src: &str) -> Result<Value, SourceError> {
        match self {
            Self::Yaml => serde_yaml::from_str(src).map_err(|source| SourceError::Yaml {
                path: path.to_path_buf(),
                source,
            }),
            Self::Toml => toml::from_str(src).map_err(|source| SourceError::Toml {
                path: path.to_path_buf(),
                source,
            }),
            Self::Json => serde_json::from_str(src).map_err(|source| SourceError::Json {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Locale files in one directory, named after the locale key:
/// `<dir>/de_DE.yaml`, `<dir>/de_DE.toml`, ...
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First existing locale file for `locale`, in [`EXTENSIONS`] order.
    fn locate(&self, locale: &str) -> Option<(PathBuf, Format)> {
        EXTENSIONS.iter().find_map(|(ext, format)| {
            let path = self.dir.join(format!("{locale}.{ext}"));
            path.is_file().then_some((path, *format))
        })
    }
}

impl LocaleSource for DirSource {
    fn load(&self, locale: &str) -> Result<Option<LocaleData>, SourceError> {
        if !is_path_safe(locale) {
            return Err(SourceError::InvalidLocaleKey(locale.to_string()));
        }
        let Some((path, format)) = self.locate(locale) else {
            return Ok(None);
        };

        let src = fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        let doc = format.parse(&path, &src)?;
        Ok(Some(LocaleData::from_document(locale, doc)))
    }
}

/// Locale data registered in code.
///
/// Each registered locale is handed to the first store that asks for it;
/// later loads of the same key see no data.
#[derive(Default)]
pub struct MemorySource {
    locales: Mutex<FxHashMap<String, LocaleData>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(self, locale: impl Into<String>, data: LocaleData) -> Self {
        self.insert(locale, data);
        self
    }

    pub fn insert(&self, locale: impl Into<String>, data: LocaleData) {
        self.locales.lock().insert(locale.into(), data);
    }
}

impl LocaleSource for MemorySource {
    fn load(&self, locale: &str) -> Result<Option<LocaleData>, SourceError> {
        Ok(self.locales.lock().remove(locale))
    }
}
