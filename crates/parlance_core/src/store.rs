//! Lazily populated per-locale cache.
//!
//! # Invariants
//!
//! 1. A locale is loaded at most once per store, even under concurrent first
//!    access; every later `get` returns the same `Arc`.
//! 2. Loading never fails: missing or unreadable data becomes an empty
//!    [`LocaleData`].
//! 3. Loads of different locales do not serialize behind each other; the map
//!    lock is only held to find or insert a locale's cell.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::data::LocaleData;
use crate::source::LocaleSource;

type Cell = Arc<OnceLock<Arc<LocaleData>>>;

pub struct LocaleDataStore {
    source: Box<dyn LocaleSource>,
    cache: RwLock<FxHashMap<String, Cell>>,
}

impl LocaleDataStore {
    pub fn new(source: impl LocaleSource + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn LocaleSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Data for `locale`, loading it on first use.
    pub fn get(&self, locale: &str) -> Arc<LocaleData> {
        let cell = self.cell(locale);
        cell.get_or_init(|| Arc::new(self.load(locale))).clone()
    }

    /// Load the given locales now instead of on first query.
    pub fn preload<I, S>(&self, locales: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for locale in locales {
            self.get(locale.as_ref());
        }
    }

    pub fn is_loaded(&self, locale: &str) -> bool {
        self.cache
            .read()
            .get(locale)
            .is_some_and(|cell| cell.get().is_some())
    }

    /// Keys of every loaded locale, sorted.
    pub fn loaded_locales(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .cache
            .read()
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(locale, _)| locale.clone())
            .collect();
        out.sort_unstable();
        out
    }

    fn cell(&self, locale: &str) -> Cell {
        if let Some(cell) = self.cache.read().get(locale) {
            return cell.clone();
        }
        self.cache
            .write()
            .entry(locale.to_string())
            .or_default()
            .clone()
    }

    fn load(&self, locale: &str) -> LocaleData {
        match self.source.load(locale) {
            Ok(Some(data)) => {
                debug!(
                    locale = %locale,
                    entries = data.len(),
                    plural_rule = data.plural_rule().is_some(),
                    "loaded locale data"
                );
                data
            }
            Ok(None) => {
                debug!(locale = %locale, "no locale data; using empty catalog");
                LocaleData::new()
            }
            Err(err) => {
                warn!(locale = %locale, error = %err, "failed to load locale data; using empty catalog");
                LocaleData::new()
            }
        }
    }
}
