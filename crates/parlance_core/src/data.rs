//! Per-locale translation tables.
//!
//! Locale documents are read into a [`serde_yaml::Value`] (YAML, JSON and TOML
//! all land in the same model) and sanitized by [`LocaleData::from_document`]:
//!
//! | Input | Result |
//! |-------|--------|
//! | document is not a mapping | empty texts, no rule |
//! | `texts` missing or not a mapping | empty texts |
//! | `pluralForm` missing, not a string, or unparsable | no rule |
//! | text value is a string / number / bool | [`TranslationEntry::Single`] |
//! | text value is a sequence of scalars | [`TranslationEntry::Plural`] |
//! | any other text value | entry dropped |

use rustc_hash::FxHashMap;
use serde_yaml::{Mapping, Value};
use tracing::warn;

use crate::plural::PluralRule;

const TEXTS_FIELD: &str = "texts";
const PLURAL_FORM_FIELD: &str = "pluralForm";

/// A translation: one string, or one string per plural form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationEntry {
    Single(String),
    Plural(Vec<String>),
}

impl TranslationEntry {
    /// The first form (the entry itself for [`TranslationEntry::Single`]).
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s),
            Self::Plural(forms) => forms.first().map(String::as_str),
        }
    }
}

/// Translations and plural rule for one locale.
#[derive(Debug, Default)]
pub struct LocaleData {
    texts: FxHashMap<String, TranslationEntry>,
    plural_rule: Option<PluralRule>,
}

impl LocaleData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plural_rule(mut self, rule: PluralRule) -> Self {
        self.plural_rule = Some(rule);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.texts
            .insert(key.into(), TranslationEntry::Single(value.into()));
    }

    pub fn insert_plural<I, S>(&mut self, key: impl Into<String>, forms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts.insert(
            key.into(),
            TranslationEntry::Plural(forms.into_iter().map(Into::into).collect()),
        );
    }

    pub fn get(&self, key: &str) -> Option<&TranslationEntry> {
        self.texts.get(key)
    }

    pub fn plural_rule(&self) -> Option<&PluralRule> {
        self.plural_rule.as_ref()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.texts.keys().map(String::as_str)
    }

    /// Build locale data from a parsed locale document, dropping anything
    /// malformed. Never fails; problems are logged against `locale`.
    pub fn from_document(locale: &str, doc: Value) -> Self {
        let mut root = match doc {
            Value::Mapping(root) => root,
            other => {
                warn!(
                    locale = %locale,
                    kind = value_kind(&other),
                    "locale document is not a mapping; using empty data"
                );
                return Self::new();
            }
        };

        let plural_rule = match root.remove(PLURAL_FORM_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(header)) => match PluralRule::parse(&header) {
                Ok(rule) => Some(rule),
                Err(err) => {
                    warn!(locale = %locale, header = %header, error = %err, "discarding invalid plural form");
                    None
                }
            },
            Some(other) => {
                warn!(
                    locale = %locale,
                    kind = value_kind(&other),
                    "discarding plural form that is not a string"
                );
                None
            }
        };

        let texts = match root.remove(TEXTS_FIELD) {
            None | Some(Value::Null) => FxHashMap::default(),
            Some(Value::Mapping(raw)) => sanitize_texts(locale, raw),
            Some(other) => {
                warn!(
                    locale = %locale,
                    kind = value_kind(&other),
                    "`texts` is not a mapping; using empty texts"
                );
                FxHashMap::default()
            }
        };

        Self { texts, plural_rule }
    }
}

fn sanitize_texts(locale: &str, raw: Mapping) -> FxHashMap<String, TranslationEntry> {
    let mut out = FxHashMap::with_capacity_and_hasher(raw.len(), Default::default());
    for (k, v) in raw {
        let Some(key) = scalar_to_string(&k) else {
            warn!(locale = %locale, kind = value_kind(&k), "skipping non-scalar translation key");
            continue;
        };
        match to_entry(v) {
            Some(entry) => {
                out.insert(key, entry);
            }
            None => {
                warn!(locale = %locale, key = %key, "skipping malformed translation entry");
            }
        }
    }
    out
}

fn to_entry(value: Value) -> Option<TranslationEntry> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Option<Vec<_>>>()
            .map(TranslationEntry::Plural),
        other => scalar_to_string(&other).map(TranslationEntry::Single),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
