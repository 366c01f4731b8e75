use crate::data::TranslationEntry;
use crate::plural::resolve_index;
use crate::source::LocaleSource;
use crate::store::LocaleDataStore;

/// Text translation backend.
///
/// Implementations never fail: an untranslated text comes back unchanged.
pub trait Translator: Send + Sync {
    /// Translate `text` into `locale`.
    fn translate(&self, text: &str, locale: &str) -> String;

    /// Translate a text whose form depends on `count`. `singular` is the
    /// lookup key; `plural` is only used as a fallback.
    fn translate_plurals(&self, singular: &str, plural: &str, count: i64, locale: &str) -> String;
}

/// Translator over a [`LocaleDataStore`].
pub struct TranslationEngine {
    store: LocaleDataStore,
}

impl TranslationEngine {
    pub fn new(store: LocaleDataStore) -> Self {
        Self { store }
    }

    pub fn from_source(source: impl LocaleSource + 'static) -> Self {
        Self::new(LocaleDataStore::new(source))
    }

    pub fn store(&self) -> &LocaleDataStore {
        &self.store
    }

    /// Plural-form index `count` selects in `locale`.
    pub fn plural_index(&self, count: i64, locale: &str) -> usize {
        resolve_index(self.store.get(locale).plural_rule(), count)
    }
}

impl Translator for TranslationEngine {
    fn translate(&self, text: &str, locale: &str) -> String {
        let data = self.store.get(locale);
        data.get(text)
            .and_then(TranslationEntry::first)
            .unwrap_or(text)
            .to_string()
    }

    fn translate_plurals(&self, singular: &str, plural: &str, count: i64, locale: &str) -> String {
        let data = self.store.get(locale);
        let idx = resolve_index(data.plural_rule(), count);

        let found = match data.get(singular) {
            // A plain string overrides plural selection.
            Some(TranslationEntry::Single(s)) => Some(s.as_str()),
            Some(TranslationEntry::Plural(forms)) => forms.get(idx).map(String::as_str),
            None => None,
        };

        match found {
            Some(s) => s.to_string(),
            None if idx > 0 => plural.to_string(),
            None => singular.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LocaleData;
    use crate::plural::{PluralRule, PluralSelection};
    use crate::source::MemorySource;
    use pretty_assertions::assert_eq;

    fn sample() -> LocaleData {
        let mut data = LocaleData::new();
        data.insert("someKey", "some translation");
        data.insert_plural(
            "someKeyWithPlural",
            ["singular translation", "plural translation"],
        );
        data
    }

    #[test]
    fn translate_uses_first_form() {
        let engine = TranslationEngine::from_source(MemorySource::new().with_locale("de_DE", sample()));
        assert_eq!(engine.translate("someKey", "de_DE"), "some translation");
        assert_eq!(
            engine.translate("someKeyWithPlural", "de_DE"),
            "singular translation"
        );
        assert_eq!(engine.translate("missing", "de_DE"), "missing");
    }

    #[test]
    fn empty_plural_entry_falls_back() {
        let mut data = LocaleData::new();
        data.insert_plural("empty", Vec::<String>::new());
        let engine = TranslationEngine::from_source(MemorySource::new().with_locale("xx", data));
        assert_eq!(engine.translate("empty", "xx"), "empty");
        assert_eq!(engine.translate_plurals("empty", "empties", 1, "xx"), "empty");
        assert_eq!(engine.translate_plurals("empty", "empties", 2, "xx"), "empties");
    }

    #[test]
    fn single_string_overrides_plural_selection() {
        let data = sample().with_plural_rule(PluralRule::custom(|_| PluralSelection::new(3, 2)));
        let engine = TranslationEngine::from_source(MemorySource::new().with_locale("xx", data));
        for count in [-1, 0, 1, 2, 100] {
            assert_eq!(
                engine.translate_plurals("someKey", "someKeys", count, "xx"),
                "some translation"
            );
        }
    }

    #[test]
    fn short_sequence_falls_back_to_plural_text() {
        let data = sample().with_plural_rule(PluralRule::custom(|_| PluralSelection::new(3, 2)));
        let engine = TranslationEngine::from_source(MemorySource::new().with_locale("xx", data));
        assert_eq!(engine.plural_index(5, "xx"), 2);
        assert_eq!(
            engine.translate_plurals("someKeyWithPlural", "someKeyWithPlural2", 5, "xx"),
            "someKeyWithPlural2"
        );
    }

    #[test]
    fn custom_rule_selects_form() {
        let mut data = LocaleData::new();
        data.insert_plural("file", ["soubor", "soubory", "souborů"]);
        let data = data.with_plural_rule(PluralRule::custom(|n| {
            let idx = match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            };
            PluralSelection::new(3, idx)
        }));
        let engine = TranslationEngine::from_source(MemorySource::new().with_locale("cs", data));
        assert_eq!(engine.translate_plurals("file", "files", 1, "cs"), "soubor");
        assert_eq!(engine.translate_plurals("file", "files", 3, "cs"), "soubory");
        assert_eq!(engine.translate_plurals("file", "files", 7, "cs"), "souborů");
    }
}
