use std::fmt::{self, Display};
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use parlance_core::{DirSource, TranslationEngine, Translator};
use tracing::debug;

use crate::args::Replacements;
use crate::config::IntlConfig;
use crate::date::{format_date_time, DateTimeFormat};
use crate::error::IntlError;
use crate::replace::ReplaceTemplate;

/// End-user i18n API: locale selection, translation, placeholder
/// substitution and date formatting.
///
/// Works without a translator; texts then pass through untranslated and only
/// placeholders are substituted.
pub struct IntlService {
    default_locale: String,
    available_locales: Vec<String>,
    current_locale: Option<String>,
    replace: ReplaceTemplate,
    translator: Option<Arc<dyn Translator>>,
}

impl IntlService {
    pub fn new(default_locale: impl Into<String>, available_locales: Vec<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            available_locales,
            current_locale: None,
            replace: ReplaceTemplate::default(),
            translator: None,
        }
    }

    /// Build a service with a [`TranslationEngine`] over `config.locale_dir`.
    pub fn from_config(config: &IntlConfig) -> Result<Self, IntlError> {
        let mut service = Self::new(
            config.default_locale.clone(),
            config.available_locales.clone(),
        );
        service.set_replace_template(config.replace_template.clone())?;
        service.set_translator(Arc::new(TranslationEngine::from_source(DirSource::new(
            &config.locale_dir,
        ))));
        debug!(
            default_locale = %config.default_locale,
            locale_dir = %config.locale_dir.display(),
            "i18n service configured"
        );
        Ok(service)
    }

    pub fn set_default_locale(&mut self, locale: impl Into<String>) {
        self.default_locale = locale.into();
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn set_available_locales(&mut self, locales: Vec<String>) {
        self.available_locales = locales;
    }

    pub fn available_locales(&self) -> &[String] {
        &self.available_locales
    }

    /// Select the current locale.
    ///
    /// A locale outside the available list clears the current locale (so
    /// [`locale`](Self::locale) reports the default) unless `ignore_available`
    /// is set.
    pub fn set_locale(&mut self, locale: impl Into<String>, ignore_available: bool) {
        let locale = locale.into();
        if ignore_available || self.available_locales.contains(&locale) {
            debug!(locale = %locale, "current locale set");
            self.current_locale = Some(locale);
        } else {
            debug!(locale = %locale, "locale not available; falling back to default");
            self.current_locale = None;
        }
    }

    /// Current locale, or the default locale if none is set.
    pub fn locale(&self) -> &str {
        self.current_locale
            .as_deref()
            .unwrap_or(&self.default_locale)
    }

    pub fn set_replace_template(&mut self, template: impl Into<String>) -> Result<(), IntlError> {
        self.replace = ReplaceTemplate::new(template)?;
        Ok(())
    }

    pub fn replace_template(&self) -> &str {
        self.replace.as_str()
    }

    pub fn set_translator(&mut self, translator: Arc<dyn Translator>) {
        self.translator = Some(translator);
    }

    pub fn translator(&self) -> Option<&Arc<dyn Translator>> {
        self.translator.as_ref()
    }

    pub fn clear_translator(&mut self) {
        self.translator = None;
    }

    /// Translate `text` and substitute placeholders.
    ///
    /// `locale` defaults to [`locale`](Self::locale) when `None` or empty.
    pub fn tr(
        &self,
        text: &str,
        replacements: Option<&Replacements>,
        locale: Option<&str>,
    ) -> String {
        let locale = self.pick_locale(locale);
        let text = match &self.translator {
            Some(t) => t.translate(text, locale),
            None => text.to_string(),
        };
        self.substitute(text, replacements)
    }

    /// Translate a count-dependent text and substitute placeholders.
    pub fn tr_n(
        &self,
        singular: &str,
        plural: &str,
        count: i64,
        replacements: Option<&Replacements>,
        locale: Option<&str>,
    ) -> String {
        let locale = self.pick_locale(locale);
        let text = match &self.translator {
            Some(t) => t.translate_plurals(singular, plural, count, locale),
            None if count == 1 => singular.to_string(),
            None => plural.to_string(),
        };
        self.substitute(text, replacements)
    }

    /// Format `datetime` for the active locale.
    pub fn format_date_time<Tz>(
        &self,
        datetime: &DateTime<Tz>,
        format: &DateTimeFormat,
    ) -> Result<String, IntlError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        format_date_time(datetime, format, self.locale())
    }

    fn pick_locale<'a>(&'a self, locale: Option<&'a str>) -> &'a str {
        match locale {
            Some(l) if !l.is_empty() => l,
            _ => self.locale(),
        }
    }

    fn substitute(&self, text: String, replacements: Option<&Replacements>) -> String {
        match replacements {
            Some(r) if !r.is_empty() => self.replace.apply(text, r),
            _ => text,
        }
    }
}

impl fmt::Debug for IntlService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntlService")
            .field("default_locale", &self.default_locale)
            .field("available_locales", &self.available_locales)
            .field("current_locale", &self.current_locale)
            .field("replace_template", &self.replace.as_str())
            .field("translator", &self.translator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_locale() {
        let mut intl = IntlService::new("de_DE", Vec::new());
        assert_eq!(intl.default_locale(), "de_DE");
        intl.set_default_locale("en");
        assert_eq!(intl.default_locale(), "en");
    }

    #[test]
    fn available_locales() {
        let mut intl = IntlService::new("de", vec!["de_DE".into(), "en_US".into()]);
        assert_eq!(intl.available_locales(), ["de_DE", "en_US"]);
        intl.set_available_locales(vec!["de".into(), "en".into()]);
        assert_eq!(intl.available_locales(), ["de", "en"]);
    }

    #[test]
    fn locale_selection() {
        let mut intl = IntlService::new("de", vec!["de_DE".into(), "en_US".into()]);
        assert_eq!(intl.locale(), "de");

        intl.set_locale("en", false);
        assert_eq!(intl.locale(), "de");

        intl.set_locale("de_DE", false);
        assert_eq!(intl.locale(), "de_DE");

        intl.set_locale("en", true);
        assert_eq!(intl.locale(), "en");

        intl.set_locale("fr", false);
        assert_eq!(intl.locale(), "de");
    }

    #[test]
    fn replace_template() {
        let mut intl = IntlService::new("de", Vec::new());
        assert_eq!(intl.replace_template(), r"\$\{key\}");
        intl.set_replace_template("\\$key").unwrap();
        assert_eq!(intl.replace_template(), "\\$key");
        assert!(intl.set_replace_template("[key").is_err());
        assert_eq!(intl.replace_template(), "\\$key");
    }

    #[test]
    fn without_translator() {
        let intl = IntlService::new("de_DE", Vec::new());
        assert_eq!(intl.tr("This is a test", None, None), "This is a test");

        let r = Replacements::new().with("name", "Christian");
        assert_eq!(
            intl.tr("My name is ${name}", Some(&r), Some("en_US")),
            "My name is Christian"
        );

        assert_eq!(intl.tr_n("one", "more", 1, None, None), "one");
        assert_eq!(intl.tr_n("one", "more", 3, None, None), "more");
        assert_eq!(intl.tr_n("one", "more", 0, None, None), "more");
    }
}
