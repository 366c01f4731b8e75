//! Placeholder substitution through a regex template.
//!
//! The template is a regular expression in which every occurrence of the
//! literal `key` stands for the (escaped) placeholder name. The default
//! `\$\{key\}` matches `${name}`.

use parking_lot::Mutex;
use regex::{NoExpand, Regex};
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::args::Replacements;
use crate::error::IntlError;

pub const DEFAULT_REPLACE_TEMPLATE: &str = r"\$\{key\}";

const KEY_MARKER: &str = "key";

/// Compiled placeholder regexes kept per template. Once full, the cache is
/// dropped and refilled, so arbitrary caller-supplied names cannot grow it.
const MAX_CACHED_PATTERNS: usize = 256;

#[derive(Debug)]
pub struct ReplaceTemplate {
    template: String,
    compiled: Mutex<FxHashMap<String, Regex>>,
}

impl ReplaceTemplate {
    /// Validate and build a template.
    pub fn new(template: impl Into<String>) -> Result<Self, IntlError> {
        let template = template.into();
        Regex::new(&template).map_err(|source| IntlError::InvalidReplaceTemplate {
            template: template.clone(),
            source,
        })?;
        Ok(Self {
            template,
            compiled: Mutex::new(FxHashMap::default()),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Substitute every replacement into `text`, one name at a time in
    /// insertion order. Values are inserted literally.
    pub fn apply(&self, text: String, replacements: &Replacements) -> String {
        let mut text = text;
        for (name, value) in replacements.iter() {
            let Some(re) = self.regex_for(name) else {
                continue;
            };
            let value = value.to_string();
            text = re.replace_all(&text, NoExpand(&value)).into_owned();
        }
        text
    }

    fn regex_for(&self, name: &str) -> Option<Regex> {
        let mut compiled = self.compiled.lock();
        if let Some(re) = compiled.get(name) {
            return Some(re.clone());
        }
        let pattern = self.template.replace(KEY_MARKER, &regex::escape(name));
        match Regex::new(&pattern) {
            Ok(re) => {
                if compiled.len() >= MAX_CACHED_PATTERNS {
                    compiled.clear();
                }
                compiled.insert(name.to_string(), re.clone());
                Some(re)
            }
            Err(err) => {
                warn!(template = %self.template, name = %name, error = %err, "skipping placeholder");
                None
            }
        }
    }
}

impl Default for ReplaceTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_REPLACE_TEMPLATE.to_string(),
            compiled: Mutex::new(FxHashMap::default()),
        }
    }
}

impl Clone for ReplaceTemplate {
    fn clone(&self) -> Self {
        Self {
            template: self.template.clone(),
            compiled: Mutex::new(self.compiled.lock().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_template_replaces_dollar_braces() {
        let t = ReplaceTemplate::default();
        let r = Replacements::new().with("name", "Christian");
        assert_eq!(
            t.apply("My name is ${name}".into(), &r),
            "My name is Christian"
        );
    }

    #[test]
    fn replaces_every_occurrence() {
        let t = ReplaceTemplate::default();
        let r = Replacements::new().with("n", 3);
        assert_eq!(t.apply("${n} + ${n}".into(), &r), "3 + 3");
    }

    #[test]
    fn names_are_escaped() {
        let t = ReplaceTemplate::default();
        let r = Replacements::new().with("a.b", "x");
        assert_eq!(t.apply("${a.b} ${aXb}".into(), &r), "x ${aXb}");
    }

    #[test]
    fn values_are_literal() {
        let t = ReplaceTemplate::default();
        let r = Replacements::new().with("price", "$1.00");
        assert_eq!(t.apply("costs ${price}".into(), &r), "costs $1.00");
    }

    #[test]
    fn custom_template() {
        let t = ReplaceTemplate::new(r"%key%").unwrap();
        let r = Replacements::new().with("user", "ana");
        assert_eq!(t.apply("hi %user%, ${user}".into(), &r), "hi ana, ${user}");
    }

    #[test]
    fn sequential_application() {
        let t = ReplaceTemplate::default();
        let r = Replacements::new().with("a", "${b}").with("b", "B");
        assert_eq!(t.apply("${a}".into(), &r), "B");
    }

    #[test]
    fn pattern_cache_is_bounded() {
        let t = ReplaceTemplate::default();
        for i in 0..(MAX_CACHED_PATTERNS * 3) {
            let name = format!("p{i}");
            let r = Replacements::new().with(name.clone(), i);
            assert_eq!(t.apply(format!("${{{name}}}"), &r), i.to_string());
            assert!(t.compiled.lock().len() <= MAX_CACHED_PATTERNS);
        }
    }

    #[test]
    fn invalid_template_is_rejected() {
        let err = ReplaceTemplate::new("(key").unwrap_err();
        assert!(matches!(err, IntlError::InvalidReplaceTemplate { .. }));
    }
}
