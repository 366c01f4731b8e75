//! Parlance configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::replace::DEFAULT_REPLACE_TEMPLATE;

pub const CONFIG_FILE_NAME: &str = "parlance.toml";

/// Service configuration (parlance.toml)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IntlConfig {
    /// Locale used when no current locale is set
    pub default_locale: String,
    /// Locales `set_locale` accepts without `ignore_available`
    #[serde(default)]
    pub available_locales: Vec<String>,
    /// Directory holding `<locale>.yaml|yml|toml|json` files
    #[serde(default = "default_locale_dir")]
    pub locale_dir: PathBuf,
    /// Placeholder regex template; `key` stands for the placeholder name
    #[serde(default = "default_replace_template")]
    pub replace_template: String,
}

fn default_locale_dir() -> PathBuf {
    PathBuf::from("locales")
}

fn default_replace_template() -> String {
    DEFAULT_REPLACE_TEMPLATE.to_string()
}

impl IntlConfig {
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            available_locales: Vec::new(),
            locale_dir: default_locale_dir(),
            replace_template: default_replace_template(),
        }
    }

    /// Load configuration from a file, or from `parlance.toml` inside a directory.
    ///
    /// A relative `locale_dir` is resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE_NAME)
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        if config.locale_dir.is_relative() {
            if let Some(base) = config_path.parent() {
                config.locale_dir = base.join(&config.locale_dir);
            }
        }

        Ok(config)
    }

    pub fn from_toml(src: &str) -> Result<Self> {
        let config: IntlConfig = toml::from_str(src)?;
        if config.default_locale.trim().is_empty() {
            anyhow::bail!("`default_locale` must not be empty");
        }
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = IntlConfig::from_toml("default_locale = \"de_DE\"\n").unwrap();
        assert_eq!(config, IntlConfig::new("de_DE"));
        assert_eq!(config.replace_template, r"\$\{key\}");
    }

    #[test]
    fn full_config() {
        let src = r#"
default_locale = "de_DE"
available_locales = ["de_DE", "en_US"]
locale_dir = "/srv/locales"
replace_template = "%key%"
"#;
        let config = IntlConfig::from_toml(src).unwrap();
        assert_eq!(config.available_locales, vec!["de_DE", "en_US"]);
        assert_eq!(config.locale_dir, PathBuf::from("/srv/locales"));
        assert_eq!(config.replace_template, "%key%");
    }

    #[test]
    fn rejects_missing_or_empty_default_locale() {
        assert!(IntlConfig::from_toml("available_locales = []\n").is_err());
        assert!(IntlConfig::from_toml("default_locale = \"\"\n").is_err());
    }

    #[test]
    fn roundtrips_through_toml() {
        let mut config = IntlConfig::new("fr");
        config.available_locales = vec!["fr".into(), "en".into()];
        let back = IntlConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
