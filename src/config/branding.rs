//! Branding and locale configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Application name and visual identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    pub app_name: String,
    pub favicon: String,
    pub brand_color: String,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            app_name: "Indicadores".into(),
            favicon: "/static/assets/favicon.ico".into(),
            brand_color: "#FF5733".into(),
        }
    }
}

/// Interface languages and number formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub default_locale: String,
    /// Supported locales keyed by language code.
    pub languages: BTreeMap<String, Language>,
    pub number_format: NumberFormat,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        let mut languages = BTreeMap::new();
        languages.insert("es".to_string(), Language::new("es", "Español"));
        languages.insert("en".to_string(), Language::new("us", "English"));

        Self {
            default_locale: "es".into(),
            languages,
            number_format: NumberFormat::default(),
        }
    }
}

impl LocaleConfig {
    pub fn supports(&self, locale: &str) -> bool {
        self.languages.contains_key(locale)
    }
}

/// One supported interface language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Country flag icon code.
    pub flag: String,
    /// Display name in the language itself.
    pub name: String,
}

impl Language {
    pub fn new(flag: &str, name: &str) -> Self {
        Self {
            flag: flag.into(),
            name: name.into(),
        }
    }
}

/// Numeric formatting rules handed to the chart renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub decimal: String,
    pub thousands: String,
    /// Currency prefix and suffix.
    pub currency: [String; 2],
    /// Digit group sizes, innermost first.
    pub grouping: Vec<u8>,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal: ",".into(),
            thousands: ".".into(),
            currency: ["$".into(), String::new()],
            grouping: vec![3],
        }
    }
}
