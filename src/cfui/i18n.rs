//! Locale lookup and template substitution.
//!
//! Catalogs are embedded at build time, one JSON file per locale, in the shape
//! `[{"id": "<english template>", "translation": "<localized template>"}]`. The id is the
//! English template itself, so a missing entry simply renders the English text.

use minijinja::Environment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Locales with an embedded catalog, besides the implicit `en-US`.
pub const SUPPORTED_LOCALES: &[&str] = &["en-US", "es-ES", "fr-FR"];

const ES_ES: &str = include_str!("locales/es-ES.json");
const FR_FR: &str = include_str!("locales/fr-FR.json");

#[derive(Deserialize)]
struct Entry {
    id: String,
    translation: String,
}

/// Translates message templates for one locale.
#[derive(Clone)]
pub struct Translator {
    locale: String,
    catalog: HashMap<String, String>,
    env: Environment<'static>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::for_locale(None)
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("locale", &self.locale)
            .field("entries", &self.catalog.len())
            .finish()
    }
}

impl Translator {
    /// Builds a translator for a raw locale such as `fr_FR.UTF-8`, `fr-fr` or `fr-FR`.
    /// Unknown or missing locales fall back to English.
    pub fn for_locale(raw: Option<&str>) -> Self {
        let locale = raw
            .and_then(normalize_locale)
            .filter(|l| SUPPORTED_LOCALES.contains(&l.as_str()))
            .unwrap_or_else(|| "en-US".to_string());

        let source = match locale.as_str() {
            "es-ES" => Some(ES_ES),
            "fr-FR" => Some(FR_FR),
            _ => None,
        };
        let catalog = source
            .and_then(|json| serde_json::from_str::<Vec<Entry>>(json).ok())
            .map(|entries| {
                entries
                    .into_iter()
                    .map(|entry| (entry.id, entry.translation))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            locale,
            catalog,
            env: Environment::new(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Returns the localized template for `id`, or `id` itself.
    pub fn lookup<'a>(&'a self, id: &'a str) -> &'a str {
        self.catalog.get(id).map(String::as_str).unwrap_or(id)
    }

    /// Looks up `template` and substitutes `data` into it.
    pub fn translate<T: Serialize + ?Sized>(&self, template: &str, data: &T) -> String {
        let localized = self.lookup(template);
        self.env
            .render_str(localized, data)
            .unwrap_or_else(|_| localized.to_string())
    }

    /// Translates a template without placeholders.
    pub fn translate_text(&self, template: &str) -> String {
        self.translate(template, &())
    }
}

/// Canonicalizes `fr_FR.UTF-8` / `fr-fr` / `FR_fr` into `fr-FR`. Returns `None` for
/// empty input and the POSIX `C` locale.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next().unwrap_or_default().trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    let mut parts = base.split(['_', '-']);
    let language = parts.next()?.to_ascii_lowercase();
    match parts.next() {
        Some(region) if !region.is_empty() => {
            Some(format!("{}-{}", language, region.to_ascii_uppercase()))
        }
        _ => Some(language),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("fr_FR.UTF-8").as_deref(), Some("fr-FR"));
        assert_eq!(normalize_locale("es-es").as_deref(), Some("es-ES"));
        assert_eq!(normalize_locale("de").as_deref(), Some("de"));
        assert_eq!(normalize_locale("C"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn test_unknown_locale_falls_back_to_english() {
        let translator = Translator::for_locale(Some("xx_YY.UTF-8"));
        assert_eq!(translator.locale(), "en-US");
        assert_eq!(translator.translate_text("OK"), "OK");
    }

    #[test]
    fn test_substitutes_placeholders() {
        let translator = Translator::default();
        let out = translator.translate(
            "App '{{ app_name }}' not found.",
            &json!({ "app_name": "dora" }),
        );
        assert_eq!(out, "App 'dora' not found.");
    }

    #[test]
    fn test_french_catalog_is_used() {
        let translator = Translator::for_locale(Some("fr_FR.UTF-8"));
        assert_eq!(translator.locale(), "fr-FR");
        assert_eq!(translator.translate_text("FAILED"), "ÉCHEC");
        assert_eq!(
            translator.translate(
                "App '{{ app_name }}' not found.",
                &json!({ "app_name": "dora" })
            ),
            "App 'dora' introuvable."
        );
    }

    #[test]
    fn test_missing_entry_uses_english_template() {
        let translator = Translator::for_locale(Some("es-ES"));
        assert_eq!(
            translator.translate_text("a message nobody translated"),
            "a message nobody translated"
        );
    }

    #[test]
    fn test_broken_template_is_returned_verbatim() {
        let translator = Translator::default();
        assert_eq!(
            translator.translate("{{ unclosed", &json!({})),
            "{{ unclosed"
        );
    }
}
