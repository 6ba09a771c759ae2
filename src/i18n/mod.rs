//! Translation catalogs and per-request catalog selection.
//!
//! Messages are keyed by their English template (the gettext msgid
//! convention), so the built-in English catalog needs no entries: a msgid
//! missing from every catalog is its own translation.
//!
//! Catalog selection is request-scoped. [`CatalogStore::select`] returns a
//! [`Translator`] borrowed from the read-only store; nothing process-wide is
//! swapped per request.

mod locale;

pub use locale::{Locale, DEFAULT_LOCALE};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Language whose catalog is used when no better match exists.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Message templates for one language.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    language: String,
    messages: HashMap<String, String>,
}

/// On-disk catalog layout (`<locales_dir>/<lang>.toml`).
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Empty catalog for `language`.
    pub fn new(language: &str) -> Self {
        Self {
            language: normalize_key(language),
            messages: HashMap::new(),
        }
    }

    pub fn with_messages<I, K, V>(language: &str, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            language: normalize_key(language),
            messages: messages
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parses a catalog from TOML with a `[messages]` table.
    pub fn from_toml_str(language: &str, contents: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents)
            .with_context(|| format!("Failed to parse catalog for '{}'", language))?;
        Ok(Self::with_messages(language, file.messages))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn get(&self, msgid: &str) -> Option<&str> {
        self.messages.get(msgid).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// All catalogs known to the skill, keyed by normalized language tag.
///
/// Always contains the default-language catalog.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    catalogs: HashMap<String, Catalog>,
    default_language: String,
}

impl CatalogStore {
    /// Store holding only the built-in English catalog.
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert(DEFAULT_LANGUAGE.to_string(), Catalog::new(DEFAULT_LANGUAGE));
        Self {
            catalogs,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Adds or replaces the catalog for its language.
    pub fn insert(&mut self, catalog: Catalog) {
        self.catalogs.insert(catalog.language.clone(), catalog);
    }

    /// Loads every `*.toml` file in `dir` as a catalog named after the file
    /// stem. A missing directory loads nothing.
    ///
    /// Returns the number of catalogs loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "Locales directory not found, using built-in catalog only");
            return Ok(0);
        }

        let mut loaded = 0;
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read locales directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read catalog {}", path.display()))?;
            let catalog = Catalog::from_toml_str(language, &contents)?;
            info!(language = %catalog.language(), messages = catalog.len(), "Catalog loaded");
            self.insert(catalog);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Catalog for exactly `language`, if one is installed.
    pub fn lookup(&self, language: &str) -> Option<&Catalog> {
        self.catalogs.get(&normalize_key(language))
    }

    pub fn default_catalog(&self) -> &Catalog {
        // new() always installs the default catalog and nothing removes it
        &self.catalogs[&self.default_language]
    }

    /// Picks the catalog for a request locale.
    ///
    /// Tries `language-region`, then `language`, then the default language.
    pub fn select(&self, locale: &Locale) -> Translator<'_> {
        let catalog = self
            .lookup(&locale.tag())
            .or_else(|| self.lookup(&locale.language))
            .unwrap_or_else(|| {
                debug!(locale = %locale, fallback = %self.default_language, "No catalog for locale");
                self.default_catalog()
            });
        Translator {
            catalog,
            fallback: self.default_catalog(),
        }
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.catalogs.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// The catalog selected for a single request.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    catalog: &'a Catalog,
    fallback: &'a Catalog,
}

impl<'a> Translator<'a> {
    pub fn language(&self) -> &str {
        self.catalog.language()
    }

    /// Translated template for `msgid`, falling back to the default
    /// catalog and then to `msgid` itself.
    pub fn translate(&self, msgid: &'a str) -> &'a str {
        self.catalog
            .get(msgid)
            .or_else(|| self.fallback.get(msgid))
            .unwrap_or(msgid)
    }

    /// Translates `msgid` and substitutes `{name}` placeholders.
    pub fn format(&self, msgid: &'a str, args: &[(&str, &str)]) -> String {
        format_template(self.translate(msgid), args)
    }
}

/// Replaces each `{key}` in `template` with its value. Unknown placeholders
/// are left untouched.
pub fn format_template(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in args {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

fn normalize_key(language: &str) -> String {
    language.trim().replace('_', "-").to_ascii_lowercase()
}
