use std::fmt;

/// Locale used when a request carries none.
pub const DEFAULT_LOCALE: &str = "en-US";

/// A parsed locale such as `en-US` or `de_DE.UTF-8`.
///
/// The language subtag is stored lowercase and the region uppercase, so
/// `en_us` and `en-US` compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub language: String,
    pub region: Option<String>,
    pub encoding: Option<String>,
}

impl Locale {
    /// Parses a locale string.
    ///
    /// Splits off an encoding after `.`, then splits language and region
    /// on `-` or `_`. Returns `None` for empty input or an empty language.
    ///
    /// ```
    /// use bco_skill::i18n::Locale;
    ///
    /// let locale = Locale::parse("de_DE.UTF-8").unwrap();
    /// assert_eq!(locale.language, "de");
    /// assert_eq!(locale.region.as_deref(), Some("DE"));
    /// assert_eq!(locale.encoding.as_deref(), Some("UTF-8"));
    /// assert_eq!(locale.tag(), "de-DE");
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let (base, encoding) = match value.split_once('.') {
            Some((base, encoding)) if !encoding.is_empty() => (base, Some(encoding.to_string())),
            Some((base, _)) => (base, None),
            None => (value, None),
        };

        let mut parts = base.splitn(2, ['-', '_']);
        let language = parts.next().unwrap_or("").to_ascii_lowercase();
        if language.is_empty() {
            return None;
        }
        let region = parts
            .next()
            .filter(|r| !r.is_empty())
            .map(|r| r.to_ascii_uppercase());

        Some(Self {
            language,
            region,
            encoding,
        })
    }

    /// Effective locale for a request: the request's own locale when it
    /// parses, otherwise `default`.
    pub fn from_request(requested: Option<&str>, default: &Locale) -> Self {
        requested
            .and_then(Self::parse)
            .unwrap_or_else(|| default.clone())
    }

    /// `language-REGION` (or just `language` without a region).
    pub fn tag(&self) -> String {
        match &self.region {
            Some(region) => format!("{}-{}", self.language, region),
            None => self.language.clone(),
        }
    }

    /// Whether a language tag attached to a backend label names this
    /// locale. Language and region must both be equal; `en` does not match
    /// `en-US` in either direction. Encodings are ignored.
    pub fn matches_tag(&self, tag: &str) -> bool {
        Self::parse(tag)
            .is_some_and(|other| other.language == self.language && other.region == self.region)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            region: Some("US".to_string()),
            encoding: None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
