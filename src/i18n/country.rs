//! Country signals: ISO-3166 codes, the country → language map and flags.

use crate::i18n::LanguageCode;
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder values CDNs send when the country is unknown or anonymized.
const UNKNOWN_COUNTRIES: &[&str] = &["XX", "T1"];

/// An upper-case ISO-3166 alpha-2 country code taken from a request signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a raw header value. Returns `None` for anything that is not two
    /// ASCII letters, and for the "unknown country" placeholders.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.len() != 2 || !raw.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }

        let code = raw.to_ascii_uppercase();
        if UNKNOWN_COUNTRIES.contains(&code.as_str()) {
            return None;
        }
        Some(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Frozen mapping from country to language, used as the geolocation fallback.
///
/// Built by `LanguageRegistryBuilder`, which checks that every target language
/// is registered.
#[derive(Debug, Clone, Default)]
pub struct CountryLanguageMap {
    pub(crate) map: BTreeMap<&'static str, LanguageCode>,
}

impl CountryLanguageMap {
    /// Look up the language for a country. Case-insensitive.
    pub fn language_for(&self, country: &str) -> Option<LanguageCode> {
        let country = country.trim().to_ascii_uppercase();
        self.map.get(country.as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate mappings ordered by country code.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, LanguageCode)> + '_ {
        self.map.iter().map(|(country, code)| (*country, *code))
    }
}

/// Render a two-letter country code as a flag emoji (regional indicators).
pub fn flag_emoji(country: &str) -> Option<String> {
    if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    country
        .bytes()
        .map(|b| char::from_u32(0x1F1E6 + u32::from(b.to_ascii_uppercase() - b'A')))
        .collect()
}
