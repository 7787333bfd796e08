//! Language types: validated codes, text direction and registry entries.
//!
//! A `LanguageCode` can only be obtained from a built registry, so holding one
//! means the code is supported. Entries are described by static
//! `LanguageSpec` rows and frozen into `LanguageEntry` values by the builder.

use crate::i18n::country::flag_emoji;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A supported language code (e.g., "en", "sk", "nso").
///
/// Codes are lower-case ASCII letters, 2 to 3 characters long. The only way to
/// get one outside this crate is through `LanguageRegistry` lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LanguageCode(&'static str);

impl LanguageCode {
    pub(crate) fn new(code: &'static str) -> Self {
        Self(code)
    }

    /// Get the code as a static string.
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Check whether a raw string has the shape of a language code.
    pub(crate) fn is_well_formed(code: &str) -> bool {
        (2..=3).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_lowercase())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Script direction used for page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl fmt::Display for TextDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a language, as written in the catalog tables.
#[derive(Debug, Clone, Copy)]
pub struct LanguageSpec {
    /// Canonical code (e.g., "en")
    pub code: &'static str,

    /// English name (e.g., "Slovak")
    pub name: &'static str,

    /// Name in the language itself (e.g., "Slovenčina")
    pub native_name: Option<&'static str>,

    /// Locale tags that resolve to this language, besides the code itself
    pub variants: &'static [&'static str],

    /// Whether the language is written right-to-left
    pub rtl: bool,

    /// Country whose flag represents the language in pickers
    pub flag_country: Option<&'static str>,
}

/// A frozen registry entry.
#[derive(Debug, Clone)]
pub struct LanguageEntry {
    pub(crate) code: LanguageCode,
    pub(crate) name: &'static str,
    pub(crate) native_name: Option<&'static str>,
    pub(crate) variants: BTreeSet<String>,
    pub(crate) rtl: bool,
    pub(crate) flag_country: Option<&'static str>,
}

impl LanguageEntry {
    pub fn code(&self) -> LanguageCode {
        self.code
    }

    /// English display name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name in the language's own script, when known.
    pub fn native_name(&self) -> Option<&'static str> {
        self.native_name
    }

    /// Lower-case variant tags, always including the code itself.
    pub fn variants(&self) -> &BTreeSet<String> {
        &self.variants
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    pub fn direction(&self) -> TextDirection {
        if self.rtl {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }

    /// Country code used to pick a flag for this language.
    pub fn flag_country(&self) -> Option<&'static str> {
        self.flag_country
    }

    /// Flag emoji built from `flag_country` regional indicators.
    pub fn flag(&self) -> Option<String> {
        self.flag_country.and_then(flag_emoji)
    }
}

/// Serializable view of an entry for UI presentation.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageSummary {
    pub code: LanguageCode,
    pub name: &'static str,
    pub native_name: Option<&'static str>,
    pub direction: TextDirection,
    pub flag: Option<String>,
}

impl From<&LanguageEntry> for LanguageSummary {
    fn from(entry: &LanguageEntry) -> Self {
        Self {
            code: entry.code(),
            name: entry.name(),
            native_name: entry.native_name(),
            direction: entry.direction(),
            flag: entry.flag(),
        }
    }
}
