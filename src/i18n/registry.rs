//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is assembled with `LanguageRegistryBuilder`, validated once,
//! and then frozen. A frozen `LanguageRegistry` has no mutation methods, so it
//! can be shared across request handlers without locks. The standard catalog
//! is also available as a process-wide singleton through `OnceLock`.

use crate::i18n::catalog;
use crate::i18n::country::CountryLanguageMap;
use crate::i18n::language::{LanguageCode, LanguageEntry, LanguageSpec, TextDirection};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised while building a registry. All of them are fatal at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("language registry is empty")]
    Empty,

    #[error("invalid language code '{0}': expected 2-3 lower-case letters")]
    InvalidCode(String),

    #[error("language '{0}' is registered more than once")]
    DuplicateCode(String),

    #[error("variant '{variant}' is claimed by both '{first}' and '{second}'")]
    DuplicateVariant {
        variant: String,
        first: String,
        second: String,
    },

    #[error("default language '{0}' is not registered")]
    MissingDefault(String),

    #[error("invalid country code '{0}': expected two upper-case letters")]
    InvalidCountry(String),

    #[error("country '{0}' is mapped more than once")]
    DuplicateCountry(String),

    #[error("country '{country}' maps to unregistered language '{code}'")]
    UnknownCountryTarget { country: String, code: String },
}

/// Collects language and country rows before validation.
#[derive(Debug, Clone)]
pub struct LanguageRegistryBuilder {
    languages: Vec<LanguageSpec>,
    countries: Vec<(&'static str, &'static str)>,
    default_code: String,
}

impl LanguageRegistryBuilder {
    /// Create an empty builder with "en" as the default language.
    pub fn new() -> Self {
        Self {
            languages: Vec::new(),
            countries: Vec::new(),
            default_code: "en".to_string(),
        }
    }

    /// Register a language. Insertion order is kept and drives prefix matching.
    pub fn language(mut self, spec: LanguageSpec) -> Self {
        self.languages.push(spec);
        self
    }

    pub fn languages(mut self, specs: impl IntoIterator<Item = LanguageSpec>) -> Self {
        self.languages.extend(specs);
        self
    }

    /// Map an upper-case ISO-3166 country code to a language code.
    pub fn country(mut self, country: &'static str, code: &'static str) -> Self {
        self.countries.push((country, code));
        self
    }

    pub fn countries(
        mut self,
        rows: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Self {
        self.countries.extend(rows);
        self
    }

    /// Set the fallback language returned when nothing else matches.
    pub fn default_code(mut self, code: impl Into<String>) -> Self {
        self.default_code = code.into();
        self
    }

    /// Validate every invariant and freeze the registry.
    pub fn build(self) -> Result<LanguageRegistry, RegistryError> {
        if self.languages.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut entries: Vec<LanguageEntry> = Vec::with_capacity(self.languages.len());
        let mut by_code: HashMap<&'static str, usize> = HashMap::new();
        let mut by_variant: HashMap<String, usize> = HashMap::new();

        for spec in &self.languages {
            if !LanguageCode::is_well_formed(spec.code) {
                return Err(RegistryError::InvalidCode(spec.code.to_string()));
            }
            if by_code.contains_key(spec.code) {
                return Err(RegistryError::DuplicateCode(spec.code.to_string()));
            }

            let index = entries.len();
            let mut variants = BTreeSet::new();
            variants.insert(spec.code.to_string());
            variants.extend(spec.variants.iter().map(|v| v.trim().to_lowercase()));

            for variant in &variants {
                if let Some(&owner) = by_variant.get(variant) {
                    return Err(RegistryError::DuplicateVariant {
                        variant: variant.clone(),
                        first: entries[owner].code.to_string(),
                        second: spec.code.to_string(),
                    });
                }
                by_variant.insert(variant.clone(), index);
            }

            by_code.insert(spec.code, index);
            entries.push(LanguageEntry {
                code: LanguageCode::new(spec.code),
                name: spec.name,
                native_name: spec.native_name,
                variants,
                rtl: spec.rtl,
                flag_country: spec.flag_country,
            });
        }

        let default_code = by_code
            .get(self.default_code.as_str())
            .map(|&index| entries[index].code)
            .ok_or_else(|| RegistryError::MissingDefault(self.default_code.clone()))?;

        let mut map = BTreeMap::new();
        for (country, code) in &self.countries {
            if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_uppercase()) {
                return Err(RegistryError::InvalidCountry(country.to_string()));
            }
            let target = by_code.get(code).map(|&index| entries[index].code).ok_or_else(|| {
                RegistryError::UnknownCountryTarget {
                    country: country.to_string(),
                    code: code.to_string(),
                }
            })?;
            if map.insert(*country, target).is_some() {
                return Err(RegistryError::DuplicateCountry(country.to_string()));
            }
        }

        Ok(LanguageRegistry {
            entries,
            by_code,
            by_variant,
            countries: CountryLanguageMap { map },
            default_code,
        })
    }
}

impl Default for LanguageRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Frozen, read-only catalog of supported languages.
#[derive(Debug)]
pub struct LanguageRegistry {
    entries: Vec<LanguageEntry>,
    by_code: HashMap<&'static str, usize>,
    by_variant: HashMap<String, usize>,
    countries: CountryLanguageMap,
    default_code: LanguageCode,
}

/// Standard catalog instance (built lazily, "en" default)
static STANDARD: OnceLock<Result<LanguageRegistry, RegistryError>> = OnceLock::new();

impl LanguageRegistry {
    pub fn builder() -> LanguageRegistryBuilder {
        LanguageRegistryBuilder::new()
    }

    /// Get the process-wide registry built from the standard catalog.
    ///
    /// The catalog is validated on first call; later calls return the same
    /// instance (or the same error).
    pub fn standard() -> Result<&'static LanguageRegistry, RegistryError> {
        STANDARD
            .get_or_init(|| catalog::standard_builder().build())
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Build a fresh registry from the standard catalog with another default.
    pub fn standard_with_default(code: &str) -> Result<LanguageRegistry, RegistryError> {
        catalog::standard_builder().default_code(code).build()
    }

    /// Exact match against entry codes (variants are not considered).
    pub fn is_supported(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Get the registered code for an exact code string.
    pub fn code(&self, code: &str) -> Option<LanguageCode> {
        self.by_code.get(code).map(|&index| self.entries[index].code)
    }

    /// Resolve a locale tag through the variant sets (case-insensitive, exact).
    pub fn resolve_variant(&self, tag: &str) -> Option<LanguageCode> {
        let tag = tag.trim().to_lowercase();
        self.by_variant
            .get(&tag)
            .map(|&index| self.entries[index].code)
    }

    /// Fallback resolution on the primary subtag.
    ///
    /// Drops everything from the first `-`, then returns the first entry (in
    /// insertion order) whose code or any variant starts with that prefix. This
    /// is first-match, not best-match: with a short prefix, an earlier entry
    /// can win over a closer one.
    pub fn resolve_variant_prefix(&self, tag: &str) -> Option<LanguageCode> {
        let tag = tag.trim().to_lowercase();
        let prefix = tag.split('-').next().unwrap_or_default();
        if prefix.is_empty() {
            return None;
        }

        self.entries
            .iter()
            .find(|entry| {
                entry.code.as_str().starts_with(prefix)
                    || entry.variants.iter().any(|v| v.starts_with(prefix))
            })
            .map(|entry| entry.code)
    }

    pub fn entry_for(&self, code: &str) -> Option<&LanguageEntry> {
        self.by_code.get(code).map(|&index| &self.entries[index])
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    /// All codes in insertion order.
    pub fn all_codes(&self) -> impl Iterator<Item = LanguageCode> + '_ {
        self.entries.iter().map(|entry| entry.code)
    }

    pub fn is_rtl(&self, code: &str) -> bool {
        self.entry_for(code).map(|e| e.is_rtl()).unwrap_or(false)
    }

    /// Layout direction for a code; unknown codes are left-to-right.
    pub fn direction(&self, code: &str) -> TextDirection {
        self.entry_for(code)
            .map(|e| e.direction())
            .unwrap_or(TextDirection::Ltr)
    }

    pub fn default_code(&self) -> LanguageCode {
        self.default_code
    }

    pub fn default_entry(&self) -> &LanguageEntry {
        &self.entries[self.by_code[self.default_code.as_str()]]
    }

    pub fn countries(&self) -> &CountryLanguageMap {
        &self.countries
    }

    pub fn language_for_country(&self, country: &str) -> Option<LanguageCode> {
        self.countries.language_for(country)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a built registry; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
