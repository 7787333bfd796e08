//! Language negotiation: pick one supported language for a request.
//!
//! The engine is a pure decision function over a `NegotiationRequest`. It reads
//! nothing but the request and the frozen registry; persisting the outcome is
//! the caller's job (see `crate::preference::persist`).

use crate::i18n::header::{parse_accept_language, AcceptedTag};
use crate::i18n::{LanguageCode, LanguageRegistry};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Stage of the precedence chain that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NegotiationSource {
    Explicit,
    Stored,
    Persisted,
    Negotiated,
    Geolocated,
    Default,
}

impl NegotiationSource {
    /// All sources in precedence order.
    pub const ALL: [NegotiationSource; 6] = [
        NegotiationSource::Explicit,
        NegotiationSource::Stored,
        NegotiationSource::Persisted,
        NegotiationSource::Negotiated,
        NegotiationSource::Geolocated,
        NegotiationSource::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NegotiationSource::Explicit => "explicit",
            NegotiationSource::Stored => "stored",
            NegotiationSource::Persisted => "persisted",
            NegotiationSource::Negotiated => "negotiated",
            NegotiationSource::Geolocated => "geolocated",
            NegotiationSource::Default => "default",
        }
    }

    /// Whether the language came from the user rather than being inferred
    /// from the browser, location or configuration.
    pub fn is_user_choice(&self) -> bool {
        matches!(
            self,
            NegotiationSource::Explicit | NegotiationSource::Stored | NegotiationSource::Persisted
        )
    }
}

impl fmt::Display for NegotiationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw per-request signals, assembled by the web layer.
///
/// Values are unvalidated; the engine checks each against the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegotiationRequest {
    /// Explicit override (e.g., `?lang=sk`)
    pub explicit: Option<String>,

    /// Choice remembered in the session
    pub stored: Option<String>,

    /// Choice remembered in the `language` cookie
    pub persisted: Option<String>,

    /// Raw `Accept-Language` header
    pub accept_language: Option<String>,

    /// Country signal from a proxy or CDN header
    pub country: Option<String>,
}

impl NegotiationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_explicit(mut self, code: impl Into<String>) -> Self {
        self.explicit = Some(code.into());
        self
    }

    pub fn with_stored(mut self, code: impl Into<String>) -> Self {
        self.stored = Some(code.into());
        self
    }

    pub fn with_persisted(mut self, code: impl Into<String>) -> Self {
        self.persisted = Some(code.into());
        self
    }

    pub fn with_accept_language(mut self, header: impl Into<String>) -> Self {
        self.accept_language = Some(header.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// The negotiated language and the stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NegotiationResult {
    pub code: LanguageCode,
    pub source: NegotiationSource,
}

/// A result together with the parsed header, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct NegotiationTrace {
    #[serde(flatten)]
    pub result: NegotiationResult,
    pub accept_language: Vec<AcceptedTag>,
}

/// Runs the precedence chain against a registry.
#[derive(Debug, Clone, Copy)]
pub struct NegotiationEngine<'r> {
    registry: &'r LanguageRegistry,
}

impl<'r> NegotiationEngine<'r> {
    pub fn new(registry: &'r LanguageRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r LanguageRegistry {
        self.registry
    }

    /// Pick a language: explicit, stored, persisted, negotiated, geolocated,
    /// then the registry default. The first stage that yields a supported code
    /// wins. Never fails.
    pub fn negotiate(&self, request: &NegotiationRequest) -> NegotiationResult {
        let tags = parse_accept_language(request.accept_language.as_deref());
        self.run(request, &tags)
    }

    /// Same as `negotiate`, also returning the parsed header tags.
    pub fn explain(&self, request: &NegotiationRequest) -> NegotiationTrace {
        let tags = parse_accept_language(request.accept_language.as_deref());
        let result = self.run(request, &tags);
        NegotiationTrace {
            result,
            accept_language: tags,
        }
    }

    fn run(&self, request: &NegotiationRequest, tags: &[AcceptedTag]) -> NegotiationResult {
        let candidates = [
            (NegotiationSource::Explicit, &request.explicit),
            (NegotiationSource::Stored, &request.stored),
            (NegotiationSource::Persisted, &request.persisted),
        ];
        for (source, value) in candidates {
            if let Some(code) = value.as_deref().and_then(|v| self.registry.code(v)) {
                return self.resolved(code, source);
            }
        }

        if let Some(code) = self.match_accepted(tags) {
            return self.resolved(code, NegotiationSource::Negotiated);
        }

        if let Some(code) = request
            .country
            .as_deref()
            .and_then(|country| self.registry.language_for_country(country))
            .filter(|code| self.registry.is_supported(code.as_str()))
        {
            return self.resolved(code, NegotiationSource::Geolocated);
        }

        self.resolved(self.registry.default_code(), NegotiationSource::Default)
    }

    /// Two full passes: every tag is tried for an exact variant before any tag
    /// is tried by prefix. A low-quality exact match therefore beats a
    /// high-quality prefix match.
    fn match_accepted(&self, tags: &[AcceptedTag]) -> Option<LanguageCode> {
        tags.iter()
            .find_map(|t| self.registry.resolve_variant(&t.tag))
            .or_else(|| {
                tags.iter()
                    .find_map(|t| self.registry.resolve_variant_prefix(&t.tag))
            })
    }

    fn resolved(&self, code: LanguageCode, source: NegotiationSource) -> NegotiationResult {
        debug!("Negotiated language '{}' from {} stage", code, source);
        NegotiationResult { code, source }
    }
}
