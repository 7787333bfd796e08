//! Internationalization (i18n) module: which language to serve.
//!
//! All language-selection logic lives here. Nothing in this module reads
//! request globals or performs I/O; the web layer feeds it explicit values.
//!
//! # Architecture
//!
//! - `registry`: Frozen catalog of supported languages, built and validated once
//! - `language`: Validated `LanguageCode`, `LanguageEntry` and text direction
//! - `catalog`: Standard language and country tables
//! - `country`: Country codes, the country → language map and flag emoji
//! - `header`: `Accept-Language` parsing
//! - `negotiation`: The precedence chain (explicit → ... → default)
//! - `metrics`: Counters per negotiation source
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_negotiator::i18n::{LanguageRegistry, NegotiationEngine, NegotiationRequest};
//!
//! let registry = LanguageRegistry::standard()?;
//! let request = NegotiationRequest::new().with_accept_language("sk,en;q=0.8");
//! let result = NegotiationEngine::new(registry).negotiate(&request);
//! assert_eq!(result.code, "sk");
//! ```

pub mod catalog;
mod country;
mod header;
mod language;
mod metrics;
mod negotiation;
mod registry;

pub use country::{flag_emoji, CountryCode, CountryLanguageMap};
pub use header::{parse_accept_language, AcceptedTag};
pub use language::{LanguageCode, LanguageEntry, LanguageSpec, LanguageSummary, TextDirection};
pub use metrics::{MetricsReport, NegotiationMetrics};
pub use negotiation::{
    NegotiationEngine, NegotiationRequest, NegotiationResult, NegotiationSource, NegotiationTrace,
};
pub use registry::{LanguageRegistry, LanguageRegistryBuilder, RegistryError};
