//! Collaborators at the negotiation boundary.
//!
//! `PreferenceStore` backs the stored (session) and persisted (cookie) stages,
//! `GeoResolver` backs the geolocation stage. Their failures never reach the
//! caller: the helpers here log them and treat the stage as "no value".

use crate::i18n::{CountryCode, LanguageCode, NegotiationMetrics};
use axum::http::{HeaderMap, HeaderName};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use thiserror::Error;
use tracing::warn;

/// A collaborator could not serve a read or write.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("{0} is unavailable")]
    Unavailable(&'static str),

    #[error("{store} failed: {reason}")]
    Failed { store: &'static str, reason: String },
}

/// Somewhere a language preference is remembered between requests.
pub trait PreferenceStore {
    /// Short name used in logs (e.g., "cookie", "session").
    fn name(&self) -> &'static str;

    /// The raw remembered value, unvalidated.
    fn read(&self) -> Result<Option<String>, CollaboratorError>;

    /// Remember a language. Returns whether the value was stored.
    fn write(&mut self, code: LanguageCode) -> Result<bool, CollaboratorError>;
}

/// Maps request metadata to a country.
pub trait GeoResolver {
    fn country_for(&self, headers: &HeaderMap) -> Result<Option<CountryCode>, CollaboratorError>;
}

/// Read a store, turning failures into `None`.
pub fn read_or_none(store: &dyn PreferenceStore, metrics: &NegotiationMetrics) -> Option<String> {
    match store.read() {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            warn!("Ignoring {} preference: {}", store.name(), e);
            metrics.record_collaborator_failure();
            None
        }
    }
}

/// Resolve a country, turning failures into `None`.
pub fn country_or_none(
    resolver: &dyn GeoResolver,
    headers: &HeaderMap,
    metrics: &NegotiationMetrics,
) -> Option<CountryCode> {
    match resolver.country_for(headers) {
        Ok(country) => country,
        Err(e) => {
            warn!("Ignoring geolocation signal: {}", e);
            metrics.record_collaborator_failure();
            None
        }
    }
}

/// Write the negotiated language to every store.
///
/// Last writer wins; failures are logged and skipped. Returns the number of
/// stores that accepted the value.
pub fn persist(
    code: LanguageCode,
    stores: &mut [&mut dyn PreferenceStore],
    metrics: &NegotiationMetrics,
) -> usize {
    let mut written = 0;
    for store in stores.iter_mut() {
        match store.write(code) {
            Ok(true) => written += 1,
            Ok(false) => warn!("{} store declined language '{}'", store.name(), code),
            Err(e) => {
                warn!("Failed to persist language '{}': {}", code, e);
                metrics.record_collaborator_failure();
            }
        }
    }
    written
}

/// Attributes of the persisted language cookie.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub max_age_days: i64,
    pub secure: bool,
}

/// Preference kept in a long-lived cookie (`language` by default).
///
/// Writes are collected in the jar, which the handler returns with the response.
#[derive(Debug, Clone)]
pub struct CookiePreferences {
    jar: CookieJar,
    settings: CookieSettings,
}

impl CookiePreferences {
    pub fn new(jar: CookieJar, settings: CookieSettings) -> Self {
        Self { jar, settings }
    }

    /// Hand back the jar, including any cookie written.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn cookie(&self, code: LanguageCode) -> Cookie<'static> {
        Cookie::build((self.settings.name.clone(), code.to_string()))
            .path("/")
            .max_age(cookie::time::Duration::days(self.settings.max_age_days))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.settings.secure)
            .build()
    }
}

impl PreferenceStore for CookiePreferences {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn read(&self) -> Result<Option<String>, CollaboratorError> {
        Ok(self
            .jar
            .get(&self.settings.name)
            .map(|c| c.value().trim().to_string()))
    }

    fn write(&mut self, code: LanguageCode) -> Result<bool, CollaboratorError> {
        let cookie = self.cookie(code);
        self.jar = std::mem::take(&mut self.jar).add(cookie);
        Ok(true)
    }
}

/// Reads the country from a proxy/CDN header such as `CF-IPCountry`.
#[derive(Debug, Clone)]
pub struct HeaderGeoResolver {
    header: HeaderName,
}

impl HeaderGeoResolver {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl GeoResolver for HeaderGeoResolver {
    fn country_for(&self, headers: &HeaderMap) -> Result<Option<CountryCode>, CollaboratorError> {
        Ok(headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .and_then(CountryCode::parse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::LanguageRegistry;
    use axum::http::HeaderValue;

    fn code(raw: &str) -> LanguageCode {
        LanguageRegistry::standard()
            .expect("standard catalog")
            .code(raw)
            .expect("supported")
    }

    fn settings(secure: bool) -> CookieSettings {
        CookieSettings {
            name: "language".to_string(),
            max_age_days: 30,
            secure,
        }
    }

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn read(&self) -> Result<Option<String>, CollaboratorError> {
            Err(CollaboratorError::Unavailable("broken store"))
        }

        fn write(&mut self, _code: LanguageCode) -> Result<bool, CollaboratorError> {
            Err(CollaboratorError::Failed {
                store: "broken",
                reason: "disk full".to_string(),
            })
        }
    }

    struct BrokenGeo;

    impl GeoResolver for BrokenGeo {
        fn country_for(&self, _: &HeaderMap) -> Result<Option<CountryCode>, CollaboratorError> {
            Err(CollaboratorError::Unavailable("geo service"))
        }
    }

    // ==================== Cookie Tests ====================

    #[test]
    fn test_cookie_read_missing() {
        let store = CookiePreferences::new(CookieJar::new(), settings(false));
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_cookie_read_existing() {
        let jar = CookieJar::new().add(Cookie::new("language", "sk"));
        let store = CookiePreferences::new(jar, settings(false));
        assert_eq!(store.read().unwrap(), Some("sk".to_string()));
    }

    #[test]
    fn test_cookie_write_sets_attributes() {
        let mut store = CookiePreferences::new(CookieJar::new(), settings(true));
        assert!(store.write(code("de")).unwrap());

        let jar = store.into_jar();
        let cookie = jar.get("language").expect("cookie written");
        assert_eq!(cookie.value(), "de");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::days(30)));
    }

    #[test]
    fn test_cookie_not_secure_over_plain_http() {
        let mut store = CookiePreferences::new(CookieJar::new(), settings(false));
        store.write(code("de")).unwrap();
        let jar = store.into_jar();
        assert_eq!(jar.get("language").and_then(|c| c.secure()), Some(false));
    }

    // ==================== Boundary Tests ====================

    #[test]
    fn test_read_or_none_swallows_errors() {
        let metrics = NegotiationMetrics::new();
        assert_eq!(read_or_none(&BrokenStore, &metrics), None);
        assert_eq!(metrics.collaborator_failures(), 1);
    }

    #[test]
    fn test_read_or_none_treats_empty_as_absent() {
        let metrics = NegotiationMetrics::new();
        let jar = CookieJar::new().add(Cookie::new("language", ""));
        let store = CookiePreferences::new(jar, settings(false));
        assert_eq!(read_or_none(&store, &metrics), None);
        assert_eq!(metrics.collaborator_failures(), 0);
    }

    #[test]
    fn test_country_or_none_swallows_errors() {
        let metrics = NegotiationMetrics::new();
        assert_eq!(country_or_none(&BrokenGeo, &HeaderMap::new(), &metrics), None);
        assert_eq!(metrics.collaborator_failures(), 1);
    }

    #[test]
    fn test_persist_skips_failing_stores() {
        let metrics = NegotiationMetrics::new();
        let mut cookie = CookiePreferences::new(CookieJar::new(), settings(false));
        let mut broken = BrokenStore;

        let mut stores: [&mut dyn PreferenceStore; 2] = [&mut broken, &mut cookie];
        let written = persist(code("sk"), &mut stores, &metrics);

        assert_eq!(written, 1);
        assert_eq!(metrics.collaborator_failures(), 1);
        assert_eq!(cookie.read().unwrap(), Some("sk".to_string()));
    }

    // ==================== Geo Header Tests ====================

    #[test]
    fn test_header_geo_resolver() {
        let resolver = HeaderGeoResolver::new(HeaderName::from_static("cf-ipcountry"));
        let mut headers = HeaderMap::new();
        assert_eq!(resolver.country_for(&headers).unwrap(), None);

        headers.insert("cf-ipcountry", HeaderValue::from_static("sk"));
        assert_eq!(
            resolver.country_for(&headers).unwrap().map(|c| c.to_string()),
            Some("SK".to_string())
        );

        headers.insert("cf-ipcountry", HeaderValue::from_static("XX"));
        assert_eq!(resolver.country_for(&headers).unwrap(), None);
    }
}
