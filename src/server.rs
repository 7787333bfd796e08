//! HTTP surface: assembles the negotiation request from the incoming request,
//! runs the engine, persists the choice and renders the result.

use crate::config::Config;
use crate::i18n::{
    LanguageRegistry, LanguageSummary, MetricsReport, NegotiationEngine, NegotiationMetrics,
    NegotiationRequest, NegotiationResult, NegotiationSource, NegotiationTrace, RegistryError,
    TextDirection,
};
use crate::preference::{
    country_or_none, persist, read_or_none, CookiePreferences, CookieSettings, GeoResolver,
    HeaderGeoResolver, PreferenceStore,
};
use crate::session::{SessionPreferences, SessionStore};
use anyhow::{Context, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Query, State},
    http::{
        header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE, VARY},
        request::Parts,
        uri::Scheme,
        HeaderMap,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared, read-mostly state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<LanguageRegistry>,
    pub sessions: Arc<SessionStore>,
    pub geo: Arc<dyn GeoResolver + Send + Sync>,
    pub metrics: &'static NegotiationMetrics,
}

impl AppState {
    /// Build the registry for the configured default language and wire the
    /// standard collaborators. Fails if the registry does not validate.
    pub fn new(config: Config) -> Result<Self, RegistryError> {
        let registry = LanguageRegistry::standard_with_default(&config.default_language)?;
        let geo = HeaderGeoResolver::new(config.country_header.clone());
        let sessions = SessionStore::new(config.session_capacity);

        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            sessions: Arc::new(sessions),
            geo: Arc::new(geo),
            metrics: NegotiationMetrics::global(),
        })
    }
}

/// Everything the handlers need from one request: the negotiation input and
/// the stores the decision is written back to.
pub struct LanguageContext {
    pub request: NegotiationRequest,
    pub cookies: CookiePreferences,
    pub session: Option<SessionPreferences>,
    new_session: bool,
    secure: bool,
}

#[async_trait]
impl FromRequestParts<AppState> for LanguageContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let config = &state.config;
        let secure = config.force_secure_cookies || is_tls(parts);
        let jar = CookieJar::from_headers(&parts.headers);

        let (session, new_session) = open_session(&jar, state);
        let cookies = CookiePreferences::new(
            jar,
            CookieSettings {
                name: config.cookie_name.clone(),
                max_age_days: config.cookie_max_age_days,
                secure,
            },
        );

        let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();

        let request = NegotiationRequest {
            explicit: query.get(&config.query_param).cloned(),
            stored: session
                .as_ref()
                .and_then(|s| read_or_none(s, state.metrics)),
            persisted: read_or_none(&cookies, state.metrics),
            accept_language: header_string(&parts.headers, ACCEPT_LANGUAGE.as_str()),
            country: country_or_none(state.geo.as_ref(), &parts.headers, state.metrics)
                .map(|c| c.to_string()),
        };

        Ok(Self {
            request,
            cookies,
            session,
            new_session,
            secure,
        })
    }
}

impl LanguageContext {
    /// Write the decision to the language cookie and, when the user chose it,
    /// to the session. A new session's cookie is only issued once its slot
    /// holds a value. Returns the jar to send back.
    pub fn persist(mut self, result: &NegotiationResult, state: &AppState) -> CookieJar {
        let remembered = match self.session.as_mut() {
            Some(session) if result.source.is_user_choice() => {
                let mut stores: [&mut dyn PreferenceStore; 1] = [session];
                persist(result.code, &mut stores, state.metrics) == 1
            }
            _ => false,
        };

        let mut stores: [&mut dyn PreferenceStore; 1] = [&mut self.cookies];
        persist(result.code, &mut stores, state.metrics);
        debug!("Persisted language '{}' (session: {})", result.code, remembered);

        let session_cookie = self
            .session
            .as_ref()
            .filter(|_| self.new_session && remembered)
            .map(|s| {
                let name = state.config.session_cookie_name.clone();
                Cookie::build((name, s.session_id().to_string()))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .secure(self.secure)
                    .build()
            });

        let jar = self.cookies.into_jar();
        match session_cookie {
            Some(cookie) => jar.add(cookie),
            None => jar,
        }
    }
}

/// Resolve the caller's session, minting a new id when the cookie is missing
/// or not one of ours.
fn open_session(jar: &CookieJar, state: &AppState) -> (Option<SessionPreferences>, bool) {
    let existing = jar
        .get(&state.config.session_cookie_name)
        .map(|c| c.value())
        .filter(|id| SessionStore::is_valid_id(id));

    if let Some(id) = existing {
        return (
            Some(SessionPreferences::new(Arc::clone(&state.sessions), id)),
            false,
        );
    }

    match SessionStore::new_session_id() {
        Ok(id) => (
            Some(SessionPreferences::new(Arc::clone(&state.sessions), id)),
            true,
        ),
        Err(e) => {
            warn!("Running without a session: {}", e);
            state.metrics.record_collaborator_failure();
            (None, false)
        }
    }
}

fn is_tls(parts: &Parts) -> bool {
    parts.uri.scheme() == Some(&Scheme::HTTPS)
        || header_string(&parts.headers, "x-forwarded-proto")
            .map(|proto| proto.eq_ignore_ascii_case("https"))
            .unwrap_or(false)
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
}

/// The negotiated language as presented to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLanguage {
    pub code: String,
    pub source: NegotiationSource,
    pub direction: TextDirection,
    pub name: &'static str,
    pub native_name: Option<&'static str>,
    pub flag: Option<String>,
}

impl ResolvedLanguage {
    fn new(result: &NegotiationResult, registry: &LanguageRegistry) -> Self {
        let summary = registry
            .entry_for(result.code.as_str())
            .map(LanguageSummary::from)
            .unwrap_or_else(|| LanguageSummary::from(registry.default_entry()));

        Self {
            code: result.code.to_string(),
            source: result.source,
            direction: summary.direction,
            name: summary.name,
            native_name: summary.native_name,
            flag: summary.flag,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub default: String,
    pub languages: Vec<LanguageSummary>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/language", get(current_language))
        .route("/language/explain", get(explain_language))
        .route("/languages", get(list_languages))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the registry and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let port = config.port;
    let state = AppState::new(config).context("Invalid language registry")?;
    info!(
        "Loaded {} languages ({} countries), default '{}'",
        state.registry.len(),
        state.registry.countries().len(),
        state.registry.default_code()
    );

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("✓ Listening on port {}", port);

    axum::serve(listener, router(state))
        .await
        .context("Server error")
}

async fn health() -> &'static str {
    "OK"
}

async fn current_language(
    State(state): State<AppState>,
    context: LanguageContext,
) -> impl IntoResponse {
    let result = NegotiationEngine::new(&state.registry).negotiate(&context.request);
    state.metrics.record(&result);

    let body = ResolvedLanguage::new(&result, &state.registry);
    let jar = context.persist(&result, &state);

    (
        jar,
        [
            (CONTENT_LANGUAGE, result.code.to_string()),
            (VARY, "Accept-Language, Cookie".to_string()),
        ],
        Json(body),
    )
}

async fn explain_language(
    State(state): State<AppState>,
    context: LanguageContext,
) -> Json<NegotiationTrace> {
    Json(NegotiationEngine::new(&state.registry).explain(&context.request))
}

async fn list_languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        default: state.registry.default_code().to_string(),
        languages: state
            .registry
            .entries()
            .iter()
            .map(LanguageSummary::from)
            .collect(),
    })
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.metrics.report())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn state() -> AppState {
        AppState::new(Config::default()).expect("valid state")
    }

    async fn context(request: Request<()>, state: &AppState) -> LanguageContext {
        let (mut parts, _) = request.into_parts();
        LanguageContext::from_request_parts(&mut parts, state)
            .await
            .expect("infallible")
    }

    #[test]
    fn test_state_rejects_unknown_default() {
        let config = Config {
            default_language: "qq".to_string(),
            ..Config::default()
        };
        assert!(AppState::new(config).is_err());
    }

    #[tokio::test]
    async fn test_context_collects_all_signals() {
        let state = state();
        let request = Request::builder()
            .uri("/language?lang=sk")
            .header("accept-language", "de,en;q=0.5")
            .header("cf-ipcountry", "FR")
            .header("cookie", "language=cs")
            .body(())
            .unwrap();

        let ctx = context(request, &state).await;
        assert_eq!(ctx.request.explicit.as_deref(), Some("sk"));
        assert_eq!(ctx.request.persisted.as_deref(), Some("cs"));
        assert_eq!(ctx.request.accept_language.as_deref(), Some("de,en;q=0.5"));
        assert_eq!(ctx.request.country.as_deref(), Some("FR"));
        assert_eq!(ctx.request.stored, None);
        assert!(ctx.new_session);
        assert!(!ctx.secure);
    }

    #[tokio::test]
    async fn test_context_reads_existing_session() {
        let state = state();
        let id = SessionStore::new_session_id().unwrap();
        let code = state.registry.code("hu").unwrap();
        state.sessions.set(&id, code).unwrap();

        let request = Request::builder()
            .uri("/language")
            .header("cookie", format!("session_id={id}"))
            .body(())
            .unwrap();

        let ctx = context(request, &state).await;
        assert_eq!(ctx.request.stored.as_deref(), Some("hu"));
        assert!(!ctx.new_session);
    }

    #[tokio::test]
    async fn test_forwarded_https_marks_cookies_secure() {
        let state = state();
        let request = Request::builder()
            .uri("/language?lang=sk")
            .header("x-forwarded-proto", "HTTPS")
            .body(())
            .unwrap();

        let ctx = context(request, &state).await;
        assert!(ctx.secure);

        let result = NegotiationEngine::new(&state.registry).negotiate(&ctx.request);
        let jar = ctx.persist(&result, &state);
        assert_eq!(jar.get("language").and_then(|c| c.secure()), Some(true));
        assert_eq!(jar.get("session_id").and_then(|c| c.secure()), Some(true));
    }

    #[tokio::test]
    async fn test_persist_mirrors_into_session() {
        let state = state();
        let request = Request::builder()
            .uri("/language")
            .header("cookie", "language=pl")
            .body(())
            .unwrap();

        let ctx = context(request, &state).await;
        let result = NegotiationEngine::new(&state.registry).negotiate(&ctx.request);
        assert_eq!(result.source, NegotiationSource::Persisted);

        let jar = ctx.persist(&result, &state);
        let id = jar.get("session_id").expect("session cookie").value().to_string();
        assert_eq!(state.sessions.get(&id).unwrap(), Some(result.code));
        assert_eq!(jar.get("language").map(|c| c.value()), Some("pl"));
    }

    // ==================== Session Bound Tests ====================

    fn bounded_state(capacity: usize) -> AppState {
        AppState::new(Config {
            session_capacity: capacity,
            ..Config::default()
        })
        .expect("valid state")
    }

    async fn visit(state: &AppState, uri: &str) -> (NegotiationResult, CookieJar) {
        let request = Request::builder().uri(uri).body(()).unwrap();
        let ctx = context(request, state).await;
        let result = NegotiationEngine::new(&state.registry).negotiate(&ctx.request);
        (result, ctx.persist(&result, state))
    }

    #[tokio::test]
    async fn test_inferred_language_does_not_open_session() {
        let state = bounded_state(3);
        for _ in 0..3 {
            let (result, jar) = visit(&state, "/language").await;
            assert_eq!(result.source, NegotiationSource::Default);
            assert!(jar.get("session_id").is_none());
            assert_eq!(jar.get("language").map(|c| c.value()), Some("en"));
        }
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_full_store_still_remembers_new_choice() {
        let state = bounded_state(3);
        for _ in 0..3 {
            visit(&state, "/language?lang=de").await;
        }
        assert_eq!(state.sessions.len(), 3);

        let (_, jar) = visit(&state, "/language?lang=sk").await;
        let id = jar.get("session_id").expect("session cookie").value().to_string();
        assert_eq!(state.sessions.get(&id).unwrap(), state.registry.code("sk"));
        assert_eq!(state.sessions.len(), 3);
    }

    #[tokio::test]
    async fn test_refused_session_write_issues_no_session_cookie() {
        let state = bounded_state(0);
        let (result, jar) = visit(&state, "/language?lang=sk").await;

        assert_eq!(result.source, NegotiationSource::Explicit);
        assert!(jar.get("session_id").is_none());
        assert_eq!(jar.get("language").map(|c| c.value()), Some("sk"));
    }

    #[test]
    fn test_resolved_language_presentation() {
        let state = state();
        let request = NegotiationRequest::new().with_explicit("ar");
        let result = NegotiationEngine::new(&state.registry).negotiate(&request);
        let body = ResolvedLanguage::new(&result, &state.registry);

        assert_eq!(body.code, "ar");
        assert_eq!(body.direction, TextDirection::Rtl);
        assert_eq!(body.name, "Arabic");
        assert_eq!(body.native_name, Some("العربية"));
        assert_eq!(body.flag.as_deref(), Some("🇸🇦"));
    }
}
