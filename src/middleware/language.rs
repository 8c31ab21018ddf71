//! Language negotiation middleware.
//!
//! Resolves the language every response should be rendered in, using a chain
//! of negotiators. Resolution order: URL prefix → cookie → site default →
//! Accept-Language → registry default → configured fallback.
//!
//! Negotiation never fails a request: any combination of inputs degrades to
//! the configured fallback code. The response phase stamps the resolved code
//! onto the outbound response (`Content-Language` header and the
//! language-preference cookie) so the next request from the same client
//! short-circuits on the cookie.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};
use tracing::{debug, warn};

use crate::models::Language;
use crate::registry::{LanguageRegistry, SiteRegistry};
use crate::state::AppState;

/// The resolved language for the current request.
///
/// Stored in request extensions for per-request access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage(pub String);

/// Settings for the language-preference cookie written on responses.
#[derive(Debug, Clone)]
pub struct LanguageCookie {
    /// Cookie name.
    pub name: String,

    /// Max-Age in seconds.
    pub max_age: i64,

    /// SameSite policy.
    pub same_site: SameSite,
}

/// Trait for language negotiation strategies.
///
/// Implementations inspect the request and return a language code if they
/// can determine the desired language. The middleware chains negotiators
/// by priority (highest first) and uses the first match.
pub trait LanguageNegotiator: Send + Sync {
    /// Attempt to negotiate a language from the request.
    ///
    /// Returns `Some(language_code)` if this negotiator can determine the
    /// language, `None` otherwise.
    fn negotiate(&self, request: &Request<Body>) -> Option<String>;

    /// Priority of this negotiator (higher = checked first).
    fn priority(&self) -> i32;
}

/// Negotiates language from the URL prefix (e.g., `/fr/about` → "fr").
///
/// Only an exact, case-sensitive match of the first path segment against a
/// live language code counts, preventing false matches like `/enterprise`.
/// The URI is left untouched; page routing handles prefixed paths itself.
pub struct UrlPrefixNegotiator {
    languages: Arc<dyn LanguageRegistry>,
}

impl UrlPrefixNegotiator {
    pub fn new(languages: Arc<dyn LanguageRegistry>) -> Self {
        Self { languages }
    }

    /// Extract the first path segment as a language candidate.
    ///
    /// The root path has an empty first segment and yields no candidate.
    fn path_candidate(path: &str) -> Option<&str> {
        let trimmed = path.strip_prefix('/')?;
        let candidate = match trimmed.find('/') {
            Some(pos) => &trimmed[..pos],
            None => trimmed,
        };
        (!candidate.is_empty()).then_some(candidate)
    }
}

impl LanguageNegotiator for UrlPrefixNegotiator {
    fn negotiate(&self, request: &Request<Body>) -> Option<String> {
        let candidate = Self::path_candidate(request.uri().path())?;
        self.languages
            .live_languages()
            .into_iter()
            .find(|language| language.code == candidate)
            .map(|language| language.code)
    }

    fn priority(&self) -> i32 {
        100
    }
}

/// Negotiates language from the language-preference cookie.
///
/// The cookie value must exactly match a live language code; stale values
/// left over from a removed or retired language are ignored.
pub struct CookieNegotiator {
    cookie_name: String,
    languages: Arc<dyn LanguageRegistry>,
}

impl CookieNegotiator {
    pub fn new(cookie_name: impl Into<String>, languages: Arc<dyn LanguageRegistry>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            languages,
        }
    }

    /// Find the named cookie across all `Cookie` headers.
    ///
    /// Unparseable cookie pairs are skipped.
    fn cookie_value(&self, request: &Request<Body>) -> Option<String> {
        for header in request.headers().get_all(header::COOKIE) {
            let Ok(raw) = header.to_str() else { continue };
            for cookie in Cookie::split_parse(raw).flatten() {
                if cookie.name() == self.cookie_name {
                    return Some(cookie.value().to_string());
                }
            }
        }
        None
    }
}

impl LanguageNegotiator for CookieNegotiator {
    fn negotiate(&self, request: &Request<Body>) -> Option<String> {
        let value = self.cookie_value(request)?;
        self.languages
            .live_languages()
            .into_iter()
            .find(|language| language.code == value)
            .map(|language| language.code)
    }

    fn priority(&self) -> i32 {
        80
    }
}

/// Negotiates language from the resolved site's default language.
///
/// Only active when languages-per-site is enabled. The site is resolved
/// from the `Host` header; requests without one never match. Checked after
/// the cookie: a stored preference outranks the site default.
pub struct SiteDefaultNegotiator {
    enabled: bool,
    sites: Arc<dyn SiteRegistry>,
}

impl SiteDefaultNegotiator {
    pub fn new(enabled: bool, sites: Arc<dyn SiteRegistry>) -> Self {
        Self { enabled, sites }
    }
}

impl LanguageNegotiator for SiteDefaultNegotiator {
    fn negotiate(&self, request: &Request<Body>) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let host = request.headers().get(header::HOST)?.to_str().ok()?;
        self.sites.resolve_site(host)?.default_language
    }

    fn priority(&self) -> i32 {
        60
    }
}

/// Negotiates language from the Accept-Language HTTP header.
///
/// Parses quality values and walks candidates by descending quality. Each
/// candidate tag is matched exactly first, then case-insensitively, then by
/// its primary subtag ("en-GB" matches a live "en"); the first live match
/// wins.
pub struct AcceptLanguageNegotiator {
    languages: Arc<dyn LanguageRegistry>,
}

impl AcceptLanguageNegotiator {
    pub fn new(languages: Arc<dyn LanguageRegistry>) -> Self {
        Self { languages }
    }

    /// Parse an Accept-Language header value into (tag, quality) pairs,
    /// sorted by quality descending (stable sort preserves original order
    /// for ties). Segments without a tag are skipped; RFC 7231 §5.3.1
    /// clamps quality values to 0.000–1.000.
    fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
        let mut tags: Vec<(String, f32)> = header
            .split(',')
            .filter_map(|part| {
                let part = part.trim();
                if part.is_empty() {
                    return None;
                }

                let mut segments = part.split(';');
                let tag = segments.next()?.trim();
                if tag.is_empty() {
                    return None;
                }

                let quality = segments
                    .find_map(|segment| {
                        let segment = segment.trim();
                        segment
                            .strip_prefix("q=")
                            .and_then(|q| q.trim().parse::<f32>().ok())
                    })
                    .unwrap_or(1.0)
                    .clamp(0.0, 1.0);

                Some((tag.to_string(), quality))
            })
            .collect();

        tags.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        tags
    }

    /// Match one candidate tag against the live languages.
    ///
    /// Returns the canonical configured code, not the request's spelling.
    fn match_candidate(tag: &str, live: &[Language]) -> Option<String> {
        if let Some(language) = live.iter().find(|l| l.code == tag) {
            return Some(language.code.clone());
        }

        if let Some(language) = live.iter().find(|l| l.code.eq_ignore_ascii_case(tag)) {
            return Some(language.code.clone());
        }

        let primary = tag.split('-').next()?;
        live.iter()
            .find(|l| l.code.eq_ignore_ascii_case(primary))
            .map(|l| l.code.clone())
    }
}

impl LanguageNegotiator for AcceptLanguageNegotiator {
    fn negotiate(&self, request: &Request<Body>) -> Option<String> {
        let header = request
            .headers()
            .get(header::ACCEPT_LANGUAGE)?
            .to_str()
            .ok()?;

        let live = self.languages.live_languages();
        Self::parse_accept_language(header)
            .into_iter()
            .find_map(|(tag, _quality)| Self::match_candidate(&tag, &live))
    }

    fn priority(&self) -> i32 {
        40
    }
}

/// Falls back to the live language flagged as the registry default.
pub struct DefaultLanguageNegotiator {
    languages: Arc<dyn LanguageRegistry>,
}

impl DefaultLanguageNegotiator {
    pub fn new(languages: Arc<dyn LanguageRegistry>) -> Self {
        Self { languages }
    }
}

impl LanguageNegotiator for DefaultLanguageNegotiator {
    fn negotiate(&self, _request: &Request<Body>) -> Option<String> {
        self.languages
            .default_language()
            .map(|language| language.code)
    }

    fn priority(&self) -> i32 {
        20
    }
}

/// Middleware to negotiate the response language for each request.
///
/// Request phase: walk the negotiator chain (highest priority first) and
/// store the first match (or the configured fallback) in request
/// extensions as [`ResolvedLanguage`].
///
/// Response phase: stamp `Content-Language` and the language-preference
/// cookie with the resolved code.
///
/// System paths (static files, health checks) skip negotiation entirely;
/// their responses are not stamped.
pub async fn negotiate_language(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if path.starts_with("/static") || path == "/health" {
        return next.run(request).await;
    }

    let language = resolve_language(
        state.language_negotiators(),
        &request,
        state.fallback_language(),
    );
    debug!(language = %language, path = %path, "resolved request language");

    request
        .extensions_mut()
        .insert(ResolvedLanguage(language.clone()));

    let mut response = next.run(request).await;
    stamp_response(&mut response, &language, state.language_cookie());
    response
}

/// Walk the negotiator chain and fall back to the configured default
/// (sync, testable).
///
/// Total over its inputs: always returns a language code.
fn resolve_language(
    negotiators: &[Arc<dyn LanguageNegotiator>],
    request: &Request<Body>,
    fallback: &str,
) -> String {
    for negotiator in negotiators {
        if let Some(language) = negotiator.negotiate(request) {
            return language;
        }
    }
    fallback.to_string()
}

/// Write the resolved language onto the outbound response.
///
/// A code that cannot be encoded as a header value is skipped with a
/// warning; language negotiation must never break the page response.
fn stamp_response(response: &mut Response, language: &str, cookie: &LanguageCookie) {
    match HeaderValue::from_str(language) {
        Ok(value) => {
            response.headers_mut().insert(header::CONTENT_LANGUAGE, value);
        }
        Err(_) => {
            warn!(language = %language, "language code is not a valid header value");
            return;
        }
    }

    let preference = Cookie::build((cookie.name.clone(), language.to_owned()))
        .path("/")
        .max_age(Duration::seconds(cookie.max_age))
        .same_site(cookie.same_site)
        .build();

    match HeaderValue::from_str(&preference.to_string()) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(_) => warn!(cookie = %cookie.name, "language cookie is not a valid header value"),
    }
}
