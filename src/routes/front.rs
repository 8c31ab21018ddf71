//! Page route handlers.
//!
//! Serves a minimal page shell in the negotiated language. Real page
//! rendering belongs to the host CMS; these handlers show how the resolved
//! language is consumed downstream and advertise the live alternates.

use axum::extract::State;
use axum::http::Uri;
use axum::response::Html;
use axum::routing::get;
use axum::{Extension, Router};

use crate::middleware::language::ResolvedLanguage;
use crate::registry::LanguageRegistry;
use crate::state::AppState;

/// Create the page router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_page))
        .route("/{*path}", get(serve_page))
}

/// Serve a page shell in the resolved language.
///
/// The language extension is absent on paths excluded from negotiation;
/// those fall back to the configured default.
async fn serve_page(
    State(state): State<AppState>,
    resolved: Option<Extension<ResolvedLanguage>>,
    uri: Uri,
) -> Html<String> {
    let language = resolved.map_or_else(
        || state.fallback_language().to_string(),
        |Extension(ResolvedLanguage(code))| code,
    );

    let alternates: String = state
        .languages()
        .live_languages()
        .iter()
        .map(|alternate| {
            format!(
                "<link rel=\"alternate\" hreflang=\"{code}\" href=\"/{code}/\" />\n",
                code = html_escape(&alternate.code)
            )
        })
        .collect();

    let html = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"{lang}\">\n\
         <head>\n<title>{path}</title>\n{alternates}</head>\n\
         <body>\n<p>Serving {path} in language {lang}.</p>\n</body>\n\
         </html>\n",
        lang = html_escape(&language),
        path = html_escape(uri.path()),
    );

    Html(html)
}

/// Minimal HTML escaping for attribute and text content.
fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
