#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Builds the real router with in-memory registries; no external services
//! are involved, so every test constructs its own app.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tradotto::config::Config;
use tradotto::middleware::negotiate_language;
use tradotto::models::{Language, Site};
use tradotto::registry::StaticRegistry;
use tradotto::routes;
use tradotto::state::AppState;

/// Config with negotiation-relevant defaults for tests.
pub fn test_config() -> Config {
    Config {
        port: 0,
        languages_file: PathBuf::from("./languages.yml"),
        default_language: "en".to_string(),
        languages_per_site: false,
        language_cookie_name: "preferred_language".to_string(),
        language_cookie_max_age: 3600,
        cookie_same_site: "lax".to_string(),
        sync_tree: true,
        hide_translation_trees: false,
    }
}

/// Shorthand language constructor.
pub fn lang(code: &str, is_default: bool, live: bool, position: i32) -> Language {
    Language {
        code: code.to_string(),
        is_default,
        live,
        position,
    }
}

/// Shorthand site constructor.
pub fn site(hostname: &str, default_language: Option<&str>) -> Site {
    Site {
        hostname: hostname.to_string(),
        default_language: default_language.map(str::to_string),
    }
}

/// Test application wrapper using the real router and middleware.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Build an app over the given languages with default config.
    pub fn new(languages: Vec<Language>) -> Self {
        Self::build(test_config(), languages, Vec::new())
    }

    /// Build an app with explicit config, languages, and sites.
    pub fn build(config: Config, languages: Vec<Language>, sites: Vec<Site>) -> Self {
        let registry = Arc::new(StaticRegistry::new(languages, sites).unwrap());
        let state = AppState::with_registries(&config, registry.clone(), registry);

        let router = Router::new()
            .merge(routes::front::router())
            .merge(routes::health::router())
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                negotiate_language,
            ))
            .with_state(state);

        Self { router }
    }

    /// Send a GET request with optional extra headers.
    pub async fn get(&self, path: &str, headers: &[(&str, &str)]) -> Response {
        let mut builder = Request::builder().uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

/// Read a response body to a string.
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
