//! Application state shared across all handlers.

use std::cmp::Reverse;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::middleware::language::{
    AcceptLanguageNegotiator, CookieNegotiator, DefaultLanguageNegotiator, LanguageCookie,
    LanguageNegotiator, SiteDefaultNegotiator, UrlPrefixNegotiator,
};
use crate::registry::{self, LanguageRegistry, SiteRegistry};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Language registry.
    ///
    /// Frozen at startup: adding or removing languages requires a restart.
    languages: Arc<dyn LanguageRegistry>,

    /// Negotiator chain, sorted by priority descending.
    negotiators: Vec<Arc<dyn LanguageNegotiator>>,

    /// Fallback language code used when no negotiator matches.
    fallback_language: String,

    /// Settings for the language-preference cookie.
    language_cookie: LanguageCookie,
}

impl AppState {
    /// Initialize state from configuration, loading the registry seed file.
    pub fn new(config: &Config) -> Result<Self> {
        let registry = Arc::new(
            registry::load_registry(&config.languages_file)
                .context("failed to load language registry")?,
        );
        Ok(Self::with_registries(config, registry.clone(), registry))
    }

    /// Build state around externally-owned registries.
    ///
    /// Used by tests and by hosts that manage languages themselves.
    pub fn with_registries(
        config: &Config,
        languages: Arc<dyn LanguageRegistry>,
        sites: Arc<dyn SiteRegistry>,
    ) -> Self {
        let mut negotiators: Vec<Arc<dyn LanguageNegotiator>> = vec![
            Arc::new(UrlPrefixNegotiator::new(languages.clone())),
            Arc::new(CookieNegotiator::new(
                config.language_cookie_name.clone(),
                languages.clone(),
            )),
            Arc::new(SiteDefaultNegotiator::new(config.languages_per_site, sites)),
            Arc::new(AcceptLanguageNegotiator::new(languages.clone())),
            Arc::new(DefaultLanguageNegotiator::new(languages.clone())),
        ];
        negotiators.sort_by_key(|negotiator| Reverse(negotiator.priority()));

        let default_code = languages
            .default_language()
            .map_or_else(|| config.default_language.clone(), |language| language.code);
        info!(
            live = languages.live_languages().len(),
            default = %default_code,
            per_site = config.languages_per_site,
            "language negotiation configured"
        );

        Self {
            inner: Arc::new(AppStateInner {
                languages,
                negotiators,
                fallback_language: config.default_language.clone(),
                language_cookie: LanguageCookie {
                    name: config.language_cookie_name.clone(),
                    max_age: config.language_cookie_max_age,
                    same_site: config.language_cookie_same_site(),
                },
            }),
        }
    }

    /// Get the negotiator chain (sorted by priority descending).
    pub fn language_negotiators(&self) -> &[Arc<dyn LanguageNegotiator>] {
        &self.inner.negotiators
    }

    /// Get the language registry.
    pub fn languages(&self) -> &Arc<dyn LanguageRegistry> {
        &self.inner.languages
    }

    /// Fallback language code used when no negotiator matches.
    pub fn fallback_language(&self) -> &str {
        &self.inner.fallback_language
    }

    /// Settings for the language-preference cookie.
    pub fn language_cookie(&self) -> &LanguageCookie {
        &self.inner.language_cookie
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::models::Language;
    use crate::registry::StaticRegistry;

    fn test_config() -> Config {
        Config {
            port: 3000,
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

    #[test]
    fn negotiator_chain_is_sorted_by_priority() {
        let registry = Arc::new(
            StaticRegistry::new(
                vec![Language {
                    code: "en".to_string(),
                    is_default: true,
                    live: true,
                    position: 0,
                }],
                Vec::new(),
            )
            .unwrap(),
        );
        let state = AppState::with_registries(&test_config(), registry.clone(), registry);

        let priorities: Vec<i32> = state
            .language_negotiators()
            .iter()
            .map(|negotiator| negotiator.priority())
            .collect();
        let mut sorted = priorities.clone();
        sorted.sort_by_key(|priority| Reverse(*priority));
        assert_eq!(priorities, sorted);
        assert_eq!(priorities.len(), 5);
    }

    #[test]
    fn state_clone_is_cheap_and_shares_inner() {
        let registry = Arc::new(StaticRegistry::new(Vec::new(), Vec::new()).unwrap());
        let state = AppState::with_registries(&test_config(), registry.clone(), registry);
        let cloned = state.clone();

        assert_eq!(state.fallback_language(), cloned.fallback_language());
        assert_eq!(state.language_cookie().name, "preferred_language");
    }
}
