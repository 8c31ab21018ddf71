//! Language and site registries.
//!
//! The registries are read-only collaborators of the language resolver:
//! the language registry lists the configured languages, the site registry
//! maps request hosts to per-site defaults. [`StaticRegistry`] is the
//! shipped in-memory implementation, seeded from a YAML file at startup;
//! hosts that manage languages themselves can implement the traits over
//! their own storage.

use std::collections::HashSet;

use crate::error::RegistryError;
use crate::models::{Language, Site, validate_language_code};

pub mod seed;

pub use seed::load_registry;

/// Read-only view of the configured languages.
pub trait LanguageRegistry: Send + Sync {
    /// Languages eligible for negotiation, ordered by position.
    fn live_languages(&self) -> Vec<Language>;

    /// The live language flagged as default, if one exists.
    fn default_language(&self) -> Option<Language>;
}

/// Read-only view of the configured sites.
pub trait SiteRegistry: Send + Sync {
    /// Resolve a request `Host` header value to a site.
    fn resolve_site(&self, host: &str) -> Option<Site>;
}

/// In-memory registry snapshot.
///
/// Frozen at construction: adding or removing languages requires a restart.
#[derive(Debug, Clone)]
pub struct StaticRegistry {
    languages: Vec<Language>,
    sites: Vec<Site>,
}

impl StaticRegistry {
    /// Build a registry from language and site records.
    ///
    /// Rejects invalid or duplicate language codes, more than one live
    /// default language, and sites referencing unconfigured languages.
    pub fn new(mut languages: Vec<Language>, sites: Vec<Site>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for language in &languages {
            validate_language_code(&language.code)?;
            if !seen.insert(language.code.clone()) {
                return Err(RegistryError::DuplicateCode {
                    code: language.code.clone(),
                });
            }
        }

        let mut default: Option<&str> = None;
        for language in languages.iter().filter(|l| l.live && l.is_default) {
            if let Some(first) = default {
                return Err(RegistryError::MultipleDefaults {
                    first: first.to_string(),
                    second: language.code.clone(),
                });
            }
            default = Some(&language.code);
        }

        for site in &sites {
            if let Some(code) = &site.default_language
                && !languages.iter().any(|l| &l.code == code)
            {
                return Err(anyhow::anyhow!(
                    "site '{}' references unconfigured default language '{code}'",
                    site.hostname
                )
                .into());
            }
        }

        languages.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.code.cmp(&b.code)));

        Ok(Self { languages, sites })
    }

    /// Number of configured languages, live or not.
    pub fn language_count(&self) -> usize {
        self.languages.len()
    }
}

impl LanguageRegistry for StaticRegistry {
    fn live_languages(&self) -> Vec<Language> {
        self.languages
            .iter()
            .filter(|language| language.live)
            .cloned()
            .collect()
    }

    fn default_language(&self) -> Option<Language> {
        self.languages
            .iter()
            .find(|language| language.live && language.is_default)
            .cloned()
    }
}

impl SiteRegistry for StaticRegistry {
    fn resolve_site(&self, host: &str) -> Option<Site> {
        self.sites.iter().find(|site| site.matches_host(host)).cloned()
    }
}
