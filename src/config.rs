//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tower_sessions::cookie::SameSite;

/// Default Max-Age for the language-preference cookie: one year.
const DEFAULT_LANGUAGE_COOKIE_MAX_AGE: i64 = 60 * 60 * 24 * 365;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Path to the language/site registry seed file (default: ./languages.yml).
    pub languages_file: PathBuf,

    /// Fallback language code used when negotiation yields nothing
    /// (default: "en"). Always available.
    pub default_language: String,

    /// Whether per-site default languages participate in negotiation
    /// (default: false).
    pub languages_per_site: bool,

    /// Name of the language-preference cookie (default: "preferred_language").
    pub language_cookie_name: String,

    /// Max-Age of the language-preference cookie in seconds
    /// (default: one year).
    pub language_cookie_max_age: i64,

    /// Cookie SameSite policy: "strict", "lax", or "none" (default: "lax").
    pub cookie_same_site: String,

    /// Whether translated page trees are kept synchronized
    /// (default: true). Consumed by the tree-sync components, not by the
    /// resolver.
    pub sync_tree: bool,

    /// Whether translated trees are hidden from admin listings
    /// (default: false). Consumed by the admin components, not by the
    /// resolver.
    pub hide_translation_trees: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let languages_file = env::var("LANGUAGES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./languages.yml"));

        let default_language =
            env::var("DEFAULT_LANGUAGE").unwrap_or_else(|_| "en".to_string());

        let languages_per_site = env_flag("LANGUAGES_PER_SITE", false)?;

        let language_cookie_name =
            env::var("LANGUAGE_COOKIE_NAME").unwrap_or_else(|_| "preferred_language".to_string());

        let language_cookie_max_age = env::var("LANGUAGE_COOKIE_MAX_AGE")
            .unwrap_or_else(|_| DEFAULT_LANGUAGE_COOKIE_MAX_AGE.to_string())
            .parse()
            .context("LANGUAGE_COOKIE_MAX_AGE must be a number of seconds")?;

        let cookie_same_site = env::var("COOKIE_SAME_SITE")
            .unwrap_or_else(|_| "lax".to_string())
            .to_lowercase();

        let sync_tree = env_flag("SYNC_TREE", true)?;
        let hide_translation_trees = env_flag("HIDE_TRANSLATION_TREES", false)?;

        Ok(Self {
            port,
            languages_file,
            default_language,
            languages_per_site,
            language_cookie_name,
            language_cookie_max_age,
            cookie_same_site,
            sync_tree,
            hide_translation_trees,
        })
    }

    /// The SameSite policy for the language-preference cookie.
    pub fn language_cookie_same_site(&self) -> SameSite {
        match self.cookie_same_site.as_str() {
            "strict" => SameSite::Strict,
            "none" => SameSite::None,
            _ => SameSite::Lax,
        }
    }
}

/// Parse a boolean environment variable, accepting the usual spellings.
fn env_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("{name} must be a boolean, got '{other}'"),
        },
        Err(_) => Ok(default),
    }
}
