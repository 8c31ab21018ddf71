//! Language model.
//!
//! Languages are negotiation-eligible configuration entities. Monolingual
//! deployments use only the configured fallback code; multilingual
//! deployments declare their languages through the registry seed.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Language record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language code (e.g., "en", "fr", "en-GB").
    pub code: String,

    /// Whether this is the registry default language.
    ///
    /// At most one live language may carry this flag.
    #[serde(default)]
    pub is_default: bool,

    /// Whether this language is eligible for negotiation.
    #[serde(default = "default_live")]
    pub live: bool,

    /// Sort position for language ordering.
    #[serde(default)]
    pub position: i32,
}

fn default_live() -> bool {
    true
}

/// Validate that a language code follows BCP 47 primary-subtag format.
///
/// Accepts: 2-3 lowercase letters, optionally followed by hyphen-separated
/// alphanumeric subtags of 1-8 characters each (e.g., "en", "en-GB",
/// "pt-br", "zh-Hans").
pub fn validate_language_code(code: &str) -> Result<()> {
    if code.is_empty() || code.len() > 12 {
        anyhow::bail!("language code must be 1-12 characters, got '{code}'");
    }

    let mut parts = code.split('-');

    // Primary subtag: 2-3 lowercase letters
    match parts.next() {
        Some(primary) if (2..=3).contains(&primary.len()) => {
            if !primary.bytes().all(|b| b.is_ascii_lowercase()) {
                anyhow::bail!("language code primary subtag must be lowercase letters, got '{code}'");
            }
        }
        _ => {
            anyhow::bail!("language code must start with a 2-3 letter primary subtag, got '{code}'");
        }
    }

    // Optional subtags: alphanumeric, 1-8 chars each
    for subtag in parts {
        if subtag.is_empty()
            || subtag.len() > 8
            || !subtag.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            anyhow::bail!(
                "language code subtag must be 1-8 alphanumeric characters, got '{subtag}' in '{code}'"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn language_struct_creation() {
        let lang = Language {
            code: "en".to_string(),
            is_default: true,
            live: true,
            position: 0,
        };

        assert_eq!(lang.code, "en");
        assert!(lang.is_default);
        assert!(lang.live);
    }

    #[test]
    fn language_equality() {
        let a = Language {
            code: "en".to_string(),
            is_default: true,
            live: true,
            position: 0,
        };
        let b = a.clone();
        let c = Language {
            code: "fr".to_string(),
            is_default: false,
            live: true,
            position: 1,
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn language_deserializes_with_defaults() {
        // Only the code is required; omitted flags default to a live,
        // non-default language.
        let lang: Language = serde_yml::from_str("code: fr").unwrap();
        assert_eq!(lang.code, "fr");
        assert!(!lang.is_default);
        assert!(lang.live);
        assert_eq!(lang.position, 0);
    }

    #[test]
    fn language_serialization_round_trip() {
        let lang = Language {
            code: "en-GB".to_string(),
            is_default: false,
            live: false,
            position: 5,
        };

        let json = serde_json::to_string(&lang).unwrap();
        let parsed: Language = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, lang);
    }

    #[test]
    fn validate_language_code_accepts_valid() {
        assert!(validate_language_code("en").is_ok());
        assert!(validate_language_code("fr").is_ok());
        assert!(validate_language_code("en-GB").is_ok());
        assert!(validate_language_code("pt-br").is_ok());
        assert!(validate_language_code("zh-Hans").is_ok());
        assert!(validate_language_code("ast").is_ok()); // 3-letter primary
        assert!(validate_language_code("es-419").is_ok()); // numeric region
    }

    #[test]
    fn validate_language_code_rejects_invalid() {
        assert!(validate_language_code("").is_err(), "empty");
        assert!(validate_language_code("e").is_err(), "too short");
        assert!(validate_language_code("EN").is_err(), "uppercase primary");
        assert!(validate_language_code("en us").is_err(), "space");
        assert!(validate_language_code("../foo").is_err(), "path traversal");
        assert!(validate_language_code("<script>").is_err(), "html");
        assert!(validate_language_code("en-").is_err(), "trailing hyphen");
        assert!(
            validate_language_code("abcdefghijklm").is_err(),
            "too long overall"
        );
    }
}
