//! Site model and host matching.

use serde::{Deserialize, Serialize};

/// Site record associating a hostname with an optional default language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Hostname matched against the request `Host` header (port ignored).
    pub hostname: String,

    /// Default language for requests served by this site.
    #[serde(default)]
    pub default_language: Option<String>,
}

impl Site {
    /// Whether this site serves the given `Host` header value.
    ///
    /// Hostname comparison is case-insensitive; any port suffix on the
    /// header value is ignored.
    pub fn matches_host(&self, host: &str) -> bool {
        strip_port(host).eq_ignore_ascii_case(&self.hostname)
    }
}

/// Strip the port suffix from a `Host` header value.
///
/// IPv6 literals keep their brackets ("[::1]:8080" → "[::1]").
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        match host.find(']') {
            Some(pos) => &host[..=pos],
            None => host,
        }
    } else {
        match host.find(':') {
            Some(pos) => &host[..pos],
            None => host,
        }
    }
}
