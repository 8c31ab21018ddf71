//! Application error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the language/site registry.
///
/// Only startup paths produce these; request-time negotiation is total and
/// never errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("duplicate language code '{code}'")]
    DuplicateCode { code: String },

    #[error("multiple live default languages: '{first}' and '{second}'")]
    MultipleDefaults { first: String, second: String },

    #[error(transparent)]
    Invalid(#[from] anyhow::Error),
}
