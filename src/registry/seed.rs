//! YAML registry seed loading.
//!
//! The seed file declares the configured languages and sites in one YAML
//! document, read once at startup:
//!
//! ```yaml
//! languages:
//!   - code: en
//!     is_default: true
//!   - code: fr
//!     position: 1
//! sites:
//!   - hostname: fr.localhost
//!     default_language: fr
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::{LanguageRegistry, StaticRegistry};
use crate::error::RegistryError;
use crate::models::{Language, Site};

/// On-disk shape of the registry seed file.
#[derive(Debug, Default, Deserialize)]
struct RegistrySeed {
    #[serde(default)]
    languages: Vec<Language>,

    #[serde(default)]
    sites: Vec<Site>,
}

/// Load a [`StaticRegistry`] from a YAML seed file.
pub fn load_registry(path: &Path) -> Result<StaticRegistry, RegistryError> {
    let raw = fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let seed: RegistrySeed = serde_yml::from_str(&raw).map_err(|source| RegistryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let registry = StaticRegistry::new(seed.languages, seed.sites)?;

    info!(
        path = %path.display(),
        languages = registry.language_count(),
        live = registry.live_languages().len(),
        "loaded language registry"
    );

    Ok(registry)
}
