//! Registry models.

pub mod language;
pub mod site;

pub use language::{Language, validate_language_code};
pub use site::Site;
