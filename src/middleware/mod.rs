//! HTTP middleware components.
//!
//! Provides the language negotiation layer applied around page routes.

pub mod language;

pub use language::{LanguageNegotiator, ResolvedLanguage, negotiate_language};
