//! # Hermes i18n
//!
//! Translation tables and language resolution for localized routes.
//!
//! - [`LocalizationConfig`] - immutable localization settings, assembled once
//! - [`TranslationStore`] - per-language flat string tables with fallback
//! - [`Localizer`] - request-facing resolver: active language, lookups and
//!   the redirect installed on canonical localized routes
//!
//! ## Fallback
//!
//! A lookup first consults the table of the requested language, then the
//! table of the default language, and finally yields the empty string:
//!
//! ```
//! use hermes_i18n::TranslationStore;
//!
//! let mut store = TranslationStore::new().with_default_language("en");
//! store.insert("en", [("greeting", "Hello")]);
//! store.insert("de", [("farewell", "Tschüss")]);
//!
//! assert_eq!(store.resolve("de", "greeting"), "Hello");
//! assert_eq!(store.resolve("xx", "greeting"), "Hello");
//! assert_eq!(store.resolve("de", "missing"), "");
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-i18n/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod resolver;
mod store;

pub use config::{LanguageSource, LocalizationConfig, LocalizationConfigBuilder};
pub use resolver::{active_language, Localizer};
pub use store::{TranslationStore, TranslationTable};
