//! Localization configuration.
//!
//! Settings are collected with [`LocalizationConfig::builder()`] in the order
//! the caller supplies them and then frozen into an immutable value that is
//! handed to the server exactly once.
//!
//! # Example
//!
//! ```rust
//! use hermes_i18n::LocalizationConfig;
//!
//! let config = LocalizationConfig::builder()
//!     .enable_translations()
//!     .enable_auto_detect_language()
//!     .translation_file("en", "locales/en.json")
//!     .translation_file("de", "locales/de.json")
//!     .default_language("en")
//!     .build();
//!
//! assert!(config.enabled());
//! assert_eq!(config.languages().len(), 2);
//! assert_eq!(config.default_language(), Some("en"));
//! ```

use std::path::{Path, PathBuf};

/// A translation file registered for one language code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSource {
    code: String,
    path: PathBuf,
}

impl LanguageSource {
    /// Creates a new language source.
    #[must_use]
    pub fn new(code: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
        }
    }

    /// The short language code (`en`, `de`).
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Path of the JSON translation file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Immutable localization settings.
///
/// The default value has localization disabled and no languages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizationConfig {
    /// Whether routes are fanned out per language.
    enabled: bool,

    /// Whether the canonical redirect inspects `Accept-Language`.
    auto_detect: bool,

    /// Translation files in registration order.
    languages: Vec<LanguageSource>,

    /// Code used when a language or key is missing.
    default_language: Option<String>,
}

impl LocalizationConfig {
    /// Creates a new localization configuration builder.
    #[must_use]
    pub fn builder() -> LocalizationConfigBuilder {
        LocalizationConfigBuilder::default()
    }

    /// Returns a configuration with localization disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Returns whether localization is enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns whether `Accept-Language` auto-detection is enabled.
    #[must_use]
    pub fn auto_detect(&self) -> bool {
        self.auto_detect
    }

    /// Returns the registered translation files, in order.
    #[must_use]
    pub fn languages(&self) -> &[LanguageSource] {
        &self.languages
    }

    /// Returns the default language code, if set.
    #[must_use]
    pub fn default_language(&self) -> Option<&str> {
        self.default_language.as_deref()
    }
}

/// Builder for [`LocalizationConfig`].
#[derive(Debug, Clone, Default)]
pub struct LocalizationConfigBuilder {
    config: LocalizationConfig,
}

impl LocalizationConfigBuilder {
    /// Creates a new builder with localization disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables language fan-out of registered routes.
    #[must_use]
    pub fn enable_translations(mut self) -> Self {
        self.config.enabled = true;
        self
    }

    /// Enables `Accept-Language` detection for canonical redirects.
    #[must_use]
    pub fn enable_auto_detect_language(mut self) -> Self {
        self.config.auto_detect = true;
        self
    }

    /// Registers the translation file for a language code.
    ///
    /// Registering the same code again replaces the earlier file but keeps
    /// the language's original position.
    #[must_use]
    pub fn translation_file(mut self, code: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let source = LanguageSource::new(code, path);
        match self
            .config
            .languages
            .iter_mut()
            .find(|existing| existing.code == source.code)
        {
            Some(existing) => *existing = source,
            None => self.config.languages.push(source),
        }
        self
    }

    /// Sets the default language code.
    #[must_use]
    pub fn default_language(mut self, code: impl Into<String>) -> Self {
        self.config.default_language = Some(code.into());
        self
    }

    /// Freezes the configuration.
    #[must_use]
    pub fn build(self) -> LocalizationConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled() {
        let config = LocalizationConfig::default();
        assert!(!config.enabled());
        assert!(!config.auto_detect());
        assert!(config.languages().is_empty());
        assert_eq!(config.default_language(), None);
        assert_eq!(config, LocalizationConfig::disabled());
    }

    #[test]
    fn test_builder_keeps_language_order() {
        let config = LocalizationConfig::builder()
            .translation_file("en", "en.json")
            .translation_file("de", "de.json")
            .translation_file("fr", "fr.json")
            .build();

        let codes: Vec<_> = config.languages().iter().map(LanguageSource::code).collect();
        assert_eq!(codes, ["en", "de", "fr"]);
    }

    #[test]
    fn test_builder_replaces_repeated_code_in_place() {
        let config = LocalizationConfig::builder()
            .translation_file("en", "old-en.json")
            .translation_file("de", "de.json")
            .translation_file("en", "new-en.json")
            .build();

        assert_eq!(config.languages().len(), 2);
        assert_eq!(config.languages()[0].code(), "en");
        assert_eq!(config.languages()[0].path(), Path::new("new-en.json"));
    }

    #[test]
    fn test_last_default_language_wins() {
        let config = LocalizationConfig::builder()
            .default_language("de")
            .default_language("en")
            .build();
        assert_eq!(config.default_language(), Some("en"));
    }
}
