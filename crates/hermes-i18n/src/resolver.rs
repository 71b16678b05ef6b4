//! Request-facing language resolution.

use std::sync::Arc;

use hermes_core::{
    handler_fn, BoxedHandler, ConfigError, ConfigResult, Request, Response, ResponseExt,
};
use http::header::ACCEPT_LANGUAGE;
use http::HeaderMap;

use crate::config::LocalizationConfig;
use crate::store::{TranslationStore, TranslationTable};

/// Returns the first path segment of `request`, without validation.
///
/// `/de/login` yields `"de"`, `/` yields `""`.
pub fn active_language<B>(request: &http::Request<B>) -> &str {
    let path = request.uri().path();
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    trimmed.split('/').next().unwrap_or("")
}

/// Resolves translations and the canonical redirect for requests.
///
/// Built once from a [`LocalizationConfig`] and shared as `Arc<Localizer>`
/// with every handler that needs translated strings.
#[derive(Debug, Clone, Default)]
pub struct Localizer {
    store: TranslationStore,
    enabled: bool,
    auto_detect: bool,
}

impl Localizer {
    /// Loads every configured translation file and validates the default
    /// language.
    ///
    /// # Errors
    ///
    /// Fails with a [`ConfigError`] when a file cannot be loaded or, with
    /// localization enabled, when the default language is unset or was not
    /// loaded.
    pub fn from_config(config: &LocalizationConfig) -> ConfigResult<Self> {
        if config.enabled() && config.default_language().is_none() {
            return Err(ConfigError::DefaultLanguageUnset);
        }

        let mut store = TranslationStore::new();
        if let Some(default) = config.default_language() {
            store = store.with_default_language(default);
        }
        for source in config.languages() {
            store.load(source.code(), source.path())?;
        }

        if config.enabled() {
            if let Some(default) = config.default_language() {
                if !store.contains(default) {
                    return Err(ConfigError::MissingDefaultLanguage(default.to_string()));
                }
            }
        }

        Ok(Self::from_store(store, config.enabled(), config.auto_detect()))
    }

    /// Wraps an already populated store.
    #[must_use]
    pub fn from_store(store: TranslationStore, enabled: bool, auto_detect: bool) -> Self {
        Self {
            store,
            enabled,
            auto_detect,
        }
    }

    /// A localizer with localization disabled and no tables.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether routes are fanned out per language.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the redirect inspects `Accept-Language`.
    #[must_use]
    pub fn auto_detect(&self) -> bool {
        self.auto_detect
    }

    /// The underlying translation store.
    #[must_use]
    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// Loaded language codes, in load order.
    pub fn languages(&self) -> impl Iterator<Item = &str> + '_ {
        self.store.languages()
    }

    /// The whole translation table for the request's active language.
    #[must_use]
    pub fn translations<B>(&self, request: &http::Request<B>) -> &TranslationTable {
        self.store.resolve_all(active_language(request))
    }

    /// A single translated string for the request's active language.
    #[must_use]
    pub fn translate<B>(&self, request: &http::Request<B>, key: &str) -> &str {
        self.store.resolve(active_language(request), key)
    }

    /// Picks the language a canonical request is redirected to.
    ///
    /// With auto-detection enabled, each `Accept-Language` candidate is
    /// checked in header order against the configured codes; the first code
    /// that prefixes a candidate wins. Otherwise the default language is used.
    #[must_use]
    pub fn detect_language(&self, headers: &HeaderMap) -> &str {
        if self.auto_detect {
            if let Some(code) = headers
                .get(ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok())
                .and_then(|header| self.match_accept_language(header))
            {
                return code;
            }
        }
        self.store.default_language().unwrap_or("")
    }

    fn match_accept_language(&self, header: &str) -> Option<&str> {
        header
            .split(',')
            .map(|candidate| {
                candidate
                    .split(';')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .to_lowercase()
            })
            .filter(|candidate| !candidate.is_empty())
            .find_map(|candidate| {
                self.store
                    .languages()
                    .find(|code| candidate.starts_with(&code.to_lowercase()))
            })
    }

    /// Builds the `302 Found` response sending a canonical request to its
    /// language-prefixed variant. The query string is preserved.
    #[must_use]
    pub fn redirect<B>(&self, request: &http::Request<B>) -> Response {
        let code = self.detect_language(request.headers());
        let uri = request.uri();
        let location = match uri.query() {
            Some(query) => format!("/{code}{}?{query}", uri.path()),
            None => format!("/{code}{}", uri.path()),
        };

        tracing::debug!(
            path = uri.path(),
            language = code,
            location = %location,
            "Redirecting to localized route"
        );

        Response::redirect(&location)
    }

    /// Terminal handler installed on canonical localized patterns.
    #[must_use]
    pub fn redirect_handler(self: &Arc<Self>) -> BoxedHandler {
        let localizer = Arc::clone(self);
        handler_fn(move |request: Request| {
            let response = localizer.redirect(&request);
            async move { Ok(response) }
        })
    }
}
