//! Error types for Hermes.
//!
//! Two families of errors exist and they never mix:
//!
//! - [`ConfigError`] is fatal. It is returned while the server is being
//!   assembled (translation loading, CORS policy, chain building) and the
//!   server must not start when one is produced.
//! - [`HandlerError`] is recoverable. A handler returns it for a single
//!   request and the chain turns it into a `500` response.

use std::path::PathBuf;

use thiserror::Error;

use crate::method::RouteMethod;

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal configuration errors detected before any request is served.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A translation file could not be read.
    #[error("failed to read translation file '{}' for language '{code}': {source}", .path.display())]
    TranslationRead {
        /// Language code the file was registered for.
        code: String,
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A translation file is not a flat JSON object of strings.
    #[error("translation file '{}' for language '{code}' is not a flat string map: {source}", .path.display())]
    TranslationParse {
        /// Language code the file was registered for.
        code: String,
        /// Path of the file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Localization is enabled but no default language was configured.
    #[error("localization is enabled but no default language is set")]
    DefaultLanguageUnset,

    /// The default language has no loaded translation table.
    #[error("default language '{0}' has no loaded translation table")]
    MissingDefaultLanguage(String),

    /// The same (pattern, method) pair was registered twice.
    #[error("duplicate route registration: {method} {pattern}")]
    DuplicateRoute {
        /// The route pattern.
        pattern: String,
        /// The HTTP method.
        method: RouteMethod,
    },

    /// No allowed CORS origins are configured in a production environment.
    #[error("no valid allowed origins configured for CORS in production")]
    CorsNotConfigured,
}

/// Recoverable error returned by a handler for a single request.
///
/// The chain logs it and answers with `500 Internal Server Error`.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Internal failure described by a message.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Any other error raised by application code.
    #[error("Handler error: {0}")]
    Custom(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Creates an internal error from a message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Wraps an arbitrary error.
    pub fn custom(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Custom(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_route_display() {
        let err = ConfigError::DuplicateRoute {
            pattern: "/login".to_string(),
            method: RouteMethod::Post,
        };
        assert_eq!(err.to_string(), "duplicate route registration: POST /login");
    }

    #[test]
    fn test_translation_read_display_names_file_and_code() {
        let err = ConfigError::TranslationRead {
            code: "de".to_string(),
            path: PathBuf::from("locales/de.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let message = err.to_string();
        assert!(message.contains("locales/de.json"));
        assert!(message.contains("'de'"));
    }

    #[test]
    fn test_missing_default_language_display() {
        let err = ConfigError::MissingDefaultLanguage("en".to_string());
        assert!(err.to_string().contains("'en'"));
    }

    #[test]
    fn test_handler_error_display() {
        let err = HandlerError::internal("database unavailable");
        assert_eq!(err.to_string(), "Internal error: database unavailable");

        let err = HandlerError::custom(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(err.to_string().starts_with("Handler error"));
    }
}
