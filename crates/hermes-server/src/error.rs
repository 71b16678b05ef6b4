//! Server errors.

use std::net::SocketAddr;

use hermes_core::ConfigError;
use hermes_docs::DocsError;
use thiserror::Error;

/// Errors that stop the server from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The route table or the CORS policy is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The bind address does not parse.
    #[error("invalid bind address '{addr}': {source}")]
    InvalidAddress {
        /// Address as configured.
        addr: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },

    /// The listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was tried.
        addr: SocketAddr,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The OpenAPI document could not be produced.
    #[error(transparent)]
    Docs(#[from] DocsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::RouteMethod;

    #[test]
    fn test_config_error_is_transparent() {
        let err = ServerError::from(ConfigError::DuplicateRoute {
            pattern: "/login".to_string(),
            method: RouteMethod::Get,
        });
        assert_eq!(err.to_string(), "duplicate route registration: GET /login");
    }

    #[test]
    fn test_invalid_address_display() {
        let source = "nope".parse::<SocketAddr>().unwrap_err();
        let err = ServerError::InvalidAddress {
            addr: "nope".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid bind address 'nope'"));
    }
}
