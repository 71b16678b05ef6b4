//! CORS (Cross-Origin Resource Sharing) stage.
//!
//! The allow-list comes from the environment:
//!
//! - `ALLOWED_ORIGINS`: comma-separated origins, `*` for any origin
//! - `APP_ENV`: `production` disables the development fallbacks
//!
//! Outside production an empty allow-list falls back to
//! [`DEVELOPMENT_ORIGINS`], and any `http://localhost:*` or
//! `http://127.0.0.1:*` origin is reflected. In production an empty
//! allow-list is a fatal configuration error.
//!
//! ## Preflight Requests
//!
//! Every `OPTIONS` request is answered by this stage without reaching the
//! handler: `204 No Content` when the origin is allowed, `403 Forbidden`
//! otherwise.
//!
//! ## Example
//!
//! ```
//! use hermes_middleware::{CorsConfig, CorsMiddleware};
//!
//! let config = CorsConfig::from_values(Some("https://app.example.com"), true).unwrap();
//! assert!(config.is_allowed("https://app.example.com"));
//! assert!(!config.is_allowed("http://localhost:8080"));
//!
//! let cors = CorsMiddleware::new(config);
//! # let _ = cors;
//! ```

use std::collections::HashSet;

use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next};
use hermes_core::{BoxFuture, ConfigError, ConfigResult, Request, Response, ResponseExt};
use http::{HeaderMap, HeaderValue, Method, StatusCode};

/// CORS header names.
pub mod headers {
    /// `Access-Control-Allow-Origin` header.
    pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
    /// `Access-Control-Allow-Methods` header.
    pub const ALLOW_METHODS: &str = "access-control-allow-methods";
    /// `Access-Control-Allow-Headers` header.
    pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
    /// `Access-Control-Allow-Credentials` header.
    pub const ALLOW_CREDENTIALS: &str = "access-control-allow-credentials";
    /// `Origin` header.
    pub const ORIGIN: &str = "origin";
}

/// Environment variable holding the allow-list.
pub const ALLOWED_ORIGINS_ENV: &str = "ALLOWED_ORIGINS";

/// Environment variable naming the deployment environment.
pub const APP_ENV: &str = "APP_ENV";

/// Origins allowed when `ALLOWED_ORIGINS` is empty outside production.
pub const DEVELOPMENT_ORIGINS: [&str; 8] = [
    "http://localhost:4321",
    "http://localhost:4322",
    "http://127.0.0.1:4321",
    "http://127.0.0.1:4322",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

const ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE, PATCH, HEAD";
const ALLOW_HEADERS: &str = concat!(
    "Accept, Content-Type, Content-Length, Accept-Encoding, ",
    "X-CSRF-Token, Authorization, X-Requested-With, Origin"
);
const LOOPBACK_PREFIXES: [&str; 2] = ["http://localhost:", "http://127.0.0.1:"];

/// Represents the set of allowed origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// Allow any origin; the request origin is reflected.
    Any,
    /// Allow specific origins.
    List(HashSet<String>),
}

impl AllowedOrigins {
    /// Checks if an origin is in the set.
    pub fn contains(&self, origin: &str) -> bool {
        match self {
            AllowedOrigins::Any => true,
            AllowedOrigins::List(origins) => origins.contains(origin),
        }
    }
}

/// Cross-origin policy shared by every chain of a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    allowed_origins: AllowedOrigins,
    production: bool,
}

impl CorsConfig {
    /// Reads `ALLOWED_ORIGINS` and `APP_ENV` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CorsNotConfigured`] when no origin is
    /// configured in production.
    pub fn from_env() -> ConfigResult<Self> {
        let raw = std::env::var(ALLOWED_ORIGINS_ENV).ok();
        let production = std::env::var(APP_ENV).is_ok_and(|env| env == "production");
        Self::from_values(raw.as_deref(), production)
    }

    /// Builds the policy from a raw `ALLOWED_ORIGINS` value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CorsNotConfigured`] when no origin is
    /// configured in production.
    pub fn from_values(raw: Option<&str>, production: bool) -> ConfigResult<Self> {
        let raw = raw.map(str::trim).unwrap_or_default();

        if raw == "*" {
            return Ok(Self {
                allowed_origins: AllowedOrigins::Any,
                production,
            });
        }

        let origins: HashSet<String> = if raw.is_empty() {
            if production {
                tracing::warn!(
                    "Allowed origins is not set! Please make sure to configure your .env file!"
                );
                HashSet::new()
            } else {
                tracing::warn!("Allowed origins is not set! Allowing development hosts!");
                DEVELOPMENT_ORIGINS.iter().map(ToString::to_string).collect()
            }
        } else {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(ToString::to_string)
                .collect()
        };

        if origins.is_empty() && production {
            tracing::error!("No valid allowed origins configured for CORS in production");
            return Err(ConfigError::CorsNotConfigured);
        }

        Ok(Self {
            allowed_origins: AllowedOrigins::List(origins),
            production,
        })
    }

    /// A policy allowing every origin.
    #[must_use]
    pub fn allow_any() -> Self {
        Self {
            allowed_origins: AllowedOrigins::Any,
            production: false,
        }
    }

    /// The configured origin set.
    #[must_use]
    pub fn allowed_origins(&self) -> &AllowedOrigins {
        &self.allowed_origins
    }

    /// Whether the policy runs with production rules.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.production
    }

    /// Checks whether a request carrying `origin` is allowed.
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.contains(origin)
            || (!self.production
                && LOOPBACK_PREFIXES
                    .iter()
                    .any(|prefix| origin.starts_with(prefix)))
    }
}

/// The stage enforcing a [`CorsConfig`].
///
/// Allowed requests receive the permissive CORS header set on whatever
/// response comes back, including error responses of inner stages. A
/// request without `Origin` counts as allowed but gets no
/// `Access-Control-Allow-Origin`. Disallowed non-preflight requests
/// proceed without CORS headers.
#[derive(Debug, Clone)]
pub struct CorsMiddleware {
    config: CorsConfig,
}

impl CorsMiddleware {
    /// Creates the stage from a policy.
    #[must_use]
    pub fn new(config: CorsConfig) -> Self {
        Self { config }
    }

    /// The policy this stage enforces.
    #[must_use]
    pub fn config(&self) -> &CorsConfig {
        &self.config
    }

    fn origin(request: &Request) -> Option<&str> {
        request
            .headers()
            .get(headers::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .filter(|origin| !origin.is_empty())
    }

    fn apply_headers(map: &mut HeaderMap, reflected_origin: Option<&str>) {
        if let Some(value) = reflected_origin.and_then(|origin| HeaderValue::from_str(origin).ok())
        {
            map.insert(headers::ALLOW_ORIGIN, value);
        }
        map.insert(headers::ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        map.insert(headers::ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
        map.insert(headers::ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    }
}

impl Middleware for CorsMiddleware {
    fn name(&self) -> &'static str {
        "cors"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let origin = Self::origin(&request).map(String::from);
            let allowed = origin
                .as_deref()
                .map_or(true, |origin| self.config.is_allowed(origin));
            let reflected = origin.as_deref().filter(|_| allowed);

            if request.method() == Method::OPTIONS {
                let mut response = if allowed {
                    Response::empty(StatusCode::NO_CONTENT)
                } else {
                    tracing::warn!(
                        request_id = %ctx.request_id(),
                        origin = origin.as_deref().unwrap_or_default(),
                        "CORS preflight from disallowed origin"
                    );
                    Response::error(StatusCode::FORBIDDEN, "CORS: Origin not allowed")
                };
                Self::apply_headers(response.headers_mut(), reflected);
                return response;
            }

            let mut response = next.run(ctx, request).await;
            if allowed {
                Self::apply_headers(response.headers_mut(), reflected);
            }
            response
        })
    }
}
