//! # Hermes
//!
//! **Localized HTTP routing with per-route middleware chains**
//!
//! Register a route once and Hermes serves it under every configured
//! language prefix, redirecting the bare path to the visitor's language:
//!
//! ```text
//! GET /login      → 302 Location: /en/login
//! GET /en/login   → handler (English table)
//! GET /de/login   → handler (German table)
//! GET /fr/login   → 404
//! ```
//!
//! Every (pattern, method) pair runs through a fixed chain:
//!
//! ```text
//! Request → Recovery → CORS → Method Guard → route middleware... → Handler
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hermes::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let localization = LocalizationConfig::builder()
//!         .enable_translations()
//!         .translation_file("en", "locales/en.json")
//!         .translation_file("de", "locales/de.json")
//!         .default_language("en")
//!         .build();
//!
//!     let mut server = Server::new(ServerConfig::default(), &localization)?;
//!     let localizer = server.localizer();
//!     server.get(
//!         "/login",
//!         move |req| {
//!             let title = localizer.translate(&req, "login.title").to_string();
//!             async move { Ok(Response::error(StatusCode::OK, &title)) }
//!         },
//!         RouteOptions::new().summary("Login page"),
//!     );
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use hermes_core as core;
pub use hermes_docs as docs;
pub use hermes_i18n as i18n;
pub use hermes_middleware as middleware;
pub use hermes_router as router;
pub use hermes_server as server;
pub use hermes_telemetry as telemetry;

pub use http;

/// Common imports.
///
/// ```rust
/// use hermes::prelude::*;
/// ```
pub mod prelude {
    pub use hermes_core::{
        handler_fn, BoxedHandler, ConfigError, HandlerError, HandlerResult, Request, Response,
        ResponseExt, RouteMethod,
    };
    pub use hermes_i18n::{LocalizationConfig, Localizer};
    pub use hermes_middleware::{CorsConfig, FnMiddleware, Middleware, MiddlewareContext, Next};
    pub use hermes_router::{Param, PathParams, RouteOptions};
    pub use hermes_server::{Server, ServerConfig, ServerError, ShutdownSignal};
    pub use http::StatusCode;
}
