//! # Hermes Middleware
//!
//! Per-route processing chains.
//!
//! Every registered (pattern, method) pair is served by one [`Chain`]. The
//! stages of a chain always run in the same order:
//!
//! ```text
//! Request → Recovery → CORS → Method Guard → user middleware... → Handler
//!                                                                   ↓
//! Response ← Recovery ← CORS ←──────────────────────────────────────┘
//! ```
//!
//! | Stage        | Middleware               | Purpose                                  |
//! |--------------|--------------------------|------------------------------------------|
//! | recovery     | [`RecoveryMiddleware`]   | Turn panics into `500`                   |
//! | cors         | [`CorsMiddleware`]       | Answer preflights, attach CORS headers   |
//! | method_guard | [`MethodGuard`]          | `405` when the method does not match     |
//! | user         | any [`Middleware`]       | Registered with the route, in order      |
//!
//! Handler errors are turned into `500 Internal Server Error` by the
//! terminal step of the chain.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use hermes_core::{handler_fn, Response, ResponseExt, RouteMethod};
//! use hermes_middleware::{Chain, CorsConfig, CorsMiddleware};
//! use http::StatusCode;
//!
//! let cors = Arc::new(CorsMiddleware::new(CorsConfig::allow_any()));
//! let handler = handler_fn(|_req| async { Ok(Response::empty(StatusCode::OK)) });
//! let chain = Chain::compose("/health", RouteMethod::Get, handler, &[], cors);
//!
//! assert_eq!(chain.stage_names(), ["recovery", "cors", "method_guard"]);
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod context;
pub mod middleware;
pub mod stages;

pub use chain::Chain;
pub use context::MiddlewareContext;
pub use middleware::{FnMiddleware, Middleware, Next};
pub use stages::{AllowedOrigins, CorsConfig, CorsMiddleware, MethodGuard, RecoveryMiddleware};
