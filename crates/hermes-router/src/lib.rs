//! Route registration for Hermes.
//!
//! The [`RouteTable`] records every (pattern, method) registration in
//! insertion order. With localization enabled, one registration fans out
//! into a canonical entry that redirects and one entry per language:
//!
//! ```text
//! register GET /login
//!     ├── /login      → redirect to /<lang>/login
//!     ├── /en/login   → handler
//!     └── /de/login   → handler
//! ```
//!
//! All entries of one fan-out share the middleware list and the metadata.
//! Patterns may contain `{name}` segments; [`PathTemplate`] matches request
//! paths against them.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use hermes_core::{handler_fn, Response, ResponseExt, RouteMethod};
//! use hermes_i18n::{Localizer, TranslationStore};
//! use hermes_router::{RouteOptions, RouteTable};
//! use http::StatusCode;
//!
//! let mut store = TranslationStore::new().with_default_language("en");
//! store.insert("en", [("title", "Login")]);
//! store.insert("de", [("title", "Anmelden")]);
//! let localizer = Arc::new(Localizer::from_store(store, true, false));
//!
//! let mut table = RouteTable::new(localizer);
//! let handler = handler_fn(|_req| async { Ok(Response::empty(StatusCode::OK)) });
//! table.register(RouteMethod::Get, "/login", handler, RouteOptions::new());
//!
//! let patterns: Vec<_> = table.patterns().collect();
//! assert_eq!(patterns, ["/login", "/en/login", "/de/login"]);
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-router/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod method_router;
mod path;
mod route;
mod table;

pub use method_router::MethodRouter;
pub use path::{PathParams, PathTemplate};
pub use route::{MethodRegistration, Param, ParamLocation, ResponseDoc, RouteMeta, RouteOptions};
pub use table::RouteTable;
