//! # Hermes Core
//!
//! Core types shared by the Hermes routing crates.
//!
//! - [`Request`] / [`Response`] - the HTTP types flowing through every chain
//! - [`RouteMethod`] - the four methods a route can be registered for
//! - [`BoxedHandler`] - a type-erased terminal handler
//! - [`ConfigError`] - fatal startup errors
//! - [`HandlerError`] - recoverable request-time errors
//! - [`RequestId`] - UUID v7 request identifier used for log correlation

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod handler;
mod method;
mod types;

pub use context::RequestId;
pub use error::{ConfigError, ConfigResult, HandlerError};
pub use handler::{handler_fn, BoxFuture, BoxedHandler, HandlerResult};
pub use method::RouteMethod;
pub use types::{Request, Response, ResponseExt};
