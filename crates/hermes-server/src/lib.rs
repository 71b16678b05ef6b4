//! # Hermes Server
//!
//! Turns a Hermes route table into a running HTTP/1 server.
//!
//! - [`Server`] - route registration, startup and graceful shutdown
//! - [`Dispatcher`] - exact pattern lookup over composed chains
//! - [`ServerConfig`] - bind address and shutdown timeout
//! - [`ShutdownSignal`] / [`ConnectionTracker`] - shutdown coordination
//!
//! Every configuration problem (translation files, duplicate routes, CORS
//! policy) is reported as an error before the listener is bound.

#![doc(html_root_url = "https://docs.rs/hermes-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod dispatcher;
mod error;
mod server;
pub mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use dispatcher::{Dispatcher, NOT_FOUND_MESSAGE};
pub use error::ServerError;
pub use server::Server;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
