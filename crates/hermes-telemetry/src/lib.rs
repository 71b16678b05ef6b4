//! # Hermes Telemetry
//!
//! Installs a `tracing` subscriber for Hermes services. Every Hermes crate
//! logs through `tracing` macros; this crate decides where the events go.
//!
//! ```rust,no_run
//! use hermes_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production()).expect("logging");
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat, LOG_FILTER_ENV};
