//! Built-in chain stages.
//!
//! - [`RecoveryMiddleware`] - outermost, converts panics into `500`
//! - [`CorsMiddleware`] - cross-origin policy and preflight handling
//! - [`MethodGuard`] - rejects requests whose method does not match the route

mod cors;
mod method_guard;
mod recovery;

pub use cors::{AllowedOrigins, CorsConfig, CorsMiddleware, DEVELOPMENT_ORIGINS};
pub use method_guard::MethodGuard;
pub use recovery::RecoveryMiddleware;
