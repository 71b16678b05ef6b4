//! Middleware context types.
//!
//! A [`MiddlewareContext`] is created for every request that enters a
//! [`Chain`](crate::Chain) and is handed mutably to each stage.

use hermes_core::{RequestId, RouteMethod};
use std::time::Instant;

/// Per-request state that flows through a chain.
///
/// # Example
///
/// ```
/// use hermes_core::RouteMethod;
/// use hermes_middleware::MiddlewareContext;
///
/// let ctx = MiddlewareContext::new("/de/login", RouteMethod::Post);
/// assert_eq!(ctx.pattern(), "/de/login");
/// assert_eq!(ctx.method(), RouteMethod::Post);
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    /// Unique identifier for this request.
    request_id: RequestId,

    /// The registered pattern the chain belongs to.
    pattern: String,

    /// The method the chain was registered for.
    method: RouteMethod,

    /// When the request entered the chain.
    started_at: Instant,
}

impl MiddlewareContext {
    /// Creates a context with a fresh request ID.
    #[must_use]
    pub fn new(pattern: impl Into<String>, method: RouteMethod) -> Self {
        Self::with_request_id(RequestId::new(), pattern, method)
    }

    /// Creates a context with a specific request ID.
    #[must_use]
    pub fn with_request_id(
        request_id: RequestId,
        pattern: impl Into<String>,
        method: RouteMethod,
    ) -> Self {
        Self {
            request_id,
            pattern: pattern.into(),
            method,
            started_at: Instant::now(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the registered pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the method the chain serves.
    #[must_use]
    pub fn method(&self) -> RouteMethod {
        self.method
    }

    /// Returns when the request entered the chain.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since the request entered the chain.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields() {
        let id = RequestId::new();
        let ctx = MiddlewareContext::with_request_id(id, "/en/login", RouteMethod::Get);
        assert_eq!(ctx.request_id(), id);
        assert_eq!(ctx.pattern(), "/en/login");
        assert_eq!(ctx.method(), RouteMethod::Get);
    }

    #[test]
    fn test_elapsed_time() {
        let ctx = MiddlewareContext::new("/login", RouteMethod::Get);
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(ctx.elapsed() >= std::time::Duration::from_millis(5));
    }
}
