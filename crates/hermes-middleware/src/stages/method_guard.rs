//! Method guard stage.

use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next};
use hermes_core::{BoxFuture, Request, Response, ResponseExt, RouteMethod};
use http::StatusCode;

/// Answers `405 Method Not Allowed!` when the request method differs from
/// the method the chain was registered for.
///
/// The dispatcher already selects chains by method, so this stage only
/// fires when a chain is invoked directly.
#[derive(Debug, Clone, Copy)]
pub struct MethodGuard {
    method: RouteMethod,
}

impl MethodGuard {
    /// Creates a guard admitting only `method`.
    #[must_use]
    pub const fn new(method: RouteMethod) -> Self {
        Self { method }
    }

    /// The admitted method.
    #[must_use]
    pub const fn method(&self) -> RouteMethod {
        self.method
    }
}

impl Middleware for MethodGuard {
    fn name(&self) -> &'static str {
        "method_guard"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            if request.method() != self.method.as_http() {
                tracing::debug!(
                    request_id = %ctx.request_id(),
                    expected = %self.method,
                    actual = %request.method(),
                    "Method not allowed"
                );
                return Response::error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed!");
            }
            next.run(ctx, request).await
        })
    }
}
