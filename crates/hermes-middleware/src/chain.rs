//! Chain composition.
//!
//! A [`Chain`] wraps one terminal handler with the fixed stages and the
//! route's own middleware. It is built once per (pattern, method) pair and
//! shared read-only by every connection.

use std::sync::Arc;

use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next};
use crate::stages::{CorsMiddleware, MethodGuard, RecoveryMiddleware};
use hermes_core::{BoxFuture, BoxedHandler, Request, Response, ResponseExt, RouteMethod};
use http::StatusCode;

/// A composed handler for one (pattern, method) pair.
///
/// Stage order is recovery, CORS, method guard, then the route's middleware
/// in registration order, then the handler.
pub struct Chain {
    pattern: String,
    method: RouteMethod,
    stages: Vec<Arc<dyn Middleware>>,
    handler: BoxedHandler,
}

impl Chain {
    /// Composes a chain.
    ///
    /// `steps` are the route's own middleware; `cors` is the server-wide
    /// cross-origin stage shared by every chain.
    pub fn compose(
        pattern: impl Into<String>,
        method: RouteMethod,
        handler: BoxedHandler,
        steps: &[Arc<dyn Middleware>],
        cors: Arc<CorsMiddleware>,
    ) -> Self {
        let mut stages: Vec<Arc<dyn Middleware>> = Vec::with_capacity(steps.len() + 3);
        stages.push(Arc::new(RecoveryMiddleware::new()));
        stages.push(cors);
        stages.push(Arc::new(MethodGuard::new(method)));
        stages.extend(steps.iter().cloned());

        Self {
            pattern: pattern.into(),
            method,
            stages,
            handler,
        }
    }

    /// The pattern this chain serves.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The method this chain serves.
    #[must_use]
    pub fn method(&self) -> RouteMethod {
        self.method
    }

    /// Stage names from outermost to innermost.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Runs `request` through every stage and the handler.
    pub async fn call(&self, request: Request) -> Response {
        let mut ctx = MiddlewareContext::new(self.pattern.as_str(), self.method);
        let handler = Arc::clone(&self.handler);

        let mut next = Next::handler(move |ctx: &mut MiddlewareContext, request: Request| {
            invoke_handler(&handler, ctx, request)
        });
        for stage in self.stages.iter().rev() {
            next = Next::new(stage.as_ref(), next);
        }

        next.run(&mut ctx, request).await
    }
}

fn invoke_handler(
    handler: &BoxedHandler,
    ctx: &MiddlewareContext,
    request: Request,
) -> BoxFuture<'static, Response> {
    let request_id = ctx.request_id();
    let pattern = ctx.pattern().to_string();
    let future = handler(request);

    Box::pin(async move {
        match future.await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(
                    request_id = %request_id,
                    pattern = %pattern,
                    error = %error,
                    "Handler returned an error"
                );
                Response::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    })
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("pattern", &self.pattern)
            .field("method", &self.method)
            .field("stages", &self.stage_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::CorsConfig;
    use crate::FnMiddleware;
    use bytes::Bytes;
    use hermes_core::{handler_fn, HandlerError};
    use http::{HeaderValue, Method};
    use http_body_util::{BodyExt, Full};

    fn request(method: Method, origin: Option<&str>) -> Request {
        let mut builder = http::Request::builder().method(method).uri("/login");
        if let Some(origin) = origin {
            builder = builder.header("origin", origin);
        }
        builder.body(Full::new(Bytes::new())).unwrap()
    }

    fn cors() -> Arc<CorsMiddleware> {
        Arc::new(CorsMiddleware::new(
            CorsConfig::from_values(Some("https://app.example.com"), true).unwrap(),
        ))
    }

    fn ok_handler() -> BoxedHandler {
        handler_fn(|_req| async { Ok(Response::error(StatusCode::OK, "handled")) })
    }

    fn header_step(name: &'static str) -> Arc<dyn Middleware> {
        Arc::new(FnMiddleware::new(name, move |ctx, request, next| {
            Box::pin(async move {
                let mut response = next.run(ctx, request).await;
                let order = response
                    .headers()
                    .get("x-order")
                    .and_then(|v| v.to_str().ok())
                    .map(|v| format!("{v},{name}"))
                    .unwrap_or_else(|| name.to_string());
                response
                    .headers_mut()
                    .insert("x-order", HeaderValue::from_str(&order).unwrap());
                response
            })
        }))
    }

    #[test]
    fn test_stage_order() {
        let chain = Chain::compose(
            "/login",
            RouteMethod::Post,
            ok_handler(),
            &[header_step("auth"), header_step("audit")],
            cors(),
        );
        assert_eq!(
            chain.stage_names(),
            ["recovery", "cors", "method_guard", "auth", "audit"]
        );
        assert_eq!(chain.pattern(), "/login");
        assert_eq!(chain.method(), RouteMethod::Post);
    }

    #[tokio::test]
    async fn test_user_steps_run_in_registration_order() {
        let chain = Chain::compose(
            "/login",
            RouteMethod::Get,
            ok_handler(),
            &[header_step("first"), header_step("second")],
            cors(),
        );
        let response = chain.call(request(Method::GET, None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        // Post-processing unwinds innermost first.
        assert_eq!(response.headers().get("x-order").unwrap(), "second,first");
    }

    #[tokio::test]
    async fn test_wrong_method_is_405_before_user_steps() {
        let chain = Chain::compose(
            "/login",
            RouteMethod::Post,
            ok_handler(),
            &[header_step("auth")],
            cors(),
        );
        let response = chain
            .call(request(Method::GET, Some("https://app.example.com")))
            .await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().get("x-order").is_none());
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://app.example.com"
        );
    }

    #[tokio::test]
    async fn test_preflight_answered_by_cors() {
        let chain = Chain::compose("/login", RouteMethod::Post, ok_handler(), &[], cors());
        let response = chain
            .call(request(Method::OPTIONS, Some("https://app.example.com")))
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_handler_error_becomes_500() {
        let failing = handler_fn(|_req| async { Err(HandlerError::internal("db down")) });
        let chain = Chain::compose("/login", RouteMethod::Get, failing, &[], cors());
        let response = chain.call(request(Method::GET, None)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("Internal Server Error\n"));
    }

    #[tokio::test]
    async fn test_panicking_step_is_recovered() {
        let panicking: Arc<dyn Middleware> =
            Arc::new(FnMiddleware::new("explode", |_ctx, _req, _next| {
                panic!("middleware exploded")
            }));
        let chain = Chain::compose("/login", RouteMethod::Get, ok_handler(), &[panicking], cors());

        let response = chain.call(request(Method::GET, None)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = chain.call(request(Method::GET, None)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
