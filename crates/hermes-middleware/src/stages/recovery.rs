//! Panic recovery stage.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use crate::context::MiddlewareContext;
use crate::middleware::{Middleware, Next};
use futures_util::FutureExt;
use hermes_core::{BoxFuture, Request, Response, ResponseExt};
use http::StatusCode;

/// Outermost stage: a panic anywhere inside the chain is logged and answered
/// with `500 Internal Server Error`. The connection keeps serving.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryMiddleware;

impl RecoveryMiddleware {
    /// Creates the recovery stage.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

impl Middleware for RecoveryMiddleware {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let request_id = ctx.request_id();
            let outcome = AssertUnwindSafe(next.run(ctx, request))
                .catch_unwind()
                .await;
            match outcome {
                Ok(response) => response,
                Err(payload) => {
                    tracing::error!(
                        request_id = %request_id,
                        pattern = ctx.pattern(),
                        error = panic_message(payload.as_ref()),
                        "Recovering from a panic"
                    );
                    Response::error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use hermes_core::RouteMethod;
    use http_body_util::{BodyExt, Full};

    fn explode() -> Response {
        panic!("handler exploded")
    }

    fn request() -> Request {
        http::Request::builder()
            .uri("/boom")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_passes_through_normal_responses() {
        let recovery = RecoveryMiddleware::new();
        let mut ctx = MiddlewareContext::new("/boom", RouteMethod::Get);
        let next = Next::handler(|_ctx, _req| {
            Box::pin(async { Response::empty(StatusCode::ACCEPTED) })
        });

        let response = Next::new(&recovery, next).run(&mut ctx, request()).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_panic_in_handler_future_becomes_500() {
        let recovery = RecoveryMiddleware::new();
        let mut ctx = MiddlewareContext::new("/boom", RouteMethod::Get);
        let next = Next::handler(|_ctx, _req| Box::pin(async { explode() }));

        let response = Next::new(&recovery, next).run(&mut ctx, request()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from("Internal Server Error\n"));
    }

    #[tokio::test]
    async fn test_panic_while_building_future_becomes_500() {
        let recovery = RecoveryMiddleware::new();
        let mut ctx = MiddlewareContext::new("/boom", RouteMethod::Get);
        let next = Next::handler(|_ctx, _req| panic!("synchronous failure"));

        let response = Next::new(&recovery, next).run(&mut ctx, request()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
