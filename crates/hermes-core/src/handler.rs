//! Terminal handler types.
//!
//! A handler is the last step of a chain: it receives the request once
//! every middleware has let it through and produces the response.
//! Handlers that need translations capture an `Arc<Localizer>` (or any
//! other dependency) in their closure; there is no ambient server state.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::types::{Request, Response};

/// A boxed future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Output of a handler.
pub type HandlerResult = Result<Response, HandlerError>;

/// A type-erased, shareable handler.
pub type BoxedHandler = Arc<dyn Fn(Request) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Erases an async function or closure into a [`BoxedHandler`].
///
/// # Example
///
/// ```
/// use hermes_core::{handler_fn, Response, ResponseExt};
/// use http::StatusCode;
///
/// let handler = handler_fn(|_req| async { Ok(Response::empty(StatusCode::NO_CONTENT)) });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |request| Box::pin(f(request)))
}
