//! Route options, documentation metadata and registrations.

use std::sync::Arc;

use hermes_core::{BoxedHandler, RouteMethod};
use hermes_middleware::Middleware;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Where a documented parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// A `{name}` segment of the path.
    Path,
    /// A query string parameter.
    Query,
    /// A request header.
    Header,
    /// A cookie.
    Cookie,
}

/// A documented route parameter.
///
/// Parameters only feed the OpenAPI export; they are not validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Whether the parameter is required.
    pub required: bool,
    /// JSON schema of the value.
    pub schema: serde_json::Value,
    /// Human readable description.
    pub description: String,
}

impl Param {
    /// Creates a parameter with a string schema.
    ///
    /// Path parameters are required; others are optional until
    /// [`required`](Self::required) says otherwise.
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParamLocation) -> Self {
        Self {
            name: name.into(),
            location,
            required: location == ParamLocation::Path,
            schema: serde_json::json!({ "type": "string" }),
            description: String::new(),
        }
    }

    /// Shortcut for a path parameter.
    #[must_use]
    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ParamLocation::Path)
    }

    /// Shortcut for a query parameter.
    #[must_use]
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, ParamLocation::Query)
    }

    /// Shortcut for a header parameter.
    #[must_use]
    pub fn header(name: impl Into<String>) -> Self {
        Self::new(name, ParamLocation::Header)
    }

    /// Sets whether the parameter is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the JSON schema.
    #[must_use]
    pub fn schema(mut self, schema: serde_json::Value) -> Self {
        self.schema = schema;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A documented response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDoc {
    /// Human readable description.
    pub description: String,
}

/// Documentation metadata of a registration. No runtime behavior.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteMeta {
    summary: String,
    description: String,
    tags: Vec<String>,
    params: Vec<Param>,
    responses: IndexMap<String, ResponseDoc>,
}

impl RouteMeta {
    /// Short summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Long description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Explicitly declared parameters, in declaration order.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Declared responses keyed by status code.
    #[must_use]
    pub fn responses(&self) -> &IndexMap<String, ResponseDoc> {
        &self.responses
    }
}

/// Per-registration options: middleware and documentation.
///
/// # Example
///
/// ```rust
/// use hermes_router::{Param, RouteOptions};
///
/// let options = RouteOptions::new()
///     .summary("Sign in")
///     .tags(["auth"])
///     .param(Param::query("next").description("Where to go afterwards"))
///     .response(200, "Signed in")
///     .response(401, "Bad credentials");
///
/// assert_eq!(options.meta().summary(), "Sign in");
/// assert_eq!(options.meta().responses().len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct RouteOptions {
    meta: RouteMeta,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl RouteOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the summary.
    #[must_use]
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.meta.summary = summary.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = description.into();
        self
    }

    /// Replaces the tags.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a middleware; middleware runs in the order added.
    #[must_use]
    pub fn middleware<M: Middleware>(self, middleware: M) -> Self {
        self.middleware_arc(Arc::new(middleware))
    }

    /// Appends an already shared middleware.
    #[must_use]
    pub fn middleware_arc(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Appends a documented parameter.
    #[must_use]
    pub fn param(mut self, param: Param) -> Self {
        self.meta.params.push(param);
        self
    }

    /// Declares a response. Declaring the same code again replaces it.
    #[must_use]
    pub fn response(mut self, code: u16, description: impl Into<String>) -> Self {
        self.meta.responses.insert(
            code.to_string(),
            ResponseDoc {
                description: description.into(),
            },
        );
        self
    }

    /// The documentation collected so far.
    #[must_use]
    pub fn meta(&self) -> &RouteMeta {
        &self.meta
    }

    pub(crate) fn into_parts(self) -> (RouteMeta, Vec<Arc<dyn Middleware>>) {
        (self.meta, self.middleware)
    }
}

impl std::fmt::Debug for RouteOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteOptions")
            .field("meta", &self.meta)
            .field(
                "middleware",
                &self.middleware.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// One (method, steps, handler, metadata) entry of the route table.
///
/// Entries produced by one fan-out share `steps` and `meta`.
#[derive(Clone)]
pub struct MethodRegistration {
    method: RouteMethod,
    steps: Arc<[Arc<dyn Middleware>]>,
    handler: BoxedHandler,
    meta: Arc<RouteMeta>,
}

impl MethodRegistration {
    /// Creates a registration.
    pub fn new(
        method: RouteMethod,
        steps: Arc<[Arc<dyn Middleware>]>,
        handler: BoxedHandler,
        meta: Arc<RouteMeta>,
    ) -> Self {
        Self {
            method,
            steps,
            handler,
            meta,
        }
    }

    /// The registered method.
    #[must_use]
    pub fn method(&self) -> RouteMethod {
        self.method
    }

    /// The route's own middleware, in order.
    #[must_use]
    pub fn steps(&self) -> &[Arc<dyn Middleware>] {
        &self.steps
    }

    /// The shared step list.
    #[must_use]
    pub fn shared_steps(&self) -> &Arc<[Arc<dyn Middleware>]> {
        &self.steps
    }

    /// The terminal handler.
    #[must_use]
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    /// Documentation metadata.
    #[must_use]
    pub fn meta(&self) -> &Arc<RouteMeta> {
        &self.meta
    }
}

impl std::fmt::Debug for MethodRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistration")
            .field("method", &self.method)
            .field(
                "steps",
                &self.steps.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}
