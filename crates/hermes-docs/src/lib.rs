//! # Hermes Docs
//!
//! OpenAPI 3.1 export of a Hermes [`RouteTable`](hermes_router::RouteTable).
//!
//! Every pattern becomes one path item and every registration one
//! operation. Operation ids are numbered in registration order. Path
//! parameters named in `{braces}` are documented automatically unless the
//! route declares a parameter of the same name.
//!
//! ```rust
//! use std::sync::Arc;
//! use hermes_core::{handler_fn, Response, ResponseExt, RouteMethod};
//! use hermes_docs::OpenApiGenerator;
//! use hermes_i18n::Localizer;
//! use hermes_router::{RouteOptions, RouteTable};
//! use http::StatusCode;
//!
//! let mut table = RouteTable::new(Arc::new(Localizer::disabled()));
//! let handler = handler_fn(|_req| async { Ok(Response::empty(StatusCode::OK)) });
//! let options = RouteOptions::new().response(200, "OK");
//! table.register(RouteMethod::Get, "/users/{id}", handler, options);
//!
//! let spec = OpenApiGenerator::new().local_server(8080).generate(&table);
//! assert_eq!(spec.openapi, "3.1.0");
//! assert_eq!(spec.servers[0].url, "http://localhost:8080");
//! assert!(spec.paths["/users/{id}"].get.is_some());
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-docs/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod openapi;

pub use error::{DocsError, DocsResult};
pub use openapi::{
    path_parameters, Info, OpenApi, OpenApiGenerator, Operation, Parameter, PathItem,
    ResponseObject, ServerObject, OPENAPI_VERSION,
};
