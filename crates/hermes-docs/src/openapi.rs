//! OpenAPI document types and generation.
//!
//! The types cover the subset of OpenAPI 3.1 that route registrations can
//! describe: summaries, tags, parameters and declared responses.
//! <https://spec.openapis.org/oas/v3.1.0>

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use hermes_core::RouteMethod;
use hermes_router::{Param, ParamLocation, RouteMeta, RouteTable};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DocsError, DocsResult};

/// OpenAPI version emitted by the generator.
pub const OPENAPI_VERSION: &str = "3.1.0";

/// OpenAPI document root object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApi {
    /// OpenAPI version.
    pub openapi: String,
    /// API metadata.
    pub info: Info,
    /// Available servers.
    #[serde(default)]
    pub servers: Vec<ServerObject>,
    /// API paths and operations.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

/// API metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
}

/// Server information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerObject {
    /// Server URL.
    pub url: String,
}

/// Operations for a single path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathItem {
    /// GET operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    /// POST operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    /// PUT operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    /// DELETE operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
}

impl PathItem {
    /// Returns the operation for `method`.
    #[must_use]
    pub fn operation(&self, method: RouteMethod) -> Option<&Operation> {
        match method {
            RouteMethod::Get => self.get.as_ref(),
            RouteMethod::Post => self.post.as_ref(),
            RouteMethod::Put => self.put.as_ref(),
            RouteMethod::Delete => self.delete.as_ref(),
        }
    }

    fn slot_mut(&mut self, method: RouteMethod) -> &mut Option<Operation> {
        match method {
            RouteMethod::Get => &mut self.get,
            RouteMethod::Post => &mut self.post,
            RouteMethod::Put => &mut self.put,
            RouteMethod::Delete => &mut self.delete,
        }
    }
}

/// An API operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Sequential operation identifier.
    #[serde(rename = "operationId")]
    pub operation_id: String,
    /// Short summary.
    #[serde(default)]
    pub summary: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Tags for grouping.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Parameters: path template parameters first, then declared ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Declared responses keyed by status code.
    pub responses: IndexMap<String, ResponseObject>,
    /// Security requirements.
    #[serde(default)]
    pub security: Vec<HashMap<String, Vec<String>>>,
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParamLocation,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Whether required.
    #[serde(default)]
    pub required: bool,
    /// Parameter schema.
    pub schema: serde_json::Value,
}

impl From<&Param> for Parameter {
    fn from(param: &Param) -> Self {
        Self {
            name: param.name.clone(),
            location: param.location,
            description: param.description.clone(),
            required: param.required,
            schema: param.schema.clone(),
        }
    }
}

/// Response definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseObject {
    /// Description.
    pub description: String,
}

/// Builds [`OpenApi`] documents from a route table.
#[derive(Debug, Clone)]
pub struct OpenApiGenerator {
    title: String,
    version: String,
    servers: Vec<ServerObject>,
}

impl Default for OpenApiGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenApiGenerator {
    /// Creates a generator with a placeholder title and version `1.0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "Hermes API".to_string(),
            version: "1.0".to_string(),
            servers: Vec::new(),
        }
    }

    /// Sets the API title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the API version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds a server.
    #[must_use]
    pub fn server(mut self, url: impl Into<String>) -> Self {
        self.servers.push(ServerObject { url: url.into() });
        self
    }

    /// Adds `http://localhost:<port>` as a server.
    #[must_use]
    pub fn local_server(self, port: u16) -> Self {
        self.server(format!("http://localhost:{port}"))
    }

    /// Generates the document.
    ///
    /// Operation ids count up from `1` across all patterns, in table order.
    #[must_use]
    pub fn generate(&self, table: &RouteTable) -> OpenApi {
        let mut paths: IndexMap<String, PathItem> = IndexMap::new();
        let mut next_id = 1_usize;

        for (pattern, registrations) in table.iter() {
            let item = paths.entry(pattern.to_string()).or_default();
            for registration in registrations {
                let operation = convert_operation(pattern, registration.meta(), next_id);
                next_id += 1;

                let slot = item.slot_mut(registration.method());
                if slot.is_some() {
                    tracing::warn!(
                        pattern,
                        method = %registration.method(),
                        "Duplicate registration, keeping the later operation"
                    );
                }
                *slot = Some(operation);
            }
        }

        OpenApi {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: self.title.clone(),
                version: self.version.clone(),
            },
            servers: self.servers.clone(),
            paths,
        }
    }

    /// Generates the document as pretty-printed JSON.
    pub fn generate_json(&self, table: &RouteTable) -> DocsResult<String> {
        let spec = self.generate(table);
        serde_json::to_string_pretty(&spec).map_err(DocsError::from)
    }

    /// Generates the document and writes it to `path`.
    pub fn write(&self, table: &RouteTable, path: &Path) -> DocsResult<()> {
        let json = self.generate_json(table)?;
        std::fs::write(path, json).map_err(|source| DocsError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Wrote OpenAPI document");
        Ok(())
    }
}

fn convert_operation(pattern: &str, meta: &RouteMeta, id: usize) -> Operation {
    let declared = meta.params();
    let mut parameters: Vec<Parameter> = path_parameters(pattern)
        .into_iter()
        .filter(|name| !declared.iter().any(|param| &param.name == name))
        .map(|name| Parameter::from(&Param::path(name)))
        .collect();
    parameters.extend(declared.iter().map(Parameter::from));

    Operation {
        operation_id: id.to_string(),
        summary: meta.summary().to_string(),
        description: meta.description().to_string(),
        tags: meta.tags().to_vec(),
        parameters,
        responses: meta
            .responses()
            .iter()
            .map(|(code, response)| {
                (
                    code.clone(),
                    ResponseObject {
                        description: response.description.clone(),
                    },
                )
            })
            .collect(),
        security: Vec::new(),
    }
}

/// Extracts `{name}` parameter names from a path template, in order.
pub fn path_parameters(pattern: &str) -> Vec<String> {
    static PARAM_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PARAM_REGEX.get_or_init(|| Regex::new(r"\{([^}]*)\}").expect("valid regex"));

    regex
        .captures_iter(pattern)
        .filter_map(|cap| cap.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}
