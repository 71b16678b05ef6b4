//! Request dispatch over composed chains.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use hermes_core::{ConfigError, ConfigResult, Request, Response, ResponseExt};
use hermes_middleware::{Chain, CorsConfig, CorsMiddleware};
use hermes_router::{MethodRouter, PathParams, PathTemplate, RouteTable};
use http::{Method, StatusCode};

/// Body of every 404 produced by the dispatcher.
pub const NOT_FOUND_MESSAGE: &str = "404 page not found";

type Chains = MethodRouter<Arc<Chain>>;

#[derive(Debug)]
struct TemplatedRoute {
    template: PathTemplate,
    chains: Chains,
}

/// Frozen mapping from pattern to per-method chains.
///
/// Patterns without `{name}` segments are looked up by exact path. Other
/// patterns are matched segment by segment; when several match, literal
/// segments win over parameters from left to right. The captured
/// [`PathParams`] are stored in the request extensions.
///
/// A path that matches no pattern and a matching pattern without a chain
/// for the request method both answer 404. An `OPTIONS` request on a
/// matching pattern runs through the pattern's first chain so the
/// cross-origin stage can answer the preflight.
#[derive(Debug)]
pub struct Dispatcher {
    exact: HashMap<String, Chains>,
    templated: Vec<TemplatedRoute>,
}

impl Dispatcher {
    /// Composes one chain per registration of `table`.
    ///
    /// All chains share a single cross-origin stage built from `cors`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateRoute`] when a (pattern, method) pair
    /// was registered more than once.
    pub fn build(table: &RouteTable, cors: CorsConfig) -> ConfigResult<Self> {
        let cors = Arc::new(CorsMiddleware::new(cors));
        let mut exact = HashMap::new();
        let mut templated = Vec::new();

        for (pattern, registrations) in table.iter() {
            let mut chains = MethodRouter::new();
            for registration in registrations {
                let chain = Chain::compose(
                    pattern,
                    registration.method(),
                    Arc::clone(registration.handler()),
                    registration.steps(),
                    Arc::clone(&cors),
                );
                if chains.insert(registration.method(), Arc::new(chain)).is_err() {
                    return Err(ConfigError::DuplicateRoute {
                        pattern: pattern.to_string(),
                        method: registration.method(),
                    });
                }
            }

            let template = PathTemplate::parse(pattern);
            if template.is_static() {
                exact.insert(pattern.to_string(), chains);
            } else {
                templated.push(TemplatedRoute { template, chains });
            }
        }

        tracing::info!(
            exact = exact.len(),
            templated = templated.len(),
            "Route chains built"
        );
        Ok(Self { exact, templated })
    }

    fn route(&self, path: &str) -> Option<(&Chains, PathParams)> {
        if let Some(chains) = self.exact.get(path) {
            return Some((chains, PathParams::default()));
        }

        let mut best: Option<(&TemplatedRoute, PathParams)> = None;
        for route in &self.templated {
            let Some(params) = route.template.matches(path) else {
                continue;
            };
            let better = match &best {
                Some((current, _)) => {
                    route.template.specificity(&current.template) == Ordering::Greater
                }
                None => true,
            };
            if better {
                best = Some((route, params));
            }
        }
        best.map(|(route, params)| (&route.chains, params))
    }

    fn select<'a>(chains: &'a Chains, method: &Method) -> Option<&'a Arc<Chain>> {
        match chains.get_http(method) {
            Some(chain) => Some(chain),
            None if *method == Method::OPTIONS => chains.first(),
            None => None,
        }
    }

    /// Finds the chain serving `method` on `path`.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&Arc<Chain>> {
        let (chains, _) = self.route(path)?;
        Self::select(chains, method)
    }

    /// Runs `request` through its chain, or answers 404.
    pub async fn dispatch(&self, mut request: Request) -> Response {
        let matched = self
            .route(request.uri().path())
            .and_then(|(chains, params)| {
                Self::select(chains, request.method()).map(|chain| (chain, params))
            });

        match matched {
            Some((chain, params)) => {
                if !params.is_empty() {
                    request.extensions_mut().insert(params);
                }
                chain.call(request).await
            }
            None => {
                tracing::debug!(
                    method = %request.method(),
                    path = %request.uri().path(),
                    "No route matched"
                );
                Response::error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
            }
        }
    }

    /// Returns `true` if `pattern` was registered.
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.exact.contains_key(pattern)
            || self
                .templated
                .iter()
                .any(|route| route.template.pattern() == pattern)
    }

    /// Number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.templated.len()
    }

    /// Returns `true` if no pattern is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.templated.is_empty()
    }
}
