//! The route table and language fan-out.

use std::sync::Arc;

use hermes_core::{BoxedHandler, RouteMethod};
use hermes_i18n::Localizer;
use indexmap::IndexMap;

use crate::route::{MethodRegistration, RouteOptions};

/// Insertion-ordered mapping from pattern to registrations.
///
/// Append-only while the server is being set up. Duplicate
/// (pattern, method) pairs are accepted here and rejected when chains are
/// built.
#[derive(Debug)]
pub struct RouteTable {
    routes: IndexMap<String, Vec<MethodRegistration>>,
    localizer: Arc<Localizer>,
}

impl RouteTable {
    /// Creates an empty table fanning out over the languages of `localizer`.
    #[must_use]
    pub fn new(localizer: Arc<Localizer>) -> Self {
        Self {
            routes: IndexMap::new(),
            localizer,
        }
    }

    /// The localizer used for fan-out and canonical redirects.
    #[must_use]
    pub fn localizer(&self) -> &Arc<Localizer> {
        &self.localizer
    }

    /// Registers `handler` for (`pattern`, `method`).
    ///
    /// With localization enabled this stores a redirecting canonical entry
    /// under `pattern` and the handler under `/<code><pattern>` for every
    /// loaded language, in load order. Otherwise it behaves like
    /// [`register_unlocalized`](Self::register_unlocalized).
    pub fn register(
        &mut self,
        method: RouteMethod,
        pattern: &str,
        handler: BoxedHandler,
        options: RouteOptions,
    ) {
        if !self.localizer.is_enabled() {
            self.register_unlocalized(method, pattern, handler, options);
            return;
        }

        let (meta, steps) = options.into_parts();
        let meta = Arc::new(meta);
        let steps: Arc<[_]> = steps.into();

        let canonical = MethodRegistration::new(
            method,
            Arc::clone(&steps),
            self.localizer.redirect_handler(),
            Arc::clone(&meta),
        );
        self.push(pattern.to_string(), canonical);

        let variants: Vec<String> = self
            .localizer
            .languages()
            .map(|code| format!("/{code}{pattern}"))
            .collect();
        for variant in variants {
            let registration = MethodRegistration::new(
                method,
                Arc::clone(&steps),
                Arc::clone(&handler),
                Arc::clone(&meta),
            );
            self.push(variant, registration);
        }
    }

    /// Registers exactly one entry for (`pattern`, `method`), ignoring
    /// localization.
    pub fn register_unlocalized(
        &mut self,
        method: RouteMethod,
        pattern: &str,
        handler: BoxedHandler,
        options: RouteOptions,
    ) {
        let (meta, steps) = options.into_parts();
        let registration = MethodRegistration::new(method, steps.into(), handler, Arc::new(meta));
        self.push(pattern.to_string(), registration);
    }

    fn push(&mut self, pattern: String, registration: MethodRegistration) {
        tracing::debug!(
            pattern = %pattern,
            method = %registration.method(),
            "Registered route"
        );
        self.routes.entry(pattern).or_default().push(registration);
    }

    /// Patterns in first-registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Registrations of a pattern, in registration order.
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<&[MethodRegistration]> {
        self.routes.get(pattern).map(Vec::as_slice)
    }

    /// All patterns with their registrations.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MethodRegistration])> {
        self.routes
            .iter()
            .map(|(pattern, registrations)| (pattern.as_str(), registrations.as_slice()))
    }

    /// Number of distinct patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use hermes_core::{handler_fn, Request, Response, ResponseExt};
    use hermes_i18n::TranslationStore;
    use hermes_middleware::MethodGuard;
    use http::{header::LOCATION, StatusCode};
    use http_body_util::Full;

    fn localizer(enabled: bool) -> Arc<Localizer> {
        let mut store = TranslationStore::new().with_default_language("en");
        store.insert("en", [("title", "Login")]);
        store.insert("de", [("title", "Anmelden")]);
        Arc::new(Localizer::from_store(store, enabled, false))
    }

    fn teapot() -> BoxedHandler {
        handler_fn(|_req| async { Ok(Response::empty(StatusCode::IM_A_TEAPOT)) })
    }

    fn request(uri: &str) -> Request {
        http::Request::builder()
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_fan_out_in_language_order() {
        let mut table = RouteTable::new(localizer(true));
        table.register(RouteMethod::Post, "/login", teapot(), RouteOptions::new());

        assert_eq!(
            table.patterns().collect::<Vec<_>>(),
            ["/login", "/en/login", "/de/login"]
        );
        for (_, registrations) in table.iter() {
            assert_eq!(registrations.len(), 1);
            assert_eq!(registrations[0].method(), RouteMethod::Post);
        }
    }

    #[test]
    fn test_fan_out_shares_steps_and_meta() {
        let mut table = RouteTable::new(localizer(true));
        let options = RouteOptions::new()
            .summary("Login")
            .middleware(MethodGuard::new(RouteMethod::Get));
        table.register(RouteMethod::Get, "/login", teapot(), options);

        let canonical = &table.get("/login").unwrap()[0];
        let german = &table.get("/de/login").unwrap()[0];
        assert!(Arc::ptr_eq(canonical.meta(), german.meta()));
        assert!(Arc::ptr_eq(canonical.shared_steps(), german.shared_steps()));
        assert_eq!(german.steps().len(), 1);
        assert_eq!(german.meta().summary(), "Login");
    }

    #[tokio::test]
    async fn test_canonical_redirects_and_variants_handle() {
        let mut table = RouteTable::new(localizer(true));
        table.register(RouteMethod::Get, "/login", teapot(), RouteOptions::new());

        let canonical = table.get("/login").unwrap()[0].handler().clone();
        let response = canonical(request("/login")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/en/login");

        let variant = table.get("/en/login").unwrap()[0].handler().clone();
        let response = variant(request("/en/login")).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[test]
    fn test_disabled_localization_registers_once() {
        let mut table = RouteTable::new(localizer(false));
        table.register(RouteMethod::Get, "/login", teapot(), RouteOptions::new());
        assert_eq!(table.patterns().collect::<Vec<_>>(), ["/login"]);
    }

    #[test]
    fn test_unlocalized_registers_once() {
        let mut table = RouteTable::new(localizer(true));
        table.register_unlocalized(RouteMethod::Get, "/health", teapot(), RouteOptions::new());
        assert_eq!(table.len(), 1);
        assert!(table.get("/en/health").is_none());
    }

    #[test]
    fn test_methods_accumulate_per_pattern() {
        let mut table = RouteTable::new(localizer(true));
        table.register(RouteMethod::Get, "/login", teapot(), RouteOptions::new());
        table.register(RouteMethod::Post, "/login", teapot(), RouteOptions::new());

        assert_eq!(table.len(), 3);
        let methods: Vec<_> = table
            .get("/de/login")
            .unwrap()
            .iter()
            .map(MethodRegistration::method)
            .collect();
        assert_eq!(methods, [RouteMethod::Get, RouteMethod::Post]);
    }

    #[test]
    fn test_duplicates_are_kept_for_later_rejection() {
        let mut table = RouteTable::new(localizer(false));
        table.register(RouteMethod::Get, "/login", teapot(), RouteOptions::new());
        table.register(RouteMethod::Get, "/login", teapot(), RouteOptions::new());
        assert_eq!(table.get("/login").unwrap().len(), 2);
    }
}
