//! The HTTP server.
//!
//! [`Server`] owns the route table while routes are registered. Starting it
//! freezes the table into a [`Dispatcher`], binds the listener and serves
//! every connection with hyper's HTTP/1 implementation until the shutdown
//! signal fires.
//!
//! # Example
//!
//! ```rust,no_run
//! use hermes_core::{Response, ResponseExt};
//! use hermes_i18n::LocalizationConfig;
//! use hermes_router::RouteOptions;
//! use hermes_server::{Server, ServerConfig};
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let localization = LocalizationConfig::builder()
//!         .enable_translations()
//!         .translation_file("en", "locales/en.json")
//!         .default_language("en")
//!         .build();
//!
//!     let mut server = Server::new(ServerConfig::default(), &localization)?;
//!     server.get(
//!         "/login",
//!         |_req| async { Ok(Response::error(StatusCode::OK, "login")) },
//!         RouteOptions::new(),
//!     );
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use hermes_core::{
    handler_fn, BoxedHandler, ConfigResult, HandlerResult, Request, Response, ResponseExt,
    RouteMethod,
};
use hermes_docs::OpenApiGenerator;
use hermes_i18n::{LocalizationConfig, Localizer};
use hermes_middleware::CorsConfig;
use hermes_router::{RouteOptions, RouteTable};
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::ServerError;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// A localized HTTP server.
pub struct Server {
    config: ServerConfig,
    localizer: Arc<Localizer>,
    routes: RouteTable,
    cors: Option<CorsConfig>,
}

impl Server {
    /// Creates a server, loading every configured translation file.
    ///
    /// # Errors
    ///
    /// Fails when a translation file cannot be loaded or, with localization
    /// enabled, when the default language is unset or not loaded.
    pub fn new(config: ServerConfig, localization: &LocalizationConfig) -> ConfigResult<Self> {
        let localizer = Arc::new(Localizer::from_config(localization)?);
        tracing::info!(
            localized = localizer.is_enabled(),
            languages = localizer.store().len(),
            "Localization configured"
        );
        Ok(Self {
            config,
            routes: RouteTable::new(Arc::clone(&localizer)),
            localizer,
            cors: None,
        })
    }

    /// Uses `cors` instead of reading the policy from the environment.
    #[must_use]
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = Some(cors);
        self
    }

    /// The shared localizer, for handlers that need translations.
    #[must_use]
    pub fn localizer(&self) -> Arc<Localizer> {
        Arc::clone(&self.localizer)
    }

    /// The routes registered so far.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The transport configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Registers a localized route.
    pub fn route(
        &mut self,
        method: RouteMethod,
        pattern: &str,
        handler: BoxedHandler,
        options: RouteOptions,
    ) -> &mut Self {
        self.routes.register(method, pattern, handler, options);
        self
    }

    /// Registers a route that is never fanned out per language.
    pub fn route_unlocalized(
        &mut self,
        method: RouteMethod,
        pattern: &str,
        handler: BoxedHandler,
        options: RouteOptions,
    ) -> &mut Self {
        self.routes
            .register_unlocalized(method, pattern, handler, options);
        self
    }

    /// Registers a localized GET route.
    pub fn get<F, Fut>(&mut self, pattern: &str, handler: F, options: RouteOptions) -> &mut Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(RouteMethod::Get, pattern, handler_fn(handler), options)
    }

    /// Registers a localized POST route.
    pub fn post<F, Fut>(&mut self, pattern: &str, handler: F, options: RouteOptions) -> &mut Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(RouteMethod::Post, pattern, handler_fn(handler), options)
    }

    /// Registers a localized PUT route.
    pub fn put<F, Fut>(&mut self, pattern: &str, handler: F, options: RouteOptions) -> &mut Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(RouteMethod::Put, pattern, handler_fn(handler), options)
    }

    /// Registers a localized DELETE route.
    pub fn delete<F, Fut>(&mut self, pattern: &str, handler: F, options: RouteOptions) -> &mut Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(RouteMethod::Delete, pattern, handler_fn(handler), options)
    }

    /// Registers an unlocalized GET route.
    pub fn get_unlocalized<F, Fut>(
        &mut self,
        pattern: &str,
        handler: F,
        options: RouteOptions,
    ) -> &mut Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route_unlocalized(RouteMethod::Get, pattern, handler_fn(handler), options)
    }

    /// Registers an unlocalized POST route.
    pub fn post_unlocalized<F, Fut>(
        &mut self,
        pattern: &str,
        handler: F,
        options: RouteOptions,
    ) -> &mut Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route_unlocalized(RouteMethod::Post, pattern, handler_fn(handler), options)
    }

    /// Registers an unlocalized PUT route.
    pub fn put_unlocalized<F, Fut>(
        &mut self,
        pattern: &str,
        handler: F,
        options: RouteOptions,
    ) -> &mut Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route_unlocalized(RouteMethod::Put, pattern, handler_fn(handler), options)
    }

    /// Registers an unlocalized DELETE route.
    pub fn delete_unlocalized<F, Fut>(
        &mut self,
        pattern: &str,
        handler: F,
        options: RouteOptions,
    ) -> &mut Self
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route_unlocalized(RouteMethod::Delete, pattern, handler_fn(handler), options)
    }

    /// Freezes the routes into a dispatcher.
    ///
    /// Without an explicit policy the CORS settings are read from the
    /// environment.
    ///
    /// # Errors
    ///
    /// Fails on duplicate (pattern, method) registrations or when the CORS
    /// policy is not configured in production.
    pub fn dispatcher(&self) -> Result<Dispatcher, ServerError> {
        let cors = match &self.cors {
            Some(cors) => cors.clone(),
            None => CorsConfig::from_env()?,
        };
        Ok(Dispatcher::build(&self.routes, cors)?)
    }

    /// Writes the OpenAPI document for the registered routes to `path`,
    /// advertising `http://localhost:<port>` as the server.
    pub fn write_openapi(&self, path: impl AsRef<Path>, port: u16) -> Result<(), ServerError> {
        OpenApiGenerator::new()
            .local_server(port)
            .write(&self.routes, path.as_ref())?;
        Ok(())
    }

    /// Runs until SIGINT or SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals())
            .await
    }

    /// Runs until `shutdown` is triggered.
    ///
    /// Configuration errors are reported before the listener is bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let dispatcher = self.dispatcher()?;
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                source,
            })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        accept_loop(
            listener,
            Arc::new(dispatcher),
            shutdown,
            self.config.shutdown_timeout(),
        )
        .await;
        Ok(())
    }

    /// Serves on an already bound listener until `shutdown` is triggered.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let dispatcher = self.dispatcher()?;
        accept_loop(
            listener,
            Arc::new(dispatcher),
            shutdown,
            self.config.shutdown_timeout(),
        )
        .await;
        Ok(())
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("patterns", &self.routes.len())
            .field("cors", &self.cors)
            .finish_non_exhaustive()
    }
}

async fn accept_loop(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    shutdown: ShutdownSignal,
    shutdown_timeout: Duration,
) {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(addr = %addr, patterns = dispatcher.len(), "Server listening");
    }

    let tracker = ConnectionTracker::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, remote_addr)) => {
                    let dispatcher = Arc::clone(&dispatcher);
                    let shutdown = shutdown.clone();
                    let token = tracker.acquire();
                    tokio::spawn(async move {
                        if let Err(error) =
                            serve_connection(dispatcher, stream, remote_addr, shutdown).await
                        {
                            tracing::debug!(
                                remote = %remote_addr,
                                error = %error,
                                "Connection error"
                            );
                        }
                        drop(token);
                    });
                }
                Err(error) => tracing::error!(error = %error, "Failed to accept connection"),
            },
            () = shutdown.recv() => {
                tracing::info!("Shutdown signal received, no longer accepting connections");
                break;
            }
        }
    }

    tracing::info!(
        timeout_secs = shutdown_timeout.as_secs(),
        active = tracker.active_connections(),
        "Waiting for open connections"
    );
    tokio::select! {
        () = tracker.wait_idle() => tracing::info!("All connections closed"),
        () = tokio::time::sleep(shutdown_timeout) => tracing::warn!(
            active = tracker.active_connections(),
            "Shutdown timeout reached with connections still open"
        ),
    }
    tracing::info!("Server stopped");
}

async fn serve_connection(
    dispatcher: Arc<Dispatcher>,
    stream: TcpStream,
    remote_addr: SocketAddr,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let service = service_fn(move |request: http::Request<Incoming>| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { Ok::<_, Infallible>(handle_request(&dispatcher, request).await) }
    });

    let connection = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    tokio::select! {
        result = connection.as_mut() => result,
        () = shutdown.recv() => {
            tracing::debug!(remote = %remote_addr, "Closing connection for shutdown");
            connection.as_mut().graceful_shutdown();
            connection.await
        }
    }
}

async fn handle_request(dispatcher: &Dispatcher, request: http::Request<Incoming>) -> Response {
    let started = Instant::now();
    let (parts, body) = request.into_parts();
    let body: Bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(error) => {
            tracing::warn!(error = %error, "Failed to read request body");
            return Response::error(StatusCode::BAD_REQUEST, "Bad Request");
        }
    };

    let method = parts.method.clone();
    let path = parts.uri.path().to_string();
    let response = dispatcher
        .dispatch(http::Request::from_parts(parts, Full::new(body)))
        .await;

    tracing::debug!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Request served"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn translations() -> (tempfile::TempDir, LocalizationConfig) {
        let dir = tempfile::tempdir().unwrap();
        for (code, title) in [("en", "Login"), ("de", "Anmelden")] {
            let mut file = std::fs::File::create(dir.path().join(format!("{code}.json"))).unwrap();
            write!(file, r#"{{"title": "{title}"}}"#).unwrap();
        }
        let config = LocalizationConfig::builder()
            .enable_translations()
            .translation_file("en", dir.path().join("en.json"))
            .translation_file("de", dir.path().join("de.json"))
            .default_language("en")
            .build();
        (dir, config)
    }

    fn login_server() -> (tempfile::TempDir, Server) {
        let (dir, localization) = translations();
        let mut server = Server::new(ServerConfig::default(), &localization)
            .unwrap()
            .with_cors(CorsConfig::allow_any());
        let localizer = server.localizer();
        server
            .get(
                "/login",
                move |req| {
                    let localizer = Arc::clone(&localizer);
                    async move {
                        let title = localizer.translate(&req, "title").to_string();
                        Ok(Response::error(StatusCode::OK, &title))
                    }
                },
                RouteOptions::new(),
            )
            .get_unlocalized(
                "/health",
                |_req| async { Ok(Response::error(StatusCode::OK, "ok")) },
                RouteOptions::new(),
            );
        (dir, server)
    }

    async fn roundtrip(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_new_fails_without_default_language() {
        let localization = LocalizationConfig::builder().enable_translations().build();
        let err = Server::new(ServerConfig::default(), &localization).unwrap_err();
        assert!(matches!(err, hermes_core::ConfigError::DefaultLanguageUnset));
    }

    #[test]
    fn test_registration_fans_out() {
        let (_dir, server) = login_server();
        assert_eq!(
            server.routes().patterns().collect::<Vec<_>>(),
            ["/login", "/en/login", "/de/login", "/health"]
        );
    }

    #[test]
    fn test_duplicate_surfaces_from_dispatcher() {
        let (_dir, mut server) = login_server();
        server.get_unlocalized(
            "/health",
            |_req| async { Ok(Response::empty(StatusCode::OK)) },
            RouteOptions::new(),
        );
        assert!(matches!(
            server.dispatcher().unwrap_err(),
            ServerError::Config(hermes_core::ConfigError::DuplicateRoute { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_address() {
        let server = Server::new(
            ServerConfig::builder().http_addr("localhost").build(),
            &LocalizationConfig::disabled(),
        )
        .unwrap()
        .with_cors(CorsConfig::allow_any());

        let err = server
            .run_with_shutdown(ShutdownSignal::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidAddress { .. }));
    }

    #[test]
    fn test_write_openapi() {
        let (dir, server) = login_server();
        let path = dir.path().join("openapi.json");
        server.write_openapi(&path, 8080).unwrap();

        let document: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document["servers"][0]["url"], "http://localhost:8080");
        assert!(document["paths"]["/de/login"]["get"].is_object());
    }

    #[tokio::test]
    async fn test_serves_over_tcp_and_shuts_down() {
        let (_dir, server) = login_server();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = ShutdownSignal::new();
        let running = tokio::spawn(server.serve(listener, shutdown.clone()));

        let response = roundtrip(
            addr,
            "GET /login HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 302"));
        assert!(response.to_ascii_lowercase().contains("location: /en/login"));

        let response = roundtrip(
            addr,
            "GET /de/login HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("Anmelden\n"));

        let response = roundtrip(
            addr,
            "GET /fr/login HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 404"));

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), running)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
