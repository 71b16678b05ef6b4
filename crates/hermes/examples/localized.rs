//! Localized login demo.
//!
//! ```text
//! cargo run -p hermes --example localized
//! curl -i localhost:8080/login                       # 302 → /en/login
//! curl -i -H 'Accept-Language: de' localhost:8080/login   # 302 → /de/login
//! curl localhost:8080/de/login
//! ```
//!
//! Settings are read from the environment (a `.env` file is honored):
//! `HERMES_ADDR`, `ALLOWED_ORIGINS`, `APP_ENV`, `RUST_LOG`.

use std::path::PathBuf;
use std::sync::Arc;

use hermes::prelude::*;
use hermes::telemetry::{init_logging, LogConfig};

fn locales_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("examples/locales")
}

fn timing() -> Arc<dyn Middleware> {
    Arc::new(FnMiddleware::new("timing", |ctx, request, next| {
        Box::pin(async move {
            let response = next.run(ctx, request).await;
            tracing::info!(
                pattern = ctx.pattern(),
                status = response.status().as_u16(),
                elapsed_us = ctx.elapsed().as_micros() as u64,
                "Handled"
            );
            response
        })
    }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let log_config = if std::env::var("APP_ENV").as_deref() == Ok("production") {
        LogConfig::production()
    } else {
        LogConfig::development()
    };
    init_logging(&log_config)?;

    let locales = locales_dir();
    let localization = LocalizationConfig::builder()
        .enable_translations()
        .enable_auto_detect_language()
        .translation_file("en", locales.join("en.json"))
        .translation_file("de", locales.join("de.json"))
        .default_language("en")
        .build();

    let addr = std::env::var("HERMES_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let config = ServerConfig::builder().http_addr(addr).build();
    let mut server = Server::new(config, &localization)?;
    let localizer = server.localizer();

    let page = Arc::clone(&localizer);
    server
        .get(
            "/login",
            move |req| {
                let body = format!(
                    "{}\n{}\n[{}]",
                    page.translate(&req, "login.title"),
                    page.translate(&req, "login.welcome"),
                    page.translate(&req, "login.submit"),
                );
                async move { Ok(Response::error(StatusCode::OK, &body)) }
            },
            RouteOptions::new()
                .summary("Login page")
                .tags(["auth"])
                .param(Param::query("next").description("Where to go after signing in"))
                .response(200, "Rendered login page")
                .middleware_arc(timing()),
        )
        .post(
            "/login",
            |_req| async { Ok(Response::redirect("/")) },
            RouteOptions::new()
                .summary("Submit credentials")
                .tags(["auth"])
                .response(302, "Signed in"),
        )
        .get_unlocalized(
            "/health",
            |_req| async { Ok(Response::error(StatusCode::OK, "ok")) },
            RouteOptions::new().summary("Liveness probe"),
        );

    let port = server.config().port().unwrap_or(8080);
    server.write_openapi(std::env::temp_dir().join("hermes-openapi.json"), port)?;

    server.run().await?;
    Ok(())
}
