#![deny(missing_docs)]

//! # Docex Web Binary
//!
//! Demo server: the sample order handlers wrapped in the export middleware.
//! Try `GET /orders?ext=xlsx` or `GET /orders/latest?ext=pdf&type=list`.

use actix_web::{App, HttpServer};
use docex_core::ExportOptions;
use docex_web::{configure, DocumentExport};
use std::io;
use std::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const BUNDLED_OPENAPI: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/openapi.yaml");

fn build_server(listener: TcpListener, export: DocumentExport) -> io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || App::new().wrap(export.clone()).configure(configure))
        .listen(listener)?
        .run())
}

fn resolve_bind_addr() -> String {
    std::env::var("DOCEX_WEB_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string())
}

/// Options from `DOCEX_*`, falling back to the bundled document.
fn resolve_options() -> ExportOptions {
    let mut options = ExportOptions::from_env();
    if options.openapi_path.is_none() {
        options.openapi_path = Some(BUNDLED_OPENAPI.into());
    }
    options
}

fn init_tracing() {
    // A second init (tests) is harmless.
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docex_web=info,docex_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let export = DocumentExport::from_options(resolve_options())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let bind_addr = resolve_bind_addr();
    let listener = TcpListener::bind(&bind_addr)?;
    tracing::info!(%bind_addr, "starting docex demo server");
    let server = build_server(listener, export)?;

    if std::env::var("DOCEX_WEB_ONESHOT").is_ok() {
        server.handle().stop(true).await;
    }

    server.await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_oneshot() {
        std::env::set_var("DOCEX_WEB_BIND", "127.0.0.1:0");
        std::env::set_var("DOCEX_WEB_ONESHOT", "1");

        let res = main();

        std::env::remove_var("DOCEX_WEB_BIND");
        std::env::remove_var("DOCEX_WEB_ONESHOT");

        assert!(res.is_ok());
    }

    #[test]
    fn test_bundled_document_is_default() {
        let options = resolve_options();
        assert!(options.openapi_path.is_some());
    }

    #[actix_web::test]
    async fn test_build_server_start_stop() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let export = DocumentExport::from_options(ExportOptions::new(BUNDLED_OPENAPI)).unwrap();
        let server = build_server(listener, export).unwrap();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        handle.stop(true).await;
    }
}
