#![deny(missing_docs)]

//! # Docex Web Library
//!
//! actix-web integration for the export pipeline: the [`DocumentExport`]
//! middleware, HTTP error mapping and the handlers served by the demo binary.

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

/// HTTP mapping of export errors.
pub mod error;

/// The export middleware.
pub mod middleware;

pub use error::ExportFailure;
pub use middleware::DocumentExport;

/// A simple health check handler.
#[get("/health")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// Sample orders, shaped after the bundled `openapi.yaml`.
#[get("/orders")]
pub async fn list_orders() -> impl Responder {
    HttpResponse::Ok().json(json!([
        {
            "id": "A-1",
            "customer": {"name": "Ann", "email": "ann@example.com"},
            "lines": [{"sku": "bolt", "qty": 10}, {"sku": "nut", "qty": 12}],
            "paid": true
        },
        {
            "id": "A-2",
            "customer": {"name": "Bob", "email": "bob@example.com"},
            "lines": [{"sku": "washer", "qty": 100}],
            "paid": false
        }
    ]))
}

/// The most recent sample order.
#[get("/orders/latest")]
pub async fn latest_order() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "id": "A-2",
        "customer": {"name": "Bob", "email": "bob@example.com"},
        "lines": [{"sku": "washer", "qty": 100}],
        "paid": false
    }))
}

/// Registers the demo handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(list_orders)
        .service(latest_order);
}
