//! # Export Middleware
//!
//! Wraps an actix-web service. When a request carries `?ext=xlsx` or `?ext=pdf`
//! (or, for a non-GET request without `ext` in its query, an `ext` field in a
//! JSON or form body) the downstream handler still runs; its JSON body is then
//! re-rendered against the OpenAPI `200` response schema of the requested endpoint.
//!
//! ```text
//! GET /orders?ext=xlsx&type=list
//!   → handler JSON → Exporter::export → attachment | {"path": ...}
//! ```

use crate::error::ExportFailure;
use actix_web::body::{self, BoxBody, MessageBody};
use actix_web::dev::{
    forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform,
};
use actix_web::http::header::{self, HeaderMap};
use actix_web::http::Method;
use actix_web::{web, Error, HttpResponse};
use docex_core::{
    AppError, AppResult, ExportOptions, ExportOutcome, ExportParams, Exporter, OutputFormat,
};
use futures_util::future::LocalBoxFuture;
use serde_json::Value;
use std::rc::Rc;
use std::sync::Arc;

/// Bodies larger than this are never inspected for selectors.
const BODY_SELECTOR_LIMIT: usize = 64 * 1024;

/// `key=value` pairs from a URL-encoded string; malformed input yields none.
fn encoded_pairs(encoded: &str) -> Vec<(String, String)> {
    web::Query::<Vec<(String, String)>>::from_query(encoded)
        .map(web::Query::into_inner)
        .unwrap_or_default()
}

/// `ext` / `type` from a JSON object or URL-encoded form body.
fn body_pairs(headers: &HeaderMap, body: &[u8]) -> Vec<(String, String)> {
    if !is_json(headers) {
        return std::str::from_utf8(body).map(encoded_pairs).unwrap_or_default();
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => ["ext", "type"]
            .into_iter()
            .filter_map(|key| {
                let value = map.get(key)?.as_str()?;
                Some((key.to_string(), value.to_string()))
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// First value given for `name`.
fn selector<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Requests whose body may name the export: non-GET JSON or form submissions of modest size.
fn carries_selectors(req: &ServiceRequest) -> bool {
    if *req.method() == Method::GET || *req.method() == Method::HEAD {
        return false;
    }
    let headers = req.headers();
    let small = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .is_some_and(|len| len <= BODY_SELECTOR_LIMIT);
    let form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    small && (form || is_json(headers))
}

/// Collects selectors from the query string, falling back to the body when the
/// query names no `ext`. A consumed body is put back for the handler.
async fn request_selectors(req: &mut ServiceRequest) -> Result<Vec<(String, String)>, Error> {
    let pairs = encoded_pairs(req.query_string());
    if selector(&pairs, "ext").is_some() || !carries_selectors(req) {
        return Ok(pairs);
    }
    let body = req.extract::<web::Bytes>().await?;
    let pairs = body_pairs(req.headers(), &body);
    req.set_payload(Payload::from(body));
    Ok(pairs)
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("json"))
}

fn reject(req: ServiceRequest, err: AppError) -> ServiceResponse<BoxBody> {
    tracing::debug!(path = req.path(), error = %err, "rejected export selectors");
    req.error_response(ExportFailure(err))
}

/// File stem offered in `Content-Disposition`: `/orders/latest` becomes `orders_latest`.
pub fn attachment_name(path: &str) -> String {
    let name = path.trim_matches('/').replace('/', "_");
    if name.is_empty() {
        "export".to_string()
    } else {
        name
    }
}

fn document_response(outcome: ExportOutcome, path: &str) -> Option<HttpResponse> {
    match outcome {
        ExportOutcome::Buffer { bytes, format } => Some(
            HttpResponse::Ok()
                .content_type(format.content_type())
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}.{}\"",
                        attachment_name(path),
                        format.extension()
                    ),
                ))
                .body(bytes),
        ),
        ExportOutcome::Saved { path, .. } => Some(HttpResponse::Ok().json(serde_json::json!({
            "path": path.display().to_string(),
        }))),
        ExportOutcome::Json(_) => None,
    }
}

/// Middleware factory holding the shared [`Exporter`].
#[derive(Clone)]
pub struct DocumentExport {
    exporter: Arc<Exporter>,
}

impl DocumentExport {
    /// Wraps an exporter.
    pub fn new(exporter: Exporter) -> Self {
        Self::from_shared(Arc::new(exporter))
    }

    /// Shares an exporter with other parts of the application.
    pub fn from_shared(exporter: Arc<Exporter>) -> Self {
        Self { exporter }
    }

    /// Validates `options` and builds the exporter.
    pub fn from_options(options: ExportOptions) -> AppResult<Self> {
        Ok(Self::new(Exporter::new(options)?))
    }
}

impl<S, B> Transform<S, ServiceRequest> for DocumentExport
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = DocumentExportService<S>;
    type InitError = ();
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(DocumentExportService {
            service: Rc::new(service),
            exporter: Arc::clone(&self.exporter),
        }))
    }
}

/// The per-worker service produced by [`DocumentExport`].
pub struct DocumentExportService<S> {
    service: Rc<S>,
    exporter: Arc<Exporter>,
}

impl<S, B> Service<ServiceRequest> for DocumentExportService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let exporter = Arc::clone(&self.exporter);

        Box::pin(async move {
            let mut req = req;
            let selectors = request_selectors(&mut req).await?;
            let ext = selector(&selectors, "ext");

            // Only `ext` decides whether this request is ours; `type` may belong to the handler.
            let format = match ext.map(str::parse::<OutputFormat>).transpose() {
                Ok(format) => format.unwrap_or_default(),
                Err(err) => return Ok(reject(req, err)),
            };
            if format == OutputFormat::Json {
                return service.call(req).await.map(ServiceResponse::map_into_boxed_body);
            }

            let params = match ExportParams::parse(ext, selector(&selectors, "type")) {
                Ok(params) => params,
                Err(err) => return Ok(reject(req, err)),
            };

            let path = req.path().to_owned();
            let method = req.method().as_str().to_owned();
            let res = service.call(req).await?;

            if !res.status().is_success() || !is_json(res.headers()) {
                tracing::warn!(
                    path = %path,
                    status = %res.status(),
                    "response not exportable, passing through"
                );
                return Ok(res.map_into_boxed_body());
            }

            let (request, response) = res.into_parts();
            let (head, body) = response.into_parts();
            let bytes = match body::to_bytes(body).await {
                Ok(bytes) => bytes,
                Err(err) => {
                    let err: Box<dyn std::error::Error> = err.into();
                    let failure = ExportFailure(AppError::General(err.to_string()));
                    return Ok(ServiceResponse::from_err(failure, request));
                }
            };

            let payload: Value = match serde_json::from_slice(&bytes) {
                Ok(payload) => payload,
                Err(err) => {
                    tracing::warn!(path = %path, error = %err, "body is not JSON, passing through");
                    let original = head.set_body(bytes).map_into_boxed_body();
                    return Ok(ServiceResponse::new(request, original));
                }
            };

            let endpoint = path.clone();
            let exported =
                web::block(move || exporter.export(&endpoint, &method, params, payload)).await;
            let outcome = match exported {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(err)) => {
                    tracing::error!(path = %path, error = %err, "export failed");
                    return Ok(ServiceResponse::from_err(ExportFailure(err), request));
                }
                Err(err) => {
                    let failure = ExportFailure(AppError::General(err.to_string()));
                    return Ok(ServiceResponse::from_err(failure, request));
                }
            };

            let response = document_response(outcome, &path)
                .unwrap_or_else(|| head.set_body(bytes).map_into_boxed_body());
            Ok(ServiceResponse::new(request, response))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_query_selectors() {
        let pairs = encoded_pairs("type=premium&ext=pdf&type=list");
        assert_eq!(selector(&pairs, "ext"), Some("pdf"));
        assert_eq!(selector(&pairs, "type"), Some("premium"));
        assert_eq!(selector(&encoded_pairs(""), "ext"), None);
    }

    #[test]
    fn test_body_selectors() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let pairs = body_pairs(&headers, br#"{"ext": "xlsx", "type": 3, "name": "a"}"#);
        assert_eq!(pairs, vec![("ext".to_string(), "xlsx".to_string())]);
        assert!(body_pairs(&headers, b"[1, 2]").is_empty());

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let pairs = body_pairs(&headers, b"ext=pdf&type=list");
        assert_eq!(selector(&pairs, "type"), Some("list"));
    }

    #[test]
    fn test_attachment_name() {
        assert_eq!(attachment_name("/orders"), "orders");
        assert_eq!(attachment_name("/orders/latest/"), "orders_latest");
        assert_eq!(attachment_name("/"), "export");
    }

    #[test]
    fn test_document_response() {
        let saved = ExportOutcome::Saved {
            path: PathBuf::from("/tmp/a.pdf"),
            format: OutputFormat::Pdf,
        };
        let resp = document_response(saved, "/orders").unwrap();
        assert!(is_json(resp.headers()));

        let buffer = ExportOutcome::Buffer {
            bytes: b"%PDF-1.5".to_vec(),
            format: OutputFormat::Pdf,
        };
        let resp = document_response(buffer, "/orders").unwrap();
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"orders.pdf\""
        );

        assert!(document_response(ExportOutcome::Json(Value::Null), "/orders").is_none());
    }
}
