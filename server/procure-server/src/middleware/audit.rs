//! Request audit capture.
//!
//! Application-level middleware that turns every completed non-exempt
//! request into one [`AuditEntry`]. Runs outside the authentication gate,
//! so it also sees anonymous and rejected traffic; the gate stamps the
//! principal id into response extensions for the entries that have one.

use std::time::Instant;

use audit_engine::{redact_value, AuditEntry};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::server::ProcureServer;

use super::AuditPrincipal;

const EXEMPT_PREFIXES: &[&str] = &["/static", "/swagger-ui", "/api-docs"];

fn is_exempt(path: &str) -> bool {
    path == "/health" || EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Third path segment names the resource collection, fourth the record.
fn resource_parts(path: &str) -> (&str, Option<&str>) {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty()).skip(2);
    (segments.next().unwrap_or("unknown"), segments.next())
}

fn parse_query(raw: &str) -> Value {
    let mut fields = Map::new();
    for pair in raw.split('&').filter(|pair| !pair.is_empty()) {
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        fields.insert(name.to_owned(), Value::String(value.to_owned()));
    }
    if fields.is_empty() {
        return Value::Null;
    }
    let mut query = Value::Object(fields);
    redact_value(&mut query);
    query
}

/// Buffers a JSON body for capture and rebuilds the request around it.
///
/// Only bodies with a declared `Content-Length` within the configured cap
/// are touched; anything else flows through unread so streaming uploads
/// and oversized payloads reach the handler untouched.
async fn capture_json_body(
    request: Request,
    content_length: Option<u64>,
    limit: usize,
) -> Result<(Request, Value), Response> {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    match content_length {
        Some(length) if is_json && length <= limit as u64 => {}
        _ => return Ok((request, Value::Null)),
    }

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!(%error, "failed to buffer request body for audit");
            return Err(ApiError::bad_request("request body could not be read").into_response());
        }
    };
    let mut captured = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);
    redact_value(&mut captured);
    Ok((Request::from_parts(parts, Body::from(bytes)), captured))
}

/// Captures one audit entry per completed non-exempt request.
///
/// Never fails the request on its own behalf: a broken audit store is the
/// recorder's problem, and capture errors surface only as a rejected body
/// read before the handler ever runs.
pub async fn capture_request_audit(
    State(server): State<ProcureServer>,
    request: Request,
    next: Next,
) -> Response {
    if is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let query = request.uri().query().map(parse_query).unwrap_or(Value::Null);
    let ip_address = super::client_ip(&request);
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_owned();
    let content_length = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    let limit = server.config.audit_body_limit_bytes;
    let (request, body) = match capture_json_body(request, content_length, limit).await {
        Ok(captured) => captured,
        Err(rejection) => return rejection,
    };

    let response = next.run(request).await;

    let (resource, record_id) = resource_parts(&path);
    let mut entry = AuditEntry::new(format!("{method} {path}"), resource);
    entry.record_id = record_id.map(str::to_owned);
    entry.principal_id = response
        .extensions()
        .get::<AuditPrincipal>()
        .map(|principal| principal.0);
    entry.ip_address = ip_address;
    entry.user_agent = user_agent;
    entry.details.query = query;
    entry.details.params = record_id
        .map(|id| json!({ "id": id }))
        .unwrap_or(Value::Null);
    entry.details.body = body;
    entry.details.status_code = response.status().as_u16();
    entry.details.duration_ms = started.elapsed().as_millis() as u64;
    entry.details.content_length = content_length;

    tracing::info!(
        target: "audit",
        entry_id = %entry.id,
        action = %entry.action,
        resource = %entry.resource,
        principal_id = ?entry.principal_id,
        ip = %entry.ip_address,
        status = entry.details.status_code,
        duration_ms = entry.details.duration_ms,
        "request audited"
    );
    server.audit.record(entry);

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_engine::REDACTION_MARKER;

    #[test]
    fn health_and_docs_are_exempt() {
        assert!(is_exempt("/health"));
        assert!(is_exempt("/swagger-ui"));
        assert!(is_exempt("/swagger-ui/index.html"));
        assert!(is_exempt("/api-docs/openapi.json"));
        assert!(is_exempt("/static/logo.png"));
        assert!(!is_exempt("/api/v1/tenders"));
        assert!(!is_exempt("/healthcheck"));
    }

    #[test]
    fn resource_comes_from_the_third_segment() {
        assert_eq!(resource_parts("/api/v1/tenders"), ("tenders", None));
        assert_eq!(resource_parts("/api/v1/tenders/42"), ("tenders", Some("42")));
        assert_eq!(
            resource_parts("/api/v1/tenders/42/bids"),
            ("tenders", Some("42"))
        );
        assert_eq!(resource_parts("/nonexistent"), ("unknown", None));
        assert_eq!(resource_parts("/"), ("unknown", None));
    }

    #[test]
    fn query_strings_become_redacted_objects() {
        let query = parse_query("limit=50&token=abc123");
        assert_eq!(query["limit"], "50");
        assert_eq!(query["token"], REDACTION_MARKER);

        assert_eq!(parse_query(""), Value::Null);
    }
}
