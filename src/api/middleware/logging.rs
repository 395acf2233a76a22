//! Per-request access log tagged with request id and knowledge-base scope

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Scope named in the query string of document endpoints
#[derive(Debug, Default, PartialEq, Eq)]
struct ScopeFields {
    tenant_id: Option<String>,
    kb_id: Option<String>,
}

impl ScopeFields {
    fn from_query(query: Option<&str>) -> Self {
        let mut fields = Self::default();
        for pair in query.unwrap_or_default().split('&') {
            match pair.split_once('=') {
                Some(("tenantId", v)) if !v.is_empty() => fields.tenant_id = Some(v.to_string()),
                Some(("kbId", v)) if !v.is_empty() => fields.kb_id = Some(v.to_string()),
                _ => {}
            }
        }
        fields
    }
}

/// `TraceLayer` already opens the span, so this only emits events inside it.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let route = route_of(&request);
    let request_id = request_id_of(&request);
    let scope = ScopeFields::from_query(request.uri().query());
    let body_bytes = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    info!(
        method = %method,
        route = %route,
        request_id = %request_id,
        tenant_id = scope.tenant_id.as_deref().unwrap_or("-"),
        kb_id = scope.kb_id.as_deref().unwrap_or("-"),
        body_bytes = ?body_bytes,
        "Request received"
    );

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(route = %route, status = status.as_u16(), elapsed_ms, request_id = %request_id, "Request failed");
    } else {
        info!(route = %route, status = status.as_u16(), elapsed_ms, request_id = %request_id, "Request served");
    }

    response
}

fn route_of(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Reuses a caller supplied id so logs can be joined across services
fn request_id_of(request: &Request<Body>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}
