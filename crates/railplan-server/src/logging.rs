use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use rand::Rng;
use std::fmt::Write;
use std::time::Instant;

use crate::api::error_response;

/// Trace id of the current request, inserted as a request extension.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl std::ops::Deref for TraceId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a 16-character hex trace ID (8 random bytes).
fn generate_trace_id() -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    let mut s = String::with_capacity(16);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Characters of a request or response body kept in the log line.
const MAX_BODY_LOG_CHARS: usize = 200;

/// Largest request body accepted by the API. Bigger bodies get a 413.
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Alert routes carry the operator's notification address in both directions.
fn is_sensitive(path: &str) -> bool {
    path.starts_with("/api/alerts/")
}

/// Swagger UI assets are not worth a log line.
fn is_quiet(path: &str) -> bool {
    path.starts_with("/docs")
}

/// Truncate to at most `max` bytes on a char boundary.
fn truncate_body(bytes: &[u8], max: usize) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) if s.len() > max => {
            let mut end = max;
            while end > 0 && !s.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &s[..end])
        }
        Ok(s) => s.to_string(),
        Err(_) => "<non-utf8 body>".to_string(),
    }
}

fn format_elapsed(elapsed_us: u128) -> String {
    if elapsed_us < 1000 {
        format!("{elapsed_us}µs")
    } else if elapsed_us < 1_000_000 {
        format!("{}ms", elapsed_us / 1000)
    } else {
        format!("{:.1}s", elapsed_us as f64 / 1_000_000.0)
    }
}

fn with_trace_header(mut response: Response, trace_id: &str) -> Response {
    if let Ok(val) = HeaderValue::from_str(trace_id) {
        response.headers_mut().insert("X-Trace-Id", val);
    }
    response
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"))
}

/// Buffer a write request's body so it can be logged and replayed to the
/// handler. Oversized bodies become a 413 envelope.
async fn buffer_request_body(req: Request, trace_id: &str) -> Result<(Request, Bytes), Response> {
    let (parts, body) = req.into_parts();
    match axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES).await {
        Ok(bytes) => Ok((Request::from_parts(parts, Body::from(bytes.clone())), bytes)),
        Err(e) => {
            tracing::warn!(
                trace_id = %trace_id,
                method = %parts.method,
                path = %parts.uri.path(),
                limit = MAX_REQUEST_BODY_BYTES,
                error = %e,
                "Request body rejected"
            );
            Err(error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                trace_id,
                "payload_too_large",
                &format!("Request body exceeds {MAX_REQUEST_BODY_BYTES} bytes"),
            ))
        }
    }
}

/// Request/response logging middleware.
///
/// Assigns the trace id, enforces the request body limit and logs one line
/// per direction. Only JSON bodies are logged, and never for alert routes;
/// the CSV download and the HTML page are reported by size.
pub async fn request_logging(mut req: Request, next: Next) -> Response {
    let trace_id = generate_trace_id();
    req.extensions_mut().insert(TraceId(trace_id.clone()));

    let path = req.uri().path().to_string();
    if is_quiet(&path) {
        return next.run(req).await;
    }

    let method = req.method().clone();
    let url = match req.uri().query() {
        Some(q) if !q.is_empty() => format!("{path}?{q}"),
        _ => path.clone(),
    };
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let sensitive = is_sensitive(&path);

    let (req, req_body) = if matches!(method, Method::POST | Method::PUT | Method::PATCH) {
        match buffer_request_body(req, &trace_id).await {
            Ok(buffered) => buffered,
            Err(rejected) => return with_trace_header(rejected, &trace_id),
        }
    } else {
        (req, Bytes::new())
    };

    if sensitive || req_body.is_empty() {
        tracing::info!(trace_id = %trace_id, method = %method, path = %url, ua = %user_agent, "--> request");
    } else {
        tracing::info!(
            trace_id = %trace_id,
            method = %method,
            path = %url,
            body = %truncate_body(&req_body, MAX_BODY_LOG_CHARS),
            ua = %user_agent,
            "--> request"
        );
    }

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = format_elapsed(start.elapsed().as_micros());
    let status = response.status();
    let json = is_json(&response);

    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let snippet = if json && !sensitive && !body_bytes.is_empty() {
        truncate_body(&body_bytes, MAX_BODY_LOG_CHARS)
    } else {
        String::new()
    };

    let status = status.as_u16();
    let bytes = body_bytes.len();
    match status {
        500.. => tracing::error!(trace_id = %trace_id, status, elapsed = %elapsed, bytes, body = %snippet, "<-- response"),
        400..=499 => tracing::warn!(trace_id = %trace_id, status, elapsed = %elapsed, bytes, body = %snippet, "<-- response"),
        _ if snippet.is_empty() => tracing::info!(trace_id = %trace_id, status, elapsed = %elapsed, bytes, "<-- response"),
        _ => tracing::info!(trace_id = %trace_id, status, elapsed = %elapsed, bytes, body = %snippet, "<-- response"),
    }

    with_trace_header(Response::from_parts(parts, Body::from(body_bytes)), &trace_id)
}
