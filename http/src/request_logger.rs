//! Structured request logging middleware
//!
//! Emits one event per request with method, path, status and timing. JSON
//! bodies and query strings are summarized with truncation and redaction.

use axum::{
    body::{Body, HttpBody},
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};
use http_body_util::{BodyExt, Limited};
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

/// Maximum length for parameter values before truncation
const MAX_PARAM_LENGTH: usize = 30;

/// Truncation suffix for long parameters
const TRUNCATION_SUFFIX: &str = "...";

/// Largest body buffered for the summary; bigger or unsized bodies pass through untouched
const MAX_SUMMARIZED_BODY: u64 = 64 * 1024;

const BODY_NOT_SUMMARIZED: &str = "body_not_summarized";

/// Request logging middleware
pub async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let has_body = method == Method::POST || method == Method::PUT;
    let (request, params_summary) = if has_body && !is_summarizable(request.body()) {
        (request, BODY_NOT_SUMMARIZED.to_string())
    } else if has_body {
        let (parts, body) = request.into_parts();
        match Limited::new(body, MAX_SUMMARIZED_BODY as usize).collect().await {
            Ok(collected) => {
                let bytes = collected.to_bytes();
                let summary = match serde_json::from_slice::<Value>(&bytes) {
                    Ok(json) => format_params_summary(&json),
                    Err(_) => "invalid_json".to_string(),
                };
                (Request::from_parts(parts, Body::from(bytes)), summary)
            }
            Err(err) => {
                warn!(%method, %path, error = %err, "Failed to read request body");
                (Request::from_parts(parts, Body::empty()), String::new())
            }
        }
    } else {
        let summary = request
            .uri()
            .query()
            .map(format_query_summary)
            .unwrap_or_default();
        (request, summary)
    };

    let response = next.run(request).await;
    let status = response.status();
    let duration_ms = start_time.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%method, %path, status = status.as_u16(), duration_ms, params = %params_summary, "Request failed");
    } else {
        info!(%method, %path, status = status.as_u16(), duration_ms, params = %params_summary, "Request handled");
    }

    response
}

/// Whether the body declares a size small enough to buffer for logging
fn is_summarizable(body: &Body) -> bool {
    body.size_hint()
        .upper()
        .is_some_and(|upper| upper <= MAX_SUMMARIZED_BODY)
}

/// Format a JSON body into a summary string with truncation
fn format_params_summary(params: &Value) -> String {
    match params {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format_pair(key, &format_parameter_value(value)))
            .collect::<Vec<_>>()
            .join(", "),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        _ => format_parameter_value(params),
    }
}

/// Format a raw query string as `key="value"` pairs
fn format_query_summary(query: &str) -> String {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            format_pair(key, &truncate_string(value, MAX_PARAM_LENGTH))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_pair(key: &str, value: &str) -> String {
    if is_sensitive_parameter(key) {
        format!("{key}=\"[REDACTED]\"")
    } else {
        format!("{key}=\"{value}\"")
    }
}

/// Format a single parameter value with truncation
fn format_parameter_value(value: &Value) -> String {
    let value_str = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{...{} fields}}", obj.len()),
        Value::Null => "null".to_string(),
    };

    truncate_string(&value_str, MAX_PARAM_LENGTH)
}

/// Truncate string to max length with suffix, respecting char boundaries
fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let keep = max_length.saturating_sub(TRUNCATION_SUFFIX.len());
        let truncated: String = input.chars().take(keep).collect();
        format!("{truncated}{TRUNCATION_SUFFIX}")
    }
}

/// Check if parameter should be redacted
fn is_sensitive_parameter(key: &str) -> bool {
    let sensitive_keys = ["password", "token", "secret", "auth", "credential"];

    let key_lower = key.to_lowercase();
    sensitive_keys
        .iter()
        .any(|&sensitive| key_lower.contains(sensitive))
}
