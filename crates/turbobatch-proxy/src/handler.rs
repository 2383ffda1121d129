//! The single fallback handler

use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, info};

use crate::ProxyState;
use crate::error::ProxyError;
use crate::route::UpstreamRoute;

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, x-api-key, anthropic-version";
const MAX_AGE: &str = "86400";

/// Answer preflights, reject other methods, forward GET and POST.
pub async fn proxy(
    State(state): State<ProxyState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        return preflight();
    }

    if method != Method::GET && method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
            "Method not allowed",
        )
            .into_response();
    }

    let body = match body {
        Ok(body) => body,
        Err(rejection) => return ProxyError::Body(rejection).into_response(),
    };

    match forward(&state, method, uri.path(), &headers, body).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
            (header::ACCESS_CONTROL_MAX_AGE, MAX_AGE),
        ],
    )
        .into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

async fn forward(
    state: &ProxyState,
    method: Method,
    path: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let api_key = header_str(headers, "x-api-key").ok_or(ProxyError::MissingApiKey)?;
    let route = UpstreamRoute::from_path(path)?;
    let api_version = header_str(headers, "anthropic-version")
        .unwrap_or(state.config.default_api_version.as_str());

    let url = format!("{}{}", state.config.upstream_base(), route.upstream_path());
    debug!(%method, path, url = %url, "Forwarding request");

    let mut request = state
        .http
        .request(method.clone(), &url)
        .header("x-api-key", api_key)
        .header("anthropic-version", api_version)
        .header(header::CONTENT_TYPE, "application/json")
        .timeout(state.config.timeout);
    if method == Method::POST {
        request = request.body(body);
    }

    let response = request.send().await.map_err(ProxyError::Upstream)?;
    let status = response.status();
    let text = response.text().await.map_err(ProxyError::Upstream)?;
    info!(status = status.as_u16(), bytes = text.len(), "Upstream responded");

    let payload = if route.is_results() {
        let lines = turbobatch::parse_jsonl(&text).map_err(ProxyError::InvalidResults)?;
        debug!(results = lines.len(), "Parsed result lines");
        Value::Array(lines)
    } else {
        serde_json::from_str::<Value>(&text).map_err(ProxyError::InvalidJson)?
    };

    Ok((
        status,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::CONTENT_TYPE, "application/json"),
        ],
        payload.to_string(),
    )
        .into_response())
}
