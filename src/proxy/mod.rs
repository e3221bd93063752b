//! Header-compatibility proxy in front of the MCP endpoint.
//!
//! Some automation clients send `Accept: application/json` only, while the
//! Streamable HTTP transport insists on both `application/json` and
//! `text/event-stream`. The proxy patches that header and otherwise passes
//! requests and responses through untouched.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::infra::config::ProxyConfig;
use crate::infra::http::json::{error_response, INTERNAL_ERROR};
use crate::infra::runtime::limits::make_http_client;

pub const EVENT_STREAM: &str = "text/event-stream";
pub const ACCEPT_BOTH: &str = "application/json, text/event-stream";
pub const PROXY_NAME: &str = "poke-fastmcp-proxy";

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
];

/// The `Accept` value to forward: unchanged when it already allows an event
/// stream, otherwise both media types.
pub fn normalize_accept(current: Option<&str>) -> String {
    match current {
        Some(v) if v.contains(EVENT_STREAM) => v.to_string(),
        _ => ACCEPT_BOTH.to_string(),
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Inbound headers as they go upstream: no `host`, no hop-by-hop, patched `Accept`.
pub fn forwarded_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut out = inbound.clone();
    out.remove(header::HOST);
    strip_hop_by_hop(&mut out);

    let current = inbound.get(header::ACCEPT).and_then(|v| v.to_str().ok());
    let accept = normalize_accept(current);
    if current != Some(accept.as_str()) {
        if let Ok(v) = HeaderValue::from_str(&accept) {
            out.insert(header::ACCEPT, v);
        }
    }
    out
}

#[derive(Clone)]
pub struct ProxyState {
    upstream: String,
    http: reqwest::Client,
}

impl ProxyState {
    pub fn new(cfg: &ProxyConfig) -> Self {
        Self {
            upstream: cfg.upstream_url.clone(),
            http: make_http_client(Duration::from_secs(5), cfg.timeout()),
        }
    }
}

fn proxy_error(e: impl std::fmt::Display) -> Response {
    tracing::warn!(error = %e, "proxy error");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!("proxy-error"),
        INTERNAL_ERROR,
        format!("Proxy error: {e}"),
    )
}

async fn forward(State(state): State<ProxyState>, headers: HeaderMap, body: Bytes) -> Response {
    let outbound = forwarded_headers(&headers);
    tracing::info!(
        inbound_accept = ?headers.get(header::ACCEPT),
        forwarded_accept = ?outbound.get(header::ACCEPT),
        upstream = %state.upstream,
        "proxying MCP request"
    );

    let resp = match state
        .http
        .post(&state.upstream)
        .headers(outbound)
        .body(body)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => return proxy_error(e),
    };

    let status = resp.status();
    let mut mirrored = resp.headers().clone();
    strip_hop_by_hop(&mut mirrored);
    let bytes = match resp.bytes().await {
        Ok(b) => b,
        Err(e) => return proxy_error(e),
    };
    tracing::info!(status = status.as_u16(), bytes = bytes.len(), "upstream responded");
    (status, mirrored, bytes).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "proxy": PROXY_NAME }))
}

pub fn build_proxy_app(state: ProxyState) -> Router {
    Router::new()
        .route("/mcp", post(forward))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(cfg: ProxyConfig) -> anyhow::Result<()> {
    let app = build_proxy_app(ProxyState::new(&cfg));
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    tracing::info!(%addr, upstream = %cfg.upstream_url, "starting header-compatibility proxy at /mcp");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
