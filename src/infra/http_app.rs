use axum::{
    routing::{any_service, get},
    Router,
};
use std::sync::Arc;

use crate::infra::config::Config;
use crate::infra::runtime::mcp_transport::{self, LocalSessionManager};
use crate::tools::food::tool_router::{make_factory, FoodRouter, FoodSvc};
use crate::tools::hello::ServerInfo;
use crate::tools::restaurants::RestaurantSearch;

/// `/healthz` + streamable MCP at `/mcp`, serving whatever tool factory is given.
pub fn build_app_with(
    factory: impl Fn() -> (FoodSvc, FoodRouter) + Send + Sync + Clone + 'static,
) -> Router {
    let session_mgr = Arc::new(LocalSessionManager::default());
    let mcp_service = mcp_transport::make_streamable_http_service(factory, session_mgr);

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route_service("/mcp", any_service(mcp_service))
}

/// App wired from resolved configuration.
pub fn build_app(cfg: &Config) -> Router {
    let search = Arc::new(RestaurantSearch::from_config(&cfg.places));
    tracing::info!(live = search.is_live(), "restaurant search configured");
    build_app_with(make_factory(search, ServerInfo::from_config(cfg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use hyper::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn healthz_returns_ok() {
        let app = build_app_with(make_factory(
            Arc::new(RestaurantSearch::new(None)),
            ServerInfo::new("test"),
        ));
        let req = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert!(resp.status().is_success());
        let bytes = to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }
}
