use std::net::SocketAddr;
use std::sync::Arc;

use crate::infra::config::Config;
use crate::tools::food::tool_router::make_factory;
use crate::tools::hello::ServerInfo;
use crate::tools::restaurants::RestaurantSearch;

/// Run the process in the mode chosen by configuration.
pub async fn run(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        environment = %cfg.environment,
        live_places = cfg.has_api_key(),
        "BOOT smart-food-mcp"
    );

    match cfg.mode.as_str() {
        "stdio" => run_stdio(&cfg).await,
        "proxy" => crate::proxy::serve(cfg.proxy.clone()).await,
        "server" => run_server(&cfg).await,
        other => anyhow::bail!("invalid MODE '{other}'; expected server, stdio or proxy"),
    }
}

/// Stdio mode: MCP over stdin/stdout only, no HTTP.
async fn run_stdio(cfg: &Config) -> anyhow::Result<()> {
    let search = Arc::new(RestaurantSearch::from_config(&cfg.places));
    let factory = make_factory(search, ServerInfo::from_config(cfg));
    crate::infra::runtime::mcp_transport::serve_stdio(factory)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

async fn run_server(cfg: &Config) -> anyhow::Result<()> {
    let app = crate::infra::http_app::build_app(cfg);
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    tracing::info!(%addr, "serving MCP over streamable HTTP at /mcp");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
