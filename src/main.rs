use smart_food_mcp::infra::{self, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    infra::logging::init();

    let cfg = Config::from_env_and_toml()?;
    infra::boot::run(cfg).await
}
