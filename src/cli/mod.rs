use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::clients::google_places::{GooglePlacesRemote, ProbeEndpoint};
use crate::domain::{PriceLevel, SearchRequest, SearchResponse};
use crate::infra::config::{Config, PlacesConfig};
use crate::tools::restaurants::RestaurantSearch;

#[derive(Parser)]
#[command(name = "smart-food-admin")]
#[command(about = "Smart Food MCP - Admin CLI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Health check the service
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Validate configuration
    Config {
        /// Validate config without starting service
        #[arg(long)]
        validate: bool,
    },
    /// Show service status and configuration
    Status {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Probe the places APIs with the configured key
    CheckApis,
    /// Run one restaurant search and print the envelope
    Search {
        #[arg(short, long)]
        location: String,
        #[arg(short, long, default_value = SearchRequest::DEFAULT_FOOD_TYPE)]
        food_type: String,
        #[arg(short, long, default_value_t = SearchRequest::DEFAULT_RADIUS_METERS)]
        radius: u32,
        /// free, inexpensive, moderate, expensive, very_expensive
        #[arg(short, long)]
        price_level: Option<String>,
        #[arg(long)]
        open_now: bool,
    },
    /// Send a JSON-only initialize through the header proxy
    TestProxy {
        /// Proxy URL
        #[arg(short, long, default_value = "http://localhost:8001")]
        url: String,
    },
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    run_commands(cli.command).await
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate: _ } => match validate_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Status { url } => match show_status(&url).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Status check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::CheckApis => {
            let places = match places_config() {
                Ok(places) => places,
                Err(e) => {
                    eprintln!("❌ Configuration error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            match check_apis(&places).await {
                Ok(_) => {
                    println!("✅ All places APIs are working");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("❌ API check failed: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Search {
            location,
            food_type,
            radius,
            price_level,
            open_now,
        } => {
            let places = match places_config() {
                Ok(places) => places,
                Err(e) => {
                    eprintln!("❌ Configuration error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let req = match search_request(location, food_type, radius, price_level, open_now) {
                Ok(req) => req,
                Err(e) => {
                    eprintln!("❌ Invalid search: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            match run_search(&places, &req).await {
                Ok(resp) => match serde_json::to_string_pretty(&resp) {
                    Ok(pretty) => {
                        println!("{}", pretty);
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("❌ Could not render response: {}", e);
                        ExitCode::FAILURE
                    }
                },
                Err(e) => {
                    eprintln!("❌ Search failed: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::TestProxy { url } => match test_proxy(&url).await {
            Ok(_) => {
                println!("✅ Proxy accepted a JSON-only client");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Proxy test failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config = Config::from_env_and_toml().map_err(|e| e.to_string())?;

    if !matches!(config.mode.as_str(), "server" | "stdio" | "proxy") {
        return Err(format!(
            "Invalid MODE: {}. Must be 'server', 'stdio' or 'proxy'",
            config.mode
        )
        .into());
    }
    if config.mode == "server" && config.port == 0 {
        return Err("PORT cannot be 0".into());
    }
    if config.mode == "proxy" && config.proxy.port == 0 {
        return Err("PROXY_PORT cannot be 0".into());
    }
    if !config.has_api_key() {
        println!("ℹ️  No places API key configured; searches will return sample data");
    }

    Ok(config)
}

async fn show_status(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();

    // Health check
    let health_response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await?;

    println!(
        "🏥 Health Status: {}",
        if health_response.status().is_success() {
            "✅ Healthy"
        } else {
            "❌ Unhealthy"
        }
    );

    // Tools list over streamable HTTP needs both media types.
    let tools_response = client
        .post(format!("{}/mcp", url))
        .header("content-type", "application/json")
        .header("accept", crate::proxy::ACCEPT_BOTH)
        .json(&crate::core::mcp::request(
            serde_json::json!(1),
            "tools/list",
            serde_json::json!({}),
        ))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await;

    match tools_response {
        Ok(resp) if resp.status().is_success() => {
            println!("🔧 Tools: ✅ Available");
        }
        Ok(resp) => {
            println!("🔧 Tools: ❌ HTTP {}", resp.status());
        }
        Err(_) => {
            println!("🔧 Tools: ❌ Unavailable");
        }
    }

    let cfg = Config::from_env_and_toml().map_err(|e| e.to_string())?;
    println!("\n📋 Configuration:");
    println!("  Mode: {}", cfg.mode);
    println!("  Port: {}", cfg.port);
    println!("  Environment: {}", cfg.environment);
    println!(
        "  Log Level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );
    println!(
        "  Places API: {}",
        if cfg.has_api_key() {
            "configured (live data)"
        } else {
            "not configured (sample data)"
        }
    );
    println!("  Proxy: :{} -> {}", cfg.proxy.port, cfg.proxy.upstream_url);

    Ok(())
}

/// Places settings resolved the same way the server resolves them.
fn places_config() -> Result<PlacesConfig, Box<dyn std::error::Error>> {
    Ok(Config::from_env_and_toml().map_err(|e| e.to_string())?.places)
}

/// Probe every places endpoint; fails unless all of them answer `OK`/`ZERO_RESULTS`.
async fn check_apis(places: &PlacesConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = GooglePlacesRemote::from_config(places)?;

    let mut broken = 0;
    for endpoint in ProbeEndpoint::ALL {
        match client.probe(endpoint).await {
            Ok(report) if report.is_working() => {
                println!("  ✅ {}: working ({})", endpoint.label(), report.status);
            }
            Ok(report) if report.is_blocked() => {
                broken += 1;
                println!(
                    "  🚫 {}: blocked - {}",
                    endpoint.label(),
                    report.error_message.as_deref().unwrap_or("REQUEST_DENIED")
                );
            }
            Ok(report) => {
                broken += 1;
                println!("  ⚠️  {}: {}", endpoint.label(), report.status);
            }
            Err(e) => {
                broken += 1;
                println!("  ❌ {}: {}", endpoint.label(), e);
            }
        }
    }

    if broken == 0 {
        Ok(())
    } else {
        Err(format!("{} of {} APIs not working", broken, ProbeEndpoint::ALL.len()).into())
    }
}

fn search_request(
    location: String,
    food_type: String,
    radius: u32,
    price_level: Option<String>,
    open_now: bool,
) -> Result<SearchRequest, Box<dyn std::error::Error>> {
    let price_level = price_level
        .map(|p| p.parse::<PriceLevel>())
        .transpose()?;
    let req = SearchRequest::new(location)
        .food_type(food_type)
        .radius_meters(radius)
        .price_level(price_level)
        .open_now(open_now);
    req.validate()?;
    Ok(req)
}

async fn run_search(
    places: &PlacesConfig,
    req: &SearchRequest,
) -> Result<SearchResponse, Box<dyn std::error::Error>> {
    let search = RestaurantSearch::from_config(places);
    Ok(search.search(req).await)
}

async fn test_proxy(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let frame = crate::core::mcp::request(
        serde_json::json!(1),
        "initialize",
        serde_json::json!({
            "protocolVersion": "2025-03-26",
            "capabilities": {},
            "clientInfo": {"name": "smart-food-admin", "version": env!("CARGO_PKG_VERSION")}
        }),
    );
    let response = client
        .post(format!("{}/mcp", url))
        .header("content-type", "application/json")
        .header("accept", "application/json")
        .json(&frame)
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await?;

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    println!("📡 Status: {}", status);
    println!("📄 Content-Type: {}", content_type);
    if let Some(session) = response.headers().get("mcp-session-id") {
        println!("🔑 Session: {}", session.to_str().unwrap_or("<binary>"));
    }

    if status.is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", status).into())
    }
}
