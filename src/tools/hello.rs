use serde::{Deserialize, Serialize};

use crate::infra::config::Config;

pub const SERVER_NAME: &str = "Smart Food & Coffee MCP Server";

pub fn greeting(name: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() { "friend" } else { name };
    format!("Hello, {name}! Welcome to our Smart Food & Coffee MCP server!")
}

/// Payload of `get_server_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub server_name: String,
    pub version: String,
    pub environment: String,
    pub runtime_version: String,
}

impl ServerInfo {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            server_name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: environment.into(),
            runtime_version: format!("rust {}+", env!("CARGO_PKG_RUST_VERSION")),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.environment.clone())
    }
}
