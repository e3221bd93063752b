use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Value shipped in `.env.example`; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "your_google_places_api_key_here";
pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com";
pub const DEFAULT_PROXY_UPSTREAM: &str = "http://localhost:8080/mcp";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: String, // "server", "stdio" or "proxy"
    pub port: u16,
    pub environment: String,
    pub places: PlacesConfig,
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacesConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl PlacesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_PLACES_BASE_URL.to_string(),
            timeout_secs: 6,
            connect_timeout_secs: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProxyConfig {
    pub upstream_url: String,
    pub port: u16,
    pub timeout_secs: u64,
}

impl ProxyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_PROXY_UPSTREAM.to_string(),
            port: 8001,
            timeout_secs: 30,
        }
    }
}

/// Optional file layer, every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    mode: Option<String>,
    port: Option<u16>,
    environment: Option<String>,
    places: FilePlaces,
    proxy: FileProxy,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FilePlaces {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileProxy {
    upstream_url: Option<String>,
    port: Option<u16>,
    timeout_secs: Option<u64>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<T>().ok())
}

/// Drop empty and placeholder keys so callers only ever see a usable credential.
pub fn usable_api_key(raw: Option<String>) -> Option<String> {
    raw.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
}

impl Config {
    pub fn from_env() -> Self {
        Self::layered(FileConfig::default())
    }

    /// Like [`Config::from_env`], with an optional TOML file named by
    /// `SMART_FOOD_CONFIG` underneath. Environment values win.
    pub fn from_env_and_toml() -> anyhow::Result<Self> {
        let file = match env_string("SMART_FOOD_CONFIG") {
            Some(path) => load_file(Path::new(&path))?,
            None => FileConfig::default(),
        };
        Ok(Self::layered(file))
    }

    fn layered(file: FileConfig) -> Self {
        let places_defaults = PlacesConfig::default();
        let proxy_defaults = ProxyConfig::default();

        let mode = env_string("MODE")
            .or(file.mode)
            .unwrap_or_else(|| "server".into());
        let port = env_parsed::<u16>("PORT").or(file.port).unwrap_or(8080);
        let environment = env_string("ENVIRONMENT")
            .or(file.environment)
            .unwrap_or_else(|| "development".into());

        let places = PlacesConfig {
            api_key: usable_api_key(env_string("GOOGLE_PLACES_API_KEY").or(file.places.api_key)),
            base_url: env_string("GOOGLE_PLACES_BASE_URL")
                .or(file.places.base_url)
                .unwrap_or(places_defaults.base_url),
            timeout_secs: env_parsed("PLACES_TIMEOUT_SECS")
                .or(file.places.timeout_secs)
                .unwrap_or(places_defaults.timeout_secs),
            connect_timeout_secs: file
                .places
                .connect_timeout_secs
                .unwrap_or(places_defaults.connect_timeout_secs),
        };

        let proxy = ProxyConfig {
            upstream_url: env_string("PROXY_UPSTREAM_URL")
                .or(file.proxy.upstream_url)
                .unwrap_or(proxy_defaults.upstream_url),
            port: env_parsed("PROXY_PORT")
                .or(file.proxy.port)
                .unwrap_or(proxy_defaults.port),
            timeout_secs: env_parsed("PROXY_TIMEOUT_SECS")
                .or(file.proxy.timeout_secs)
                .unwrap_or(proxy_defaults.timeout_secs),
        };

        Self {
            mode,
            port,
            environment,
            places,
            proxy,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.places.api_key.is_some()
    }
}

fn load_file(path: &Path) -> anyhow::Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading config file {}: {e}", path.display()))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing config file {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 10] = [
        "MODE",
        "PORT",
        "ENVIRONMENT",
        "GOOGLE_PLACES_API_KEY",
        "GOOGLE_PLACES_BASE_URL",
        "PLACES_TIMEOUT_SECS",
        "PROXY_UPSTREAM_URL",
        "PROXY_PORT",
        "PROXY_TIMEOUT_SECS",
        "SMART_FOOD_CONFIG",
    ];

    fn clear_env() {
        for v in VARS {
            std::env::remove_var(v);
        }
    }

    #[test]
    #[serial]
    fn defaults_to_server_8080_without_key() {
        clear_env();
        let cfg = Config::from_env();
        assert_eq!(cfg.mode, "server");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.environment, "development");
        assert!(!cfg.has_api_key());
        assert_eq!(cfg.places.base_url, DEFAULT_PLACES_BASE_URL);
        assert_eq!(cfg.proxy.port, 8001);
        assert_eq!(cfg.proxy.timeout(), Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn parses_env_overrides() {
        clear_env();
        std::env::set_var("MODE", "stdio");
        std::env::set_var("PORT", "9090");
        std::env::set_var("GOOGLE_PLACES_API_KEY", "AIza-test");
        std::env::set_var("PROXY_UPSTREAM_URL", "http://upstream/mcp");
        let cfg = Config::from_env();
        assert_eq!(cfg.mode, "stdio");
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.places.api_key.as_deref(), Some("AIza-test"));
        assert_eq!(cfg.proxy.upstream_url, "http://upstream/mcp");
        clear_env();
    }

    #[test]
    #[serial]
    fn placeholder_key_counts_as_missing() {
        clear_env();
        std::env::set_var("GOOGLE_PLACES_API_KEY", PLACEHOLDER_API_KEY);
        assert!(!Config::from_env().has_api_key());
        std::env::set_var("GOOGLE_PLACES_API_KEY", "   ");
        assert!(!Config::from_env().has_api_key());
        clear_env();
    }

    #[test]
    #[serial]
    fn toml_file_is_layered_under_env() {
        clear_env();
        let dir = std::env::temp_dir().join(format!("smart-food-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            "port = 7000\nenvironment = \"staging\"\n[places]\napi_key = \"from-file\"\ntimeout_secs = 9\n[proxy]\nport = 7001\n",
        )
        .unwrap();
        std::env::set_var("SMART_FOOD_CONFIG", &path);
        std::env::set_var("PORT", "7100");

        let cfg = Config::from_env_and_toml().unwrap();
        assert_eq!(cfg.port, 7100);
        assert_eq!(cfg.environment, "staging");
        assert_eq!(cfg.places.api_key.as_deref(), Some("from-file"));
        assert_eq!(cfg.places.timeout_secs, 9);
        assert_eq!(cfg.proxy.port, 7001);

        clear_env();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    #[serial]
    fn missing_toml_file_is_an_error() {
        clear_env();
        std::env::set_var("SMART_FOOD_CONFIG", "/definitely/not/here.toml");
        assert!(Config::from_env_and_toml().is_err());
        clear_env();
    }
}
