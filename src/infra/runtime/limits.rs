use std::time::Duration;

use crate::infra::config::PlacesConfig;

/// Build a reqwest client with the given connect and total timeouts.
pub fn make_http_client(connect_timeout: Duration, timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default reqwest client");
            reqwest::Client::new()
        })
}

/// Client used for places provider calls.
pub fn make_http_client_with(cfg: &PlacesConfig) -> reqwest::Client {
    make_http_client(cfg.connect_timeout(), cfg.timeout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_client_from_places_config() {
        let cfg = PlacesConfig::default();
        let _client = make_http_client_with(&cfg);
    }
}
