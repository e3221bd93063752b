use thiserror::Error;

/// Failures of the places provider, classified so the search orchestrator
/// can pick a response per kind.
#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("no places API key configured")]
    MissingCredential,
    #[error("could not geocode location: {0}")]
    GeocodeFailed(String),
    #[error("provider rejected the request: {0}")]
    ProviderRejected(String),
    #[error("provider returned unexpected status {status}{}", detail(.message))]
    ProviderUnknownStatus { status: String, message: Option<String> },
    #[error("network failure talking to provider: {0}")]
    NetworkFailure(String),
    #[error("could not decode provider response: {0}")]
    Decode(String),
}

impl PlacesError {
    /// Short machine-friendly tag used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PlacesError::MissingCredential => "missing_credential",
            PlacesError::GeocodeFailed(_) => "geocode_failed",
            PlacesError::ProviderRejected(_) => "provider_rejected",
            PlacesError::ProviderUnknownStatus { .. } => "provider_unknown_status",
            PlacesError::NetworkFailure(_) => "network_failure",
            PlacesError::Decode(_) => "decode",
        }
    }
}

fn detail(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// The request URL carries the API key, so it is stripped before the error
/// is rendered anywhere.
impl From<reqwest::Error> for PlacesError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_decode() {
            PlacesError::Decode(e.to_string())
        } else {
            PlacesError::NetworkFailure(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_displays_message() {
        let e = PlacesError::ProviderRejected("billing disabled".into());
        assert_eq!(e.to_string(), "provider rejected the request: billing disabled");
    }

    #[test]
    fn unknown_status_names_the_status() {
        let e = PlacesError::ProviderUnknownStatus {
            status: "OVER_QUERY_LIMIT".into(),
            message: None,
        };
        assert!(e.to_string().contains("OVER_QUERY_LIMIT"));
        assert_eq!(e.kind(), "provider_unknown_status");
    }

    #[test]
    fn unknown_status_carries_provider_message() {
        let e = PlacesError::ProviderUnknownStatus {
            status: "OVER_QUERY_LIMIT".into(),
            message: Some("You have exceeded your daily request quota".into()),
        };
        assert_eq!(
            e.to_string(),
            "provider returned unexpected status OVER_QUERY_LIMIT: You have exceeded your daily request quota"
        );
    }

    #[tokio::test]
    async fn network_error_does_not_render_the_url() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:9/maps/api/geocode/json?address=x&key=SECRET-KEY-123")
            .send()
            .await
            .unwrap_err();
        let e = PlacesError::from(err);
        assert_eq!(e.kind(), "network_failure");
        assert!(!e.to_string().contains("SECRET-KEY-123"));
        assert!(!format!("{e:?}").contains("SECRET-KEY-123"));
    }
}
