use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Instant;

use crate::clients::{NearbyCandidate, NearbyQuery, PlacesProvider};
use crate::core::error::PlacesError;
use crate::domain::LatLng;
use crate::infra::config::PlacesConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client_with;

const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const NEARBY_PATH: &str = "/maps/api/place/nearbysearch/json";
const DETAILS_PATH: &str = "/maps/api/place/details/json";
const TEXT_SEARCH_PATH: &str = "/maps/api/place/textsearch/json";

/// Fields requested from the details endpoint for every candidate.
pub const DETAIL_FIELDS: &str = "name,formatted_address,rating,user_ratings_total,price_level,types,formatted_phone_number,website,opening_hours,geometry,place_id";

/// Client for the Google Geocoding and Places web services.
#[derive(Clone)]
pub struct GooglePlacesRemote {
    base: String,
    api_key: String,
    http: Client,
}

impl GooglePlacesRemote {
    pub fn new(base: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = make_http_client_with(&PlacesConfig::default());
        Self {
            base: base.into(),
            api_key: api_key.into(),
            http,
        }
    }

    pub fn from_config(cfg: &PlacesConfig) -> Result<Self, PlacesError> {
        let api_key = cfg.api_key.clone().ok_or(PlacesError::MissingCredential)?;
        Ok(Self {
            base: cfg.base_url.clone(),
            api_key,
            http: make_http_client_with(cfg),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, PlacesError> {
        let url = format!("{}{}", self.base.trim_end_matches('/'), path);
        tracing::debug!(endpoint, %url, "places request");
        let start = Instant::now();

        let (builder, rid) = add_standard_headers(self.http.get(&url), None);
        let builder = builder.query(params).query(&[("key", self.api_key.as_str())]);
        let res = Self::send_and_decode::<T>(builder).await;

        match &res {
            Ok(_) => {
                let elapsed_ms = start.elapsed().as_millis() as f64;
                crate::infra::logging::log_metric(endpoint, "remote_latency_ms", elapsed_ms);
            }
            Err(e) => {
                tracing::warn!(endpoint, request_id = %rid, kind = e.kind(), error = %e, "places request failed");
                crate::infra::logging::log_metric(endpoint, "remote_error_total", 1.0);
            }
        }
        res
    }

    async fn send_and_decode<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, PlacesError> {
        let resp = builder.send().await?;
        if !resp.status().is_success() {
            return Err(PlacesError::ProviderUnknownStatus {
                status: format!("HTTP {}", resp.status().as_u16()),
                message: None,
            });
        }
        Ok(resp.json::<T>().await?)
    }

    /// Hit one endpoint with a canned query and report the provider's raw
    /// `status`. Used by the admin CLI to find disabled APIs.
    pub async fn probe(&self, endpoint: ProbeEndpoint) -> Result<ProbeReport, PlacesError> {
        let status: StatusOnly = self
            .get_json(endpoint.label(), endpoint.path(), &endpoint.sample_params())
            .await?;
        Ok(ProbeReport {
            endpoint,
            status: status.status,
            error_message: status.error_message,
        })
    }
}

#[async_trait::async_trait]
impl PlacesProvider for GooglePlacesRemote {
    async fn geocode(&self, address: &str) -> Result<LatLng, PlacesError> {
        let body: GeocodeWire = self
            .get_json("places.geocode", GEOCODE_PATH, &[("address", address.to_string())])
            .await?;
        check_status(&body.status, body.error_message)?;
        let first = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| PlacesError::GeocodeFailed(address.to_string()))?;
        first
            .geometry
            .and_then(|g| g.location)
            .and_then(LatLngWire::into_lat_lng)
            .ok_or_else(|| PlacesError::Decode("geocode result without geometry.location".into()))
    }

    async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<NearbyCandidate>, PlacesError> {
        let mut params = vec![
            ("location", query.location.to_string()),
            ("radius", query.radius_meters.to_string()),
            ("keyword", query.keyword.clone()),
            ("type", "restaurant".to_string()),
        ];
        if query.open_now {
            params.push(("opennow", "true".to_string()));
        }
        let body: NearbyWire = self.get_json("places.nearby", NEARBY_PATH, &params).await?;
        check_status(&body.status, body.error_message)?;
        Ok(body
            .results
            .into_iter()
            .filter_map(|c| {
                Some(NearbyCandidate {
                    place_id: c.place_id?,
                    name: c.name,
                })
            })
            .collect())
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsWire, PlacesError> {
        let body: DetailsWire = self
            .get_json(
                "places.details",
                DETAILS_PATH,
                &[
                    ("place_id", place_id.to_string()),
                    ("fields", DETAIL_FIELDS.to_string()),
                ],
            )
            .await?;
        check_status(&body.status, body.error_message)?;
        let mut details = body.result.unwrap_or_default();
        if details.place_id.is_none() {
            details.place_id = Some(place_id.to_string());
        }
        Ok(details)
    }
}

/// Map a provider `status` to success or a classified error. `ZERO_RESULTS`
/// is a valid, empty answer.
fn check_status(status: &str, error_message: Option<String>) -> Result<(), PlacesError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "REQUEST_DENIED" => Err(PlacesError::ProviderRejected(
            error_message.unwrap_or_else(|| "REQUEST_DENIED".to_string()),
        )),
        other => Err(PlacesError::ProviderUnknownStatus {
            status: other.to_string(),
            message: error_message,
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeEndpoint {
    Geocode,
    TextSearch,
    NearbySearch,
    PlaceDetails,
}

impl ProbeEndpoint {
    pub const ALL: [ProbeEndpoint; 4] = [
        ProbeEndpoint::Geocode,
        ProbeEndpoint::TextSearch,
        ProbeEndpoint::NearbySearch,
        ProbeEndpoint::PlaceDetails,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProbeEndpoint::Geocode => "Geocoding API",
            ProbeEndpoint::TextSearch => "Places API - Text Search",
            ProbeEndpoint::NearbySearch => "Places API - Nearby Search",
            ProbeEndpoint::PlaceDetails => "Places API - Place Details",
        }
    }

    fn path(&self) -> &'static str {
        match self {
            ProbeEndpoint::Geocode => GEOCODE_PATH,
            ProbeEndpoint::TextSearch => TEXT_SEARCH_PATH,
            ProbeEndpoint::NearbySearch => NEARBY_PATH,
            ProbeEndpoint::PlaceDetails => DETAILS_PATH,
        }
    }

    fn sample_params(&self) -> Vec<(&'static str, String)> {
        match self {
            ProbeEndpoint::Geocode => vec![("address", "San Francisco, CA".into())],
            ProbeEndpoint::TextSearch => vec![("query", "restaurants in San Francisco".into())],
            ProbeEndpoint::NearbySearch => vec![
                ("location", "37.7749,-122.4194".into()),
                ("radius", "1000".into()),
                ("type", "restaurant".into()),
            ],
            ProbeEndpoint::PlaceDetails => vec![
                ("place_id", "ChIJIQBpAG2ahYAR_6128GcTUEo".into()),
                ("fields", "name,rating,formatted_phone_number".into()),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub endpoint: ProbeEndpoint,
    pub status: String,
    pub error_message: Option<String>,
}

impl ProbeReport {
    /// `ZERO_RESULTS` still proves the API is enabled.
    pub fn is_working(&self) -> bool {
        matches!(self.status.as_str(), "OK" | "ZERO_RESULTS")
    }

    pub fn is_blocked(&self) -> bool {
        self.status == "REQUEST_DENIED"
    }
}

/// Decode a field, collapsing absent, null and wrongly typed values to `None`.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw.and_then(|v| serde_json::from_value(v).ok()))
}

#[derive(Deserialize)]
struct StatusOnly {
    status: String,
    #[serde(default, deserialize_with = "lenient")]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeWire {
    status: String,
    #[serde(default, deserialize_with = "lenient")]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResultWire>,
}

#[derive(Deserialize)]
struct GeocodeResultWire {
    #[serde(default, deserialize_with = "lenient")]
    geometry: Option<GeometryWire>,
}

#[derive(Deserialize)]
struct NearbyWire {
    status: String,
    #[serde(default, deserialize_with = "lenient")]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<CandidateWire>,
}

#[derive(Deserialize)]
struct CandidateWire {
    #[serde(default, deserialize_with = "lenient")]
    place_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
}

#[derive(Deserialize)]
struct DetailsWire {
    status: String,
    #[serde(default, deserialize_with = "lenient")]
    error_message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    result: Option<PlaceDetailsWire>,
}

/// Raw place-details record as the provider sends it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDetailsWire {
    #[serde(default, deserialize_with = "lenient")]
    pub place_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub formatted_address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_ratings_total: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_level: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub types: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub formatted_phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub opening_hours: Option<OpeningHoursWire>,
    #[serde(default, deserialize_with = "lenient")]
    pub geometry: Option<GeometryWire>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpeningHoursWire {
    #[serde(default, deserialize_with = "lenient")]
    pub open_now: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub weekday_text: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeometryWire {
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<LatLngWire>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatLngWire {
    #[serde(default, deserialize_with = "lenient")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub lng: Option<f64>,
}

impl LatLngWire {
    pub fn into_lat_lng(self) -> Option<LatLng> {
        Some(LatLng {
            lat: self.lat?,
            lng: self.lng?,
        })
    }
}
