//! Restaurant search: live provider path with a sample-data fallback.

use std::sync::Arc;

use crate::clients::{GooglePlacesRemote, NearbyQuery, PlacesProvider};
use crate::core::error::PlacesError;
use crate::domain::{DataType, LatLng, PlaceRecord, SearchRequest, SearchResponse, MAX_RESULTS};
use crate::infra::config::PlacesConfig;

use super::{fallback, normalize};

const SAMPLE_MESSAGE: &str =
    "Sample restaurant data (no places API key configured). Great for demos and automations!";

#[derive(Clone)]
pub struct RestaurantSearch {
    provider: Option<Arc<dyn PlacesProvider>>,
}

impl RestaurantSearch {
    /// `None` runs every search against sample data.
    pub fn new(provider: Option<Arc<dyn PlacesProvider>>) -> Self {
        Self { provider }
    }

    pub fn from_config(cfg: &PlacesConfig) -> Self {
        match GooglePlacesRemote::from_config(cfg) {
            Ok(remote) => Self::new(Some(Arc::new(remote) as Arc<dyn PlacesProvider>)),
            Err(e) => {
                tracing::info!(reason = %e, "places provider disabled; serving sample data");
                Self::new(None)
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.provider.is_some()
    }

    /// Always produces a well-formed envelope; provider failures never escape.
    pub async fn search(&self, req: &SearchRequest) -> SearchResponse {
        let Some(provider) = &self.provider else {
            return sample_response(req, DataType::SampleData, SAMPLE_MESSAGE.to_string());
        };

        match search_live(provider.as_ref(), req).await {
            Ok((resolved, records)) => {
                let message = format!(
                    "Found {} places for '{}' near {}",
                    records.len(),
                    req.food_type,
                    req.location
                );
                SearchResponse::success(req, DataType::LiveGooglePlaces, message, Some(resolved), records)
            }
            Err(PlacesError::GeocodeFailed(location)) => {
                tracing::info!(%location, "location could not be geocoded");
                SearchResponse::error(
                    req,
                    DataType::ApiError,
                    format!("Could not find location: {location}"),
                )
            }
            Err(PlacesError::MissingCredential) => {
                sample_response(req, DataType::SampleData, SAMPLE_MESSAGE.to_string())
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "places provider failed; serving sample data");
                crate::infra::logging::log_metric("search_restaurants", "fallback_total", 1.0);
                sample_response(
                    req,
                    DataType::SampleDataFallback,
                    format!("Places provider unavailable ({e}); showing sample data instead"),
                )
            }
        }
    }
}

fn sample_response(req: &SearchRequest, data_type: DataType, message: String) -> SearchResponse {
    SearchResponse::success(req, data_type, message, None, fallback::generate(req))
}

/// Keyword sent to nearby-search for a food type.
pub fn keyword_for(food_type: &str) -> String {
    let trimmed = food_type.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(SearchRequest::DEFAULT_FOOD_TYPE) {
        SearchRequest::DEFAULT_FOOD_TYPE.to_string()
    } else {
        trimmed.to_string()
    }
}

async fn search_live(
    provider: &dyn PlacesProvider,
    req: &SearchRequest,
) -> Result<(LatLng, Vec<PlaceRecord>), PlacesError> {
    let resolved = match LatLng::parse_pair(&req.location) {
        Some(pair) => pair,
        None => provider.geocode(req.location.trim()).await?,
    };
    tracing::debug!(location = %req.location, %resolved, "search origin resolved");

    let query = NearbyQuery {
        location: resolved,
        radius_meters: req.radius_meters,
        keyword: keyword_for(&req.food_type),
        open_now: req.open_now,
    };
    let candidates = provider.nearby_search(&query).await?;
    tracing::debug!(candidates = candidates.len(), "nearby search returned");

    // Details are fetched before filtering, so filtered-out candidates still cost a call.
    let mut records = Vec::with_capacity(candidates.len().min(MAX_RESULTS));
    for candidate in candidates.into_iter().take(MAX_RESULTS) {
        let details = provider.place_details(&candidate.place_id).await?;
        records.push(normalize::normalize(details));
    }

    Ok((resolved, req.apply_filters(records)))
}
