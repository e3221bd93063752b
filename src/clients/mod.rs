//! Outbound provider clients.

pub mod google_places;

use crate::core::error::PlacesError;
use crate::domain::LatLng;

pub use google_places::{GooglePlacesRemote, PlaceDetailsWire};

/// Parameters of a nearby-search call.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub location: LatLng,
    pub radius_meters: u32,
    pub keyword: String,
    pub open_now: bool,
}

/// One nearby-search hit; details are fetched separately.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyCandidate {
    pub place_id: String,
    pub name: Option<String>,
}

/// The three provider operations the search needs. Implemented by
/// [`GooglePlacesRemote`] and by test doubles.
#[async_trait::async_trait]
pub trait PlacesProvider: Send + Sync + 'static {
    async fn geocode(&self, address: &str) -> Result<LatLng, PlacesError>;
    async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<NearbyCandidate>, PlacesError>;
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsWire, PlacesError>;
}
