//! Domain model shared by the live and sample search paths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Most results a single search ever returns.
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceLevel {
    Free,
    Inexpensive,
    Moderate,
    Expensive,
    VeryExpensive,
    Unknown,
}

impl PriceLevel {
    pub const ALL: [PriceLevel; 6] = [
        PriceLevel::Free,
        PriceLevel::Inexpensive,
        PriceLevel::Moderate,
        PriceLevel::Expensive,
        PriceLevel::VeryExpensive,
        PriceLevel::Unknown,
    ];

    /// Map the provider's 0..=4 scale onto a label. Anything else is `Unknown`.
    pub fn from_ordinal(ordinal: Option<i64>) -> Self {
        match ordinal {
            Some(0) => PriceLevel::Free,
            Some(1) => PriceLevel::Inexpensive,
            Some(2) => PriceLevel::Moderate,
            Some(3) => PriceLevel::Expensive,
            Some(4) => PriceLevel::VeryExpensive,
            _ => PriceLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceLevel::Free => "free",
            PriceLevel::Inexpensive => "inexpensive",
            PriceLevel::Moderate => "moderate",
            PriceLevel::Expensive => "expensive",
            PriceLevel::VeryExpensive => "very_expensive",
            PriceLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceLevel {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PriceLevel::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                ToolError::Message(format!(
                    "invalid price_level '{s}'; expected one of free, inexpensive, moderate, expensive, very_expensive, unknown"
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Parse a `"lat,lng"` pair. Returns `None` for free-text locations.
    pub fn parse_pair(s: &str) -> Option<Self> {
        let (lat, lng) = s.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lng: f64 = lng.trim().parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }
        Some(Self { lat, lng })
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub user_ratings_total: u64,
    pub price_level: PriceLevel,
    pub types: Vec<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub currently_open: Option<bool>,
    pub opening_hours: Vec<String>,
    pub delivery_available: bool,
    pub takeout_available: bool,
    pub location: LatLng,
    pub google_maps_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Arguments of one `search_restaurants` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub location: String,
    pub food_type: String,
    pub radius_meters: u32,
    pub price_level: Option<PriceLevel>,
    pub open_now: bool,
}

impl SearchRequest {
    pub const DEFAULT_FOOD_TYPE: &'static str = "restaurant";
    pub const DEFAULT_RADIUS_METERS: u32 = 5000;
    pub const MAX_RADIUS_METERS: u32 = 50_000;

    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            food_type: Self::DEFAULT_FOOD_TYPE.to_string(),
            radius_meters: Self::DEFAULT_RADIUS_METERS,
            price_level: None,
            open_now: false,
        }
    }

    pub fn food_type(mut self, food_type: impl Into<String>) -> Self {
        self.food_type = food_type.into();
        self
    }

    pub fn radius_meters(mut self, radius: u32) -> Self {
        self.radius_meters = radius;
        self
    }

    pub fn price_level(mut self, price_level: Option<PriceLevel>) -> Self {
        self.price_level = price_level;
        self
    }

    pub fn open_now(mut self, open_now: bool) -> Self {
        self.open_now = open_now;
        self
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        if self.location.trim().is_empty() {
            return Err(ToolError::Message("location must not be empty".into()));
        }
        if self.food_type.trim().is_empty() {
            return Err(ToolError::Message("food_type must not be empty".into()));
        }
        if self.radius_meters == 0 || self.radius_meters > Self::MAX_RADIUS_METERS {
            return Err(ToolError::Message(format!(
                "radius_meters must be between 1 and {}",
                Self::MAX_RADIUS_METERS
            )));
        }
        Ok(())
    }

    /// Keep only records matching the requested price label and, when asked,
    /// those reported as open.
    pub fn apply_filters(&self, records: Vec<PlaceRecord>) -> Vec<PlaceRecord> {
        records
            .into_iter()
            .filter(|r| self.price_level.map_or(true, |p| r.price_level == p))
            .filter(|r| !self.open_now || r.currently_open == Some(true))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    LiveGooglePlaces,
    SampleData,
    SampleDataFallback,
    ApiError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub food_type: String,
    pub radius_meters: u32,
    pub price_level: Option<PriceLevel>,
    pub open_now: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEcho {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<LatLng>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub status: ResponseStatus,
    pub data_type: DataType,
    pub message: String,
    pub location: LocationEcho,
    pub search_params: SearchParams,
    pub results: Vec<PlaceRecord>,
    pub total_found: usize,
}

impl SearchResponse {
    pub fn success(
        req: &SearchRequest,
        data_type: DataType,
        message: impl Into<String>,
        resolved: Option<LatLng>,
        mut results: Vec<PlaceRecord>,
    ) -> Self {
        results.truncate(MAX_RESULTS);
        Self {
            status: ResponseStatus::Success,
            data_type,
            message: message.into(),
            location: LocationEcho { query: req.location.clone(), resolved },
            search_params: SearchParams::from(req),
            total_found: results.len(),
            results,
        }
    }

    pub fn error(req: &SearchRequest, data_type: DataType, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data_type,
            message: message.into(),
            location: LocationEcho { query: req.location.clone(), resolved: None },
            search_params: SearchParams::from(req),
            results: Vec::new(),
            total_found: 0,
        }
    }
}

impl From<&SearchRequest> for SearchParams {
    fn from(req: &SearchRequest) -> Self {
        Self {
            food_type: req.food_type.clone(),
            radius_meters: req.radius_meters,
            price_level: req.price_level,
            open_now: req.open_now,
        }
    }
}
