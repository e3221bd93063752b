//! `search_restaurants`: orchestration, provider normalization and sample data.

pub mod fallback;
pub mod normalize;
pub mod search;

pub use search::RestaurantSearch;
