//! Provider details record -> [`PlaceRecord`].

use crate::clients::PlaceDetailsWire;
use crate::domain::{LatLng, PlaceRecord, PriceLevel};

const DELIVERY_TAG: &str = "meal_delivery";
const TAKEOUT_TAG: &str = "meal_takeaway";

pub fn google_maps_url(place_id: &str) -> String {
    format!(
        "https://www.google.com/maps/place/?q=place_id:{}",
        urlencoding::encode(place_id)
    )
}

pub fn normalize(details: PlaceDetailsWire) -> PlaceRecord {
    let place_id = details.place_id.unwrap_or_default();
    let types = details.types.unwrap_or_default();
    let (currently_open, opening_hours) = match details.opening_hours {
        Some(h) => (h.open_now, h.weekday_text.unwrap_or_default()),
        None => (None, Vec::new()),
    };
    // Missing geometry pins the record to 0,0 rather than dropping it.
    let location = details
        .geometry
        .and_then(|g| g.location)
        .and_then(|l| l.into_lat_lng())
        .unwrap_or(LatLng { lat: 0.0, lng: 0.0 });

    PlaceRecord {
        google_maps_url: google_maps_url(&place_id),
        name: details.name.unwrap_or_default(),
        address: details.formatted_address.unwrap_or_default(),
        rating: details.rating.filter(|r| (0.0..=5.0).contains(r)),
        user_ratings_total: details.user_ratings_total.unwrap_or(0),
        price_level: PriceLevel::from_ordinal(details.price_level),
        delivery_available: types.iter().any(|t| t == DELIVERY_TAG),
        takeout_available: types.iter().any(|t| t == TAKEOUT_TAG),
        types,
        phone: details.formatted_phone_number,
        website: details.website,
        currently_open,
        opening_hours,
        location,
        place_id,
        note: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(v: serde_json::Value) -> PlaceDetailsWire {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn maps_a_full_record() {
        let rec = normalize(wire(json!({
            "place_id": "ChIJ123",
            "name": "Tartine",
            "formatted_address": "600 Guerrero St, San Francisco",
            "rating": 4.6,
            "user_ratings_total": 8123,
            "price_level": 2,
            "types": ["bakery", "meal_takeaway", "food"],
            "formatted_phone_number": "(415) 487-2600",
            "website": "https://tartinebakery.com",
            "opening_hours": {
                "open_now": true,
                "weekday_text": ["Monday: 8:00 AM – 5:00 PM", "Tuesday: 8:00 AM – 5:00 PM"]
            },
            "geometry": {"location": {"lat": 37.76, "lng": -122.42}}
        })));

        assert_eq!(rec.place_id, "ChIJ123");
        assert_eq!(rec.name, "Tartine");
        assert_eq!(rec.rating, Some(4.6));
        assert_eq!(rec.user_ratings_total, 8123);
        assert_eq!(rec.price_level, PriceLevel::Moderate);
        assert!(rec.takeout_available);
        assert!(!rec.delivery_available);
        assert_eq!(rec.currently_open, Some(true));
        assert_eq!(rec.opening_hours.len(), 2);
        assert_eq!(rec.location, LatLng { lat: 37.76, lng: -122.42 });
        assert_eq!(rec.google_maps_url, "https://www.google.com/maps/place/?q=place_id:ChIJ123");
        assert!(rec.note.is_none());
    }

    #[test]
    fn sparse_record_gets_defaults() {
        let rec = normalize(wire(json!({"place_id": "x", "price_level": 9})));
        assert_eq!(rec.price_level, PriceLevel::Unknown);
        assert_eq!(rec.user_ratings_total, 0);
        assert!(rec.rating.is_none());
        assert!(rec.currently_open.is_none());
        assert!(rec.opening_hours.is_empty());
        assert!(rec.types.is_empty());
        assert_eq!(rec.location, LatLng { lat: 0.0, lng: 0.0 });
    }

    #[test]
    fn wrong_types_collapse_to_absent() {
        let rec = normalize(wire(json!({
            "place_id": "x",
            "price_level": "2",
            "rating": null,
            "types": "restaurant",
            "opening_hours": {"open_now": "yes"}
        })));
        assert_eq!(rec.price_level, PriceLevel::Unknown);
        assert!(rec.rating.is_none());
        assert!(rec.types.is_empty());
        assert!(rec.currently_open.is_none());
    }

    #[test]
    fn delivery_flag_comes_from_types() {
        let rec = normalize(wire(json!({"place_id": "x", "types": ["meal_delivery", "restaurant"]})));
        assert!(rec.delivery_available);
        assert!(!rec.takeout_available);
    }
}
