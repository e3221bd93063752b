//! Deterministic sample places returned when the provider is unavailable
//! or not configured. Coordinates are fixed; the requested location only
//! shows up in display text.

use crate::domain::{LatLng, PlaceRecord, PriceLevel, SearchRequest};

/// Title-case every alphabetic run, lowercasing the rest ("thai food" -> "Thai Food").
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn slug(s: &str) -> String {
    let slug: String = s
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if slug.is_empty() {
        "food".to_string()
    } else {
        slug
    }
}

fn search_url(food_type: &str, location: &str) -> String {
    format!(
        "https://www.google.com/maps/search/{}+{}",
        urlencoding::encode(food_type),
        urlencoding::encode(location)
    )
}

fn hours(table: &[&str; 7]) -> Vec<String> {
    table.iter().map(|s| s.to_string()).collect()
}

/// Both sample records, before filtering.
pub fn sample_places(req: &SearchRequest) -> Vec<PlaceRecord> {
    let food_type = req.food_type.trim();
    let title = title_case(food_type);
    let slug = slug(food_type);
    let types = vec![
        food_type.to_string(),
        "restaurant".to_string(),
        "establishment".to_string(),
    ];

    vec![
        PlaceRecord {
            place_id: format!("sample_place_1_{slug}"),
            name: format!("Sample {title} Place"),
            address: format!("123 Main St, {}", req.location),
            rating: Some(4.2),
            user_ratings_total: 156,
            price_level: PriceLevel::Moderate,
            types: types.clone(),
            phone: Some("(555) 123-4567".to_string()),
            website: Some(format!("https://sample{slug}place.com")),
            currently_open: Some(true),
            opening_hours: hours(&[
                "Monday: 7:00 AM – 9:00 PM",
                "Tuesday: 7:00 AM – 9:00 PM",
                "Wednesday: 7:00 AM – 9:00 PM",
                "Thursday: 7:00 AM – 9:00 PM",
                "Friday: 7:00 AM – 10:00 PM",
                "Saturday: 8:00 AM – 10:00 PM",
                "Sunday: 8:00 AM – 8:00 PM",
            ]),
            delivery_available: true,
            takeout_available: true,
            location: LatLng { lat: 37.7749, lng: -122.4194 },
            google_maps_url: search_url(food_type, &req.location),
            note: Some("This is sample data. Great for demos and testing!".to_string()),
        },
        PlaceRecord {
            place_id: format!("sample_place_2_{slug}"),
            name: format!("Local {title} Spot"),
            address: format!("456 Oak Ave, {}", req.location),
            rating: Some(4.5),
            user_ratings_total: 89,
            price_level: PriceLevel::Inexpensive,
            types,
            phone: Some("(555) 987-6543".to_string()),
            website: None,
            // Reported closed whenever the caller asks for open places.
            currently_open: Some(!req.open_now),
            opening_hours: hours(&[
                "Monday: Closed",
                "Tuesday: 6:00 AM – 8:00 PM",
                "Wednesday: 6:00 AM – 8:00 PM",
                "Thursday: 6:00 AM – 8:00 PM",
                "Friday: 6:00 AM – 9:00 PM",
                "Saturday: 7:00 AM – 9:00 PM",
                "Sunday: 7:00 AM – 7:00 PM",
            ]),
            delivery_available: false,
            takeout_available: true,
            location: LatLng { lat: 37.7849, lng: -122.4094 },
            google_maps_url: search_url(food_type, &req.location),
            note: Some("This is sample data. Perfect for chat automations!".to_string()),
        },
    ]
}

/// Sample places with the request's price and open-now filters applied.
pub fn generate(req: &SearchRequest) -> Vec<PlaceRecord> {
    req.apply_filters(sample_places(req))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_like_display_text() {
        assert_eq!(title_case("coffee"), "Coffee");
        assert_eq!(title_case("thai food"), "Thai Food");
        assert_eq!(title_case("BBQ-ribs"), "Bbq-Ribs");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn produces_two_named_records() {
        let req = SearchRequest::new("San Francisco, CA").food_type("coffee");
        let out = generate(&req);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Sample Coffee Place");
        assert_eq!(out[1].name, "Local Coffee Spot");
        assert_eq!(out[0].rating, Some(4.2));
        assert_eq!(out[1].rating, Some(4.5));
        assert_eq!(out[0].address, "123 Main St, San Francisco, CA");
        assert_eq!(out[0].website.as_deref(), Some("https://samplecoffeeplace.com"));
        assert!(out.iter().all(|r| r.opening_hours.len() == 7));
    }

    #[test]
    fn coordinates_ignore_requested_location() {
        let a = generate(&SearchRequest::new("Boston"));
        let b = generate(&SearchRequest::new("Tokyo"));
        assert_eq!(a[0].location, b[0].location);
        assert_eq!(a[1].location, b[1].location);
    }

    #[test]
    fn is_deterministic() {
        let req = SearchRequest::new("Boston").food_type("pizza").open_now(true);
        let a = serde_json::to_string(&generate(&req)).unwrap();
        let b = serde_json::to_string(&generate(&req)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn expensive_filter_drops_both_records() {
        let req = SearchRequest::new("Boston").price_level(Some(PriceLevel::Expensive));
        assert!(generate(&req).is_empty());
    }

    #[test]
    fn price_filter_keeps_matching_record() {
        let req = SearchRequest::new("Boston").price_level(Some(PriceLevel::Inexpensive));
        let out = generate(&req);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Local Restaurant Spot");
    }

    #[test]
    fn open_now_keeps_only_open_record() {
        let req = SearchRequest::new("Boston").open_now(true);
        let out = generate(&req);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].currently_open, Some(true));
        assert_eq!(out[0].name, "Sample Restaurant Place");
    }

    #[test]
    fn maps_url_is_encoded() {
        let out = sample_places(&SearchRequest::new("New York, NY").food_type("ramen"));
        assert_eq!(
            out[0].google_maps_url,
            "https://www.google.com/maps/search/ramen+New%20York%2C%20NY"
        );
    }
}
