//! Named Seoul landmarks.
//!
//! Fed to the planner so generated activities carry real coordinates,
//! and used as named destinations when moving the simulated traveler.

use serde::Serialize;

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Landmark {
    pub name: &'static str,
    pub coordinate: Coordinate,
}

const fn landmark(name: &'static str, latitude: f64, longitude: f64) -> Landmark {
    Landmark {
        name,
        coordinate: Coordinate::new(latitude, longitude),
    }
}

pub const SEOUL_CITY_HALL: Landmark = landmark("Seoul City Hall", 37.5665, 126.9780);

pub const SEOUL_LANDMARKS: &[Landmark] = &[
    SEOUL_CITY_HALL,
    landmark("Gyeongbokgung Palace", 37.5796, 126.9770),
    landmark("N Seoul Tower", 37.5512, 126.9882),
    landmark("Myeongdong", 37.5636, 126.9834),
    landmark("Dongdaemun", 37.5708, 127.0096),
    landmark("Hongik University Station", 37.5568, 126.9236),
    landmark("Gangnam Station", 37.4979, 127.0276),
    landmark("COEX", 37.5115, 127.0595),
    landmark("Lotte World", 37.5111, 127.0982),
    landmark("Bukchon Hanok Village", 37.5826, 126.9830),
];

/// Finds a landmark by name, ignoring ASCII case.
pub fn find(name: &str) -> Option<&'static Landmark> {
    SEOUL_LANDMARKS
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(name.trim()))
}

/// The landmark table as a JSON object of `name -> {lat, lon}`, for prompts.
pub fn to_prompt_json() -> String {
    let table: serde_json::Map<String, serde_json::Value> = SEOUL_LANDMARKS
        .iter()
        .map(|l| {
            (
                l.name.to_string(),
                serde_json::json!({ "lat": l.coordinate.latitude, "lon": l.coordinate.longitude }),
            )
        })
        .collect();
    serde_json::to_string_pretty(&table).unwrap_or_default()
}
