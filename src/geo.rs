//! Great-circle geometry on lat/lon coordinates.
//!
//! Everything here is plain arithmetic. Inputs are not validated:
//! results are undefined for out-of-range or NaN coordinates.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Haversine distance between two points, in kilometers.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Evenly spaced points from `from` to `to`, both endpoints included.
///
/// Produces `steps + 1` points. Zero steps is a jump: just `[to]`.
pub fn interpolate(from: Coordinate, to: Coordinate, steps: u32) -> Vec<Coordinate> {
    if steps == 0 {
        return vec![to];
    }
    let n = f64::from(steps);
    let dlat = (to.latitude - from.latitude) / n;
    let dlon = (to.longitude - from.longitude) / n;

    (0..=steps)
        .map(|i| {
            let i = f64::from(i);
            Coordinate::new(from.latitude + dlat * i, from.longitude + dlon * i)
        })
        .collect()
}

/// Whole minutes needed to walk between two points at `speed_kmh`, rounded up.
///
/// Returns 0 for a non-positive speed rather than dividing by it.
#[allow(clippy::cast_possible_truncation)]
pub fn walking_minutes(from: Coordinate, to: Coordinate, speed_kmh: f64) -> i64 {
    if speed_kmh <= 0.0 {
        return 0;
    }
    (distance_km(from, to) / speed_kmh * 60.0).ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITY_HALL: Coordinate = Coordinate::new(37.5665, 126.9780);
    const GYEONGBOKGUNG: Coordinate = Coordinate::new(37.5796, 126.9770);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance_km(CITY_HALL, CITY_HALL), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = distance_km(CITY_HALL, GYEONGBOKGUNG);
        let back = distance_km(GYEONGBOKGUNG, CITY_HALL);
        assert!((there - back).abs() < 1e-12);
    }

    #[test]
    fn city_hall_to_gyeongbokgung_is_about_one_and_a_half_km() {
        let d = distance_km(CITY_HALL, GYEONGBOKGUNG);
        assert!((1.4..1.5).contains(&d), "got {d}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn nan_propagates() {
        let d = distance_km(Coordinate::new(f64::NAN, 0.0), CITY_HALL);
        assert!(d.is_nan());
    }

    #[test]
    fn interpolate_includes_both_endpoints() {
        let path = interpolate(CITY_HALL, GYEONGBOKGUNG, 10);
        assert_eq!(path.len(), 11);
        assert_eq!(path[0], CITY_HALL);
        let last = path[10];
        assert!((last.latitude - GYEONGBOKGUNG.latitude).abs() < 1e-12);
        assert!((last.longitude - GYEONGBOKGUNG.longitude).abs() < 1e-12);
    }

    #[test]
    fn interpolate_is_evenly_spaced() {
        let path = interpolate(Coordinate::new(0.0, 0.0), Coordinate::new(4.0, 8.0), 4);
        assert_eq!(path[1], Coordinate::new(1.0, 2.0));
        assert_eq!(path[2], Coordinate::new(2.0, 4.0));
    }

    #[test]
    fn interpolate_zero_steps_jumps() {
        assert_eq!(interpolate(CITY_HALL, GYEONGBOKGUNG, 0), vec![GYEONGBOKGUNG]);
    }

    #[test]
    fn walking_time_rounds_up() {
        // ~1.46 km at 5 km/h is ~17.5 minutes.
        assert_eq!(walking_minutes(CITY_HALL, GYEONGBOKGUNG, 5.0), 18);
        assert_eq!(walking_minutes(CITY_HALL, CITY_HALL, 5.0), 0);
        assert_eq!(walking_minutes(CITY_HALL, GYEONGBOKGUNG, 0.0), 0);
    }
}
