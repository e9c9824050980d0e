//! Great-circle distance between two coordinates.

use crate::index::Coordinate;

/// Earth radius used for every distance the crate returns.
///
/// Changing it changes the unit of all reported distances.
pub const EARTH_RADIUS_MILES: f64 = 3961.0;

/// Calculate the Haversine distance between two points, in miles
///
/// # Reference
///
/// https://en.wikipedia.org/wiki/Haversine_formula
pub fn haversine_miles(a: &Coordinate, b: &Coordinate) -> f64 {
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lng = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (delta_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_MILES * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_same_point_is_zero() {
        let origin = Coordinate::new(0.0, 0.0);
        assert_eq!(haversine_miles(&origin, &origin), 0.0);

        let midtown = Coordinate::new(40.7549, -73.9840);
        assert_eq!(haversine_miles(&midtown, &midtown), 0.0);
    }

    #[test]
    fn test_quarter_great_circle() {
        let distance = haversine_miles(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 90.0));
        let expected = EARTH_RADIUS_MILES * PI / 2.0;
        assert!(
            (distance - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            distance
        );
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (Coordinate::new(40.7128, -74.0060), Coordinate::new(34.0522, -118.2437)),
            (Coordinate::new(-33.8688, 151.2093), Coordinate::new(51.5074, -0.1278)),
            (Coordinate::new(89.9, 10.0), Coordinate::new(-89.9, -170.0)),
        ];

        for (a, b) in pairs.iter() {
            let ab = haversine_miles(a, b);
            let ba = haversine_miles(b, a);
            assert!((ab - ba).abs() < 1e-9, "{} vs {}", ab, ba);
        }
    }

    #[test]
    fn test_new_york_to_los_angeles() {
        // 约 2445 英里
        let distance = haversine_miles(
            &Coordinate::new(40.7128, -74.0060),
            &Coordinate::new(34.0522, -118.2437),
        );
        assert!((distance - 2445.0).abs() < 15.0, "got {}", distance);
    }

    #[test]
    fn test_monotonic_in_separation() {
        let origin = Coordinate::new(40.0, -73.0);
        let near = haversine_miles(&origin, &Coordinate::new(40.1, -73.0));
        let far = haversine_miles(&origin, &Coordinate::new(40.2, -73.0));
        assert!(near < far);
    }
}
