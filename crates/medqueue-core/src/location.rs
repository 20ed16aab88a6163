//! Location types shared by the wizard, the geo collaborators and the map

use serde::{Deserialize, Serialize};

/// Radius of the first nearby-hospital search, in meters
pub const DEFAULT_RADIUS_METERS: u32 = 5_000;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters (haversine)
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

/// A candidate hospital returned by the nearby search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub name: String,
    /// Facility type as tagged upstream ("hospital", "clinic", ...)
    pub kind: String,
    pub coords: Coordinates,
}

/// Result of a nearby-hospital lookup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NearbyResults {
    pub results: Vec<Hospital>,
    /// Radius the search finally settled on
    pub radius_meters: u32,
}

/// Ephemeral step 2/3 search state: candidates plus the user's position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSearch {
    pub results: Vec<Hospital>,
    pub radius_meters: u32,
    /// Resolved user position; moves with live updates while on step 3
    pub user: Coordinates,
    /// Position the search ran against, used as the map centre
    pub center: Coordinates,
}

impl LocationSearch {
    pub fn new(center: Coordinates, nearby: NearbyResults) -> Self {
        Self {
            results: nearby.results,
            radius_meters: nearby.radius_meters,
            user: center,
            center,
        }
    }

    /// Whether the lookup had to widen past the default radius
    pub fn expanded(&self) -> bool {
        self.radius_meters > DEFAULT_RADIUS_METERS
    }

    pub fn radius_km(&self) -> u32 {
        let meters = if self.radius_meters == 0 {
            DEFAULT_RADIUS_METERS
        } else {
            self.radius_meters
        };
        meters / 1000
    }

    /// Notice line shown above the hospital list
    pub fn radius_notice(&self) -> String {
        if self.expanded() {
            format!("Expanded search to {}km", self.radius_km())
        } else {
            format!("Within {}km radius", self.radius_km())
        }
    }

    /// Distance from the user to a candidate, in kilometres
    pub fn distance_km(&self, hospital: &Hospital) -> f64 {
        self.user.distance_to(&hospital.coords) / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(radius: u32) -> LocationSearch {
        LocationSearch::new(
            Coordinates::new(15.8281, 78.0373),
            NearbyResults {
                results: vec![],
                radius_meters: radius,
            },
        )
    }

    #[test]
    fn test_distance_between_same_point_is_zero() {
        let p = Coordinates::new(12.97, 77.59);
        assert!(p.distance_to(&p) < 1e-6);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);
        let d = a.distance_to(&b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_radius_notice_default() {
        assert_eq!(search(5_000).radius_notice(), "Within 5km radius");
        assert!(!search(5_000).expanded());
    }

    #[test]
    fn test_radius_notice_expanded() {
        assert_eq!(search(20_000).radius_notice(), "Expanded search to 20km");
    }

    #[test]
    fn test_zero_radius_reads_as_default() {
        assert_eq!(search(0).radius_km(), 5);
    }

    #[test]
    fn test_new_search_puts_user_at_center() {
        let s = search(5_000);
        assert_eq!(s.user, s.center);
    }
}
