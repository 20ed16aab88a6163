//! Fixed place and hospital catalogue for demos and tests

use std::sync::Arc;

use medqueue_core::prelude::*;
use medqueue_core::{Coordinates, Hospital, NearbyResults};

use super::{Geocoder, SEARCH_RADII_METERS};

/// Geocoder answering from an in-memory catalogue
#[derive(Debug, Clone)]
pub struct OfflineGeocoder {
    places: Arc<Vec<(String, Coordinates)>>,
    hospitals: Arc<Vec<Hospital>>,
}

impl Default for OfflineGeocoder {
    fn default() -> Self {
        Self::bengaluru()
    }
}

impl OfflineGeocoder {
    pub fn new(places: Vec<(String, Coordinates)>, hospitals: Vec<Hospital>) -> Self {
        Self {
            places: Arc::new(places),
            hospitals: Arc::new(hospitals),
        }
    }

    /// A handful of Bengaluru neighbourhoods and facilities
    pub fn bengaluru() -> Self {
        let place = |name: &str, lat, lng| (name.to_string(), Coordinates::new(lat, lng));
        let hospital = |name: &str, kind: &str, lat, lng| Hospital {
            name: name.to_string(),
            kind: kind.to_string(),
            coords: Coordinates::new(lat, lng),
        };

        Self::new(
            vec![
                place("Indiranagar", 12.9784, 77.6408),
                place("Koramangala", 12.9352, 77.6245),
                place("Jayanagar", 12.9250, 77.5938),
                place("Whitefield", 12.9698, 77.7500),
                place("Hebbal", 13.0358, 77.5970),
                place("Devanahalli", 13.2473, 77.7120),
            ],
            vec![
                hospital("Indiranagar Community Hospital", "hospital", 12.9760, 77.6390),
                hospital("HAL Road Clinic", "clinic", 12.9660, 77.6480),
                hospital("Koramangala General", "hospital", 12.9340, 77.6220),
                hospital("St. Agnes Medical Centre", "hospital", 12.9410, 77.6130),
                hospital("Jayanagar District Hospital", "hospital", 12.9270, 77.5850),
                hospital("Whitefield Care Clinic", "clinic", 12.9720, 77.7460),
                hospital("Hebbal Lake Hospital", "hospital", 13.0390, 77.5920),
            ],
        )
    }
}

impl Geocoder for OfflineGeocoder {
    async fn resolve_address(&self, query: &str) -> Result<Option<Coordinates>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }
        Ok(self
            .places
            .iter()
            .find(|(name, _)| {
                let name = name.to_lowercase();
                needle.contains(&name) || name.contains(&needle)
            })
            .map(|(_, coords)| *coords))
    }

    async fn find_nearby(&self, at: Coordinates) -> Result<NearbyResults> {
        for radius in SEARCH_RADII_METERS {
            let mut results: Vec<Hospital> = self
                .hospitals
                .iter()
                .filter(|h| at.distance_to(&h.coords) <= f64::from(radius))
                .cloned()
                .collect();
            if !results.is_empty() {
                results.sort_by(|a, b| {
                    at.distance_to(&a.coords)
                        .total_cmp(&at.distance_to(&b.coords))
                });
                return Ok(NearbyResults {
                    results,
                    radius_meters: radius,
                });
            }
            debug!("offline catalogue: nothing within {}m", radius);
        }

        Ok(NearbyResults {
            results: Vec::new(),
            radius_meters: SEARCH_RADII_METERS[SEARCH_RADII_METERS.len() - 1],
        })
    }
}
