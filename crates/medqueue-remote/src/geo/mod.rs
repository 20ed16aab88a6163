//! Location collaborators: position source, live watch, geocoding

mod fixed;
mod offline;
mod osm;
mod watch;

pub use fixed::FixedPosition;
#[cfg(any(test, feature = "test-helpers"))]
pub use fixed::ScriptedPosition;
pub use offline::OfflineGeocoder;
pub use osm::OsmGeocoder;
pub use watch::{watch_position, PositionWatch, WatchOptions};

use medqueue_core::prelude::*;
use medqueue_core::{Coordinates, NearbyResults};

/// Radii tried in order by nearby searches until something is found
pub const SEARCH_RADII_METERS: [u32; 3] = [5_000, 10_000, 20_000];

/// One-shot reads of the device position
#[trait_variant::make(PositionSource: Send)]
pub trait LocalPositionSource {
    /// Read the current position.
    ///
    /// Fails with `GeolocationUnavailable` / `GeolocationDenied` when no fix
    /// can ever be produced.
    async fn current_position(&self, high_accuracy: bool) -> Result<Coordinates>;
}

/// Address resolution and nearby-hospital search
#[trait_variant::make(Geocoder: Send)]
pub trait LocalGeocoder {
    /// Resolve free text to a point; `Ok(None)` when nothing matches
    async fn resolve_address(&self, query: &str) -> Result<Option<Coordinates>>;

    /// Hospitals around `at`, widening the radius until some are found
    async fn find_nearby(&self, at: Coordinates) -> Result<NearbyResults>;
}

/// Position source selected by configuration
#[derive(Debug, Clone)]
pub enum DevicePosition {
    Fixed(FixedPosition),
    #[cfg(any(test, feature = "test-helpers"))]
    Scripted(ScriptedPosition),
}

// `Local*` and `Send` variants are both in scope here; calls name the trait.
impl PositionSource for DevicePosition {
    async fn current_position(&self, high_accuracy: bool) -> Result<Coordinates> {
        match self {
            DevicePosition::Fixed(p) => PositionSource::current_position(p, high_accuracy).await,
            #[cfg(any(test, feature = "test-helpers"))]
            DevicePosition::Scripted(p) => {
                PositionSource::current_position(p, high_accuracy).await
            },
        }
    }
}

/// Geocoder selected by configuration
#[derive(Debug, Clone)]
pub enum GeoBackend {
    Osm(OsmGeocoder),
    Offline(OfflineGeocoder),
}

impl Geocoder for GeoBackend {
    async fn resolve_address(&self, query: &str) -> Result<Option<Coordinates>> {
        match self {
            GeoBackend::Osm(g) => Geocoder::resolve_address(g, query).await,
            GeoBackend::Offline(g) => Geocoder::resolve_address(g, query).await,
        }
    }

    async fn find_nearby(&self, at: Coordinates) -> Result<NearbyResults> {
        match self {
            GeoBackend::Osm(g) => Geocoder::find_nearby(g, at).await,
            GeoBackend::Offline(g) => Geocoder::find_nearby(g, at).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_device_position_dispatches_to_source() {
        let fixed = DevicePosition::Fixed(FixedPosition::new(Some(Coordinates::new(12.97, 77.59))));
        let coords = PositionSource::current_position(&fixed, true).await.unwrap();
        assert_eq!(coords, Coordinates::new(12.97, 77.59));

        let scripted = DevicePosition::Scripted(ScriptedPosition::new().then_fix(13.0, 77.6));
        let coords = PositionSource::current_position(&scripted, false).await.unwrap();
        assert_eq!(coords, Coordinates::new(13.0, 77.6));
    }

    #[tokio::test]
    async fn test_geo_backend_dispatches_to_geocoder() {
        let backend = GeoBackend::Offline(OfflineGeocoder::bengaluru());
        let origin = Geocoder::resolve_address(&backend, "Indiranagar")
            .await
            .unwrap()
            .expect("known place");
        let nearby = Geocoder::find_nearby(&backend, origin).await.unwrap();
        assert!(!nearby.results.is_empty());
        assert_eq!(nearby.radius_meters, SEARCH_RADII_METERS[0]);
    }
}
