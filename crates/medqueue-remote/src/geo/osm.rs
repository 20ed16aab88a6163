//! OpenStreetMap-backed geocoding (Nominatim search + Overpass API)

use std::sync::Arc;
use std::time::Duration;

use medqueue_core::prelude::*;
use medqueue_core::{Coordinates, Hospital, NearbyResults};
use serde::Deserialize;

use super::{Geocoder, SEARCH_RADII_METERS};

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
const USER_AGENT: &str = concat!("medqueue/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);
const MAX_RESULTS: usize = 20;

#[derive(Debug, Clone)]
pub struct OsmGeocoder {
    client: reqwest::Client,
    endpoints: Arc<Endpoints>,
}

#[derive(Debug)]
struct Endpoints {
    nominatim: String,
    overpass: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct OverpassReply {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: std::collections::HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OsmGeocoder {
    pub fn new() -> Result<Self> {
        Self::with_endpoints(NOMINATIM_URL, OVERPASS_URL)
    }

    pub fn with_endpoints(nominatim: &str, overpass: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoints: Arc::new(Endpoints {
                nominatim: nominatim.to_string(),
                overpass: overpass.to_string(),
            }),
        })
    }

    async fn hospitals_within(&self, at: Coordinates, radius: u32) -> Result<Vec<Hospital>> {
        let response = self
            .client
            .post(&self.endpoints.overpass)
            .form(&[("data", overpass_query(at, radius))])
            .send()
            .await
            .map_err(|e| Error::lookup(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::lookup(format!("overpass returned {status}")));
        }

        let reply: OverpassReply = response
            .json()
            .await
            .map_err(|e| Error::lookup(format!("unexpected overpass reply: {e}")))?;
        Ok(hospitals_from(reply, at))
    }
}

fn overpass_query(at: Coordinates, radius: u32) -> String {
    let around = format!("(around:{},{},{})", radius, at.latitude, at.longitude);
    format!(
        "[out:json][timeout:25];(node[\"amenity\"~\"hospital|clinic\"]{around};\
         way[\"amenity\"~\"hospital|clinic\"]{around};);out center {MAX_RESULTS};"
    )
}

/// Named facilities from an Overpass reply, nearest first
fn hospitals_from(reply: OverpassReply, at: Coordinates) -> Vec<Hospital> {
    let mut hospitals: Vec<Hospital> = reply
        .elements
        .into_iter()
        .filter_map(|el| {
            let coords = match (el.lat, el.lon, el.center) {
                (Some(lat), Some(lon), _) => Coordinates::new(lat, lon),
                (_, _, Some(c)) => Coordinates::new(c.lat, c.lon),
                _ => return None,
            };
            let name = el.tags.get("name")?.clone();
            let kind = el
                .tags
                .get("amenity")
                .cloned()
                .unwrap_or_else(|| "hospital".to_string());
            Some(Hospital { name, kind, coords })
        })
        .collect();

    hospitals.sort_by(|a, b| {
        at.distance_to(&a.coords)
            .total_cmp(&at.distance_to(&b.coords))
    });
    hospitals.truncate(MAX_RESULTS);
    hospitals
}

impl Geocoder for OsmGeocoder {
    async fn resolve_address(&self, query: &str) -> Result<Option<Coordinates>> {
        let response = self
            .client
            .get(&self.endpoints.nominatim)
            .query(&[("format", "json"), ("limit", "1"), ("q", query)])
            .send()
            .await
            .map_err(|e| Error::lookup(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::lookup(format!("nominatim returned {status}")));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| Error::lookup(format!("unexpected nominatim reply: {e}")))?;

        Ok(places.first().and_then(|p| {
            let lat = p.lat.parse().ok()?;
            let lon = p.lon.parse().ok()?;
            Some(Coordinates::new(lat, lon))
        }))
    }

    async fn find_nearby(&self, at: Coordinates) -> Result<NearbyResults> {
        for radius in SEARCH_RADII_METERS {
            let results = self.hospitals_within(at, radius).await?;
            if !results.is_empty() {
                return Ok(NearbyResults {
                    results,
                    radius_meters: radius,
                });
            }
            debug!("no hospitals within {}m, widening", radius);
        }

        Ok(NearbyResults {
            results: Vec::new(),
            radius_meters: SEARCH_RADII_METERS[SEARCH_RADII_METERS.len() - 1],
        })
    }
}
