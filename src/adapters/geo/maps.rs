//! Maps Client - neighborhood selling points from a places nearby search.
//!
//! Given the property's coordinates, finds one notable place per amenity
//! category within walking distance and phrases it as a selling point
//! ("A 350m de Metro Los Leones").

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::capture::Coordinates;

/// Amenity categories probed for selling points, with the place types
/// that satisfy each.
const AMENITY_CATEGORIES: &[(&str, &[&str])] = &[
    ("metro", &["subway_station", "transit_station"]),
    ("educacion", &["school", "university"]),
    ("salud", &["hospital", "pharmacy"]),
    ("comercio", &["supermarket", "shopping_mall"]),
    ("parques", &["park"]),
];

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Configuration for the maps client.
#[derive(Debug, Clone)]
pub struct MapsConfig {
    api_key: Secret<String>,
    pub base_url: String,
    pub timeout: Duration,
    /// Search radius in meters.
    pub radius_m: u32,
}

impl MapsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://maps.googleapis.com".to_string(),
            timeout: Duration::from_secs(15),
            radius_m: 500,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Maps API errors.
#[derive(Debug, thiserror::Error)]
pub enum MapsError {
    #[error("network error: {0}")]
    Network(String),

    #[error("maps api status: {0}")]
    Api(String),
}

/// Client for the places nearby-search API.
pub struct MapsClient {
    config: MapsConfig,
    client: Client,
}

impl MapsClient {
    pub fn new(config: MapsConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// One selling point per amenity category found near the coordinates.
    pub async fn neighborhood_usps(
        &self,
        coordinates: &Coordinates,
    ) -> Result<Vec<String>, MapsError> {
        let places = self.nearby_search(coordinates).await?;

        let mut usps = Vec::new();
        for (_, types) in AMENITY_CATEGORIES {
            let hit = places
                .iter()
                .find(|place| place.types.iter().any(|t| types.contains(&t.as_str())));

            if let Some(place) = hit {
                let distance = haversine_distance_m(coordinates, &place.location());
                usps.push(format!("A {}m de {}", distance.round() as i64, place.name));
            }
        }

        debug!(count = usps.len(), "neighborhood selling points resolved");
        Ok(usps)
    }

    async fn nearby_search(&self, coordinates: &Coordinates) -> Result<Vec<Place>, MapsError> {
        let url = format!("{}/maps/api/place/nearbysearch/json", self.config.base_url);

        let response = self
            .client
            .get(url)
            .query(&[
                (
                    "location",
                    format!("{},{}", coordinates.lat, coordinates.lng),
                ),
                ("radius", self.config.radius_m.to_string()),
                ("key", self.config.api_key().to_string()),
            ])
            .send()
            .await
            .map_err(|e| MapsError::Network(e.to_string()))?;

        let body: NearbySearchResponse = response
            .json()
            .await
            .map_err(|e| MapsError::Network(e.to_string()))?;

        if body.status != "OK" && body.status != "ZERO_RESULTS" {
            warn!(status = %body.status, "places api returned a non-ok status");
            return Err(MapsError::Api(body.status));
        }

        Ok(body.results)
    }
}

/// Great-circle distance between two coordinates, in meters.
pub fn haversine_distance_m(a: &Coordinates, b: &Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(default)]
    name: String,
    #[serde(default)]
    types: Vec<String>,
    geometry: Geometry,
}

impl Place {
    fn location(&self) -> Coordinates {
        Coordinates {
            lat: self.geometry.location.lat,
            lng: self.geometry.location.lng,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_of_identical_points_is_zero() {
        let p = Coordinates {
            lat: -33.45,
            lng: -70.66,
        };
        assert_eq!(haversine_distance_m(&p, &p), 0.0);
    }

    #[test]
    fn haversine_matches_a_known_santiago_distance() {
        // Plaza de Armas to Cerro Santa Lucía, roughly 900m.
        let plaza = Coordinates {
            lat: -33.4378,
            lng: -70.6505,
        };
        let cerro = Coordinates {
            lat: -33.4403,
            lng: -70.6442,
        };

        let distance = haversine_distance_m(&plaza, &cerro);
        assert!((500.0..1500.0).contains(&distance), "got {}", distance);
    }

    #[test]
    fn nearby_search_response_parses() {
        let json = r#"{
            "status": "OK",
            "results": [
                {
                    "name": "Metro Los Leones",
                    "types": ["subway_station", "point_of_interest"],
                    "geometry": {"location": {"lat": -33.42, "lng": -70.60}}
                }
            ]
        }"#;

        let parsed: NearbySearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.results[0].name, "Metro Los Leones");
        assert!(parsed.results[0]
            .types
            .contains(&"subway_station".to_string()));
    }
}
