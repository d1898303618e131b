//! Geographic enrichment: neighborhood selling points.

mod maps;

pub use maps::{haversine_distance_m, MapsClient, MapsConfig, MapsError};
