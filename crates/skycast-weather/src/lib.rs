//! Weather data layer for SkyCast
//!
//! Provides forecast, geocoding, position, and backdrop lookups against
//! their public APIs, plus the shared data model and label formatting.

pub mod backdrop;
pub mod forecast;
pub mod format;
pub mod geocode;
pub mod locate;
pub mod request;
pub mod types;

pub use backdrop::BackdropClient;
pub use forecast::ForecastClient;
pub use geocode::{GeoCandidate, GeocodeClient};
pub use locate::{IpLocator, PositionFix};
pub use types::*;
