//! Pure request construction for the Open-Meteo endpoints.
//!
//! The renderer depends on the exact field names requested here; omitting or
//! renaming one is a contract break, so the lists live in one place.

use url::Url;

use crate::types::UnitSystem;

/// Maximum number of geocode candidates to request
pub const MAX_CANDIDATES: usize = 5;

/// Language for all geocoding responses
const LANGUAGE: &str = "en";

const CURRENT_FIELDS: [&str; 6] = [
    "temperature_2m",
    "apparent_temperature",
    "relative_humidity_2m",
    "precipitation",
    "weather_code",
    "wind_speed_10m",
];

const HOURLY_FIELDS: [&str; 5] = [
    "temperature_2m",
    "apparent_temperature",
    "precipitation",
    "weather_code",
    "wind_speed_10m",
];

const DAILY_FIELDS: [&str; 5] = [
    "weather_code",
    "temperature_2m_max",
    "temperature_2m_min",
    "precipitation_sum",
    "wind_speed_10m_max",
];

/// Unit triple sent with a forecast request
struct UnitParams {
    temperature: &'static str,
    wind_speed: &'static str,
    precipitation: &'static str,
}

fn unit_params(units: UnitSystem) -> UnitParams {
    match units {
        UnitSystem::Metric => UnitParams {
            temperature: "celsius",
            wind_speed: "kmh",
            precipitation: "mm",
        },
        UnitSystem::Imperial => UnitParams {
            temperature: "fahrenheit",
            wind_speed: "mph",
            precipitation: "inch",
        },
    }
}

/// Build a geocode search URL for a free-text query.
/// Arbitrary input is safe; the query is percent-encoded by the URL builder.
pub fn geocode_url(base: &Url, query: &str) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("name", query)
        .append_pair("count", &MAX_CANDIDATES.to_string())
        .append_pair("language", LANGUAGE)
        .append_pair("format", "json");
    url
}

/// Build a reverse geocode URL for a single nearest-match lookup.
pub fn reverse_geocode_url(base: &Url, latitude: f64, longitude: f64) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("latitude", &latitude.to_string())
        .append_pair("longitude", &longitude.to_string())
        .append_pair("language", LANGUAGE)
        .append_pair("format", "json");
    url
}

/// Build a forecast URL requesting the fixed current/hourly/daily field
/// groups with the unit triple for `units` and provider-side timezone
/// detection.
pub fn forecast_url(base: &Url, latitude: f64, longitude: f64, units: UnitSystem) -> Url {
    let params = unit_params(units);
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("latitude", &latitude.to_string())
        .append_pair("longitude", &longitude.to_string())
        .append_pair("timezone", "auto")
        .append_pair("current", &CURRENT_FIELDS.join(","))
        .append_pair("hourly", &HOURLY_FIELDS.join(","))
        .append_pair("daily", &DAILY_FIELDS.join(","))
        .append_pair("temperature_unit", params.temperature)
        .append_pair("wind_speed_unit", params.wind_speed)
        .append_pair("precipitation_unit", params.precipitation);
    url
}
