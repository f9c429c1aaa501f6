//! Forward and reverse geocoding against the Open-Meteo geocoding API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use skycast_core::{AppError, DecodeError, GeocodeError, NetworkError, ReqwestErrorExt};

use crate::request;
use crate::types::Place;

/// One geocoding candidate as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCandidate {
    pub name: String,
    /// Administrative region (state/province), when known
    #[serde(default)]
    pub admin1: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCandidate {
    /// Suggestion-list label, e.g. "Paris, Île-de-France, FR"
    pub fn label(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if let Some(admin) = self.admin1.as_ref().filter(|a| !a.is_empty()) {
            parts.push(admin.clone());
        }
        if let Some(country) = self.country_code.as_ref().filter(|c| !c.is_empty()) {
            parts.push(country.clone());
        }
        parts.join(", ")
    }

    /// Convert into the application's Place representation
    pub fn into_place(self) -> Place {
        Place {
            name: self.name,
            country: self.country_code.unwrap_or_default(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Option<Vec<GeoCandidate>>,
}

/// HTTP client for geocoding lookups
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: Arc<Client>,
    search_base: Url,
    reverse_base: Url,
}

impl GeocodeClient {
    /// Create a new geocoding client
    pub fn new(search_base: Url, reverse_base: Url, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.into_network_error())?;

        Ok(Self {
            http: Arc::new(http),
            search_base,
            reverse_base,
        })
    }

    /// Search for places matching `query`, best-ranked first.
    /// At most `request::MAX_CANDIDATES` candidates are returned; zero
    /// matches is an empty list, not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<GeoCandidate>, AppError> {
        let url = request::geocode_url(&self.search_base, query);
        tracing::debug!(%url, "geocode search");

        let body = self.get_json(url).await?;
        let mut candidates = body.results.unwrap_or_default();
        candidates.truncate(request::MAX_CANDIDATES);
        Ok(candidates)
    }

    /// Search and take the best-ranked match; zero results is an error.
    pub async fn first_match(&self, query: &str) -> Result<GeoCandidate, AppError> {
        self.search(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoResults(query.to_string()).into())
    }

    /// Reverse geocode coordinates to the nearest known place, if any.
    pub async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<GeoCandidate>, AppError> {
        let url = request::reverse_geocode_url(&self.reverse_base, latitude, longitude);
        tracing::debug!(%url, "reverse geocode");

        let body = self.get_json(url).await?;
        Ok(body.results.unwrap_or_default().into_iter().next())
    }

    async fn get_json(&self, url: Url) -> Result<GeocodeResponse, AppError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Network(e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message: format!("geocode request returned {}", status),
            }
            .into());
        }

        response
            .json()
            .await
            .map_err(|e| DecodeError::Malformed(e.to_string()).into())
    }
}
