//! Forecast client for the Open-Meteo API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use skycast_core::{AppError, DecodeError, NetworkError, ReqwestErrorExt};

use crate::request;
use crate::types::{ForecastDataset, UnitSystem};

/// HTTP client for forecast lookups
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Arc<Client>,
    base: Url,
}

impl ForecastClient {
    /// Create a new forecast client against `base`
    pub fn new(base: Url, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.into_network_error())?;

        Ok(Self {
            http: Arc::new(http),
            base,
        })
    }

    /// Fetch a complete forecast dataset for the given coordinates and units.
    ///
    /// The returned dataset has passed the parallel-array invariant check.
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        units: UnitSystem,
    ) -> Result<ForecastDataset, AppError> {
        let url = request::forecast_url(&self.base, latitude, longitude, units);
        tracing::debug!(%url, "requesting forecast");

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
                message: format!("forecast request returned {}", status),
            }
            .into());
        }

        let dataset: ForecastDataset = response
            .json()
            .await
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;

        dataset.validate()?;
        Ok(dataset)
    }
}
