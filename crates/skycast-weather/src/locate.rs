//! Best-effort position lookup, standing in for a platform location service.
//!
//! Uses an IP geolocation endpoint; city-level accuracy is enough for a
//! forecast. Callers should reverse-geocode the fix for a better label.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use skycast_core::{AppError, LocationError, ReqwestErrorExt};

/// A resolved position with optional place-name hints
#[derive(Debug, Clone, PartialEq)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    city: Option<String>,
    #[serde(rename = "countryCode", default)]
    country_code: Option<String>,
}

/// IP-based locator client
#[derive(Debug, Clone)]
pub struct IpLocator {
    http: Arc<Client>,
    base: Url,
}

impl IpLocator {
    /// Create a new locator against `base`
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

    /// Resolve the machine's current position.
    pub async fn position(&self) -> Result<PositionFix, LocationError> {
        let response = self
            .http
            .get(self.base.clone())
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::Unavailable(format!(
                "location service returned {}",
                status
            )));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| "lookup failed".to_string());
            tracing::debug!(%reason, "ip location lookup failed");
            return Err(LocationError::Unavailable(reason));
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(PositionFix {
                latitude,
                longitude,
                city: body.city.filter(|c| !c.is_empty()),
                country_code: body.country_code.filter(|c| !c.is_empty()),
            }),
            _ => Err(LocationError::Unavailable(
                "response missing coordinates".to_string(),
            )),
        }
    }
}
