//! Decorative backdrop photo lookup for the committed place.
//!
//! Strictly best-effort: a failed lookup returns `None`, logs at debug, and
//! must never delay or fail the forecast flow. Primary source is a featured
//! photo service keyed by place name and country; the fallback is the
//! encyclopedia page-summary thumbnail for the place.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use skycast_core::{AppError, ReqwestErrorExt};

use crate::types::Place;

#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(default)]
    thumbnail: Option<PageImage>,
}

#[derive(Debug, Deserialize)]
struct PageImage {
    source: String,
}

/// Backdrop photo resolver
#[derive(Debug, Clone)]
pub struct BackdropClient {
    http: Arc<Client>,
    photo_base: Url,
    wiki_base: Url,
}

impl BackdropClient {
    /// Create a new backdrop client
    pub fn new(photo_base: Url, wiki_base: Url, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.into_network_error())?;

        Ok(Self {
            http: Arc::new(http),
            photo_base,
            wiki_base,
        })
    }

    /// Resolve a photo URL for `place`, or `None` when both sources fail.
    pub async fn resolve(&self, place: &Place) -> Option<String> {
        if let Some(url) = self.from_photo_service(place).await {
            return Some(url);
        }
        self.from_encyclopedia(place).await
    }

    /// Featured-photo service: answers with a redirect to a concrete image;
    /// the final URL after redirects is the backdrop.
    async fn from_photo_service(&self, place: &Place) -> Option<String> {
        let keywords = if place.country.is_empty() {
            place.name.clone()
        } else {
            format!("{},{}", place.name, place.country)
        };

        let mut url = self.photo_base.clone();
        url.query_pairs_mut().append_key_only(&keywords);

        match self.http.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                Some(response.url().to_string())
            }
            Ok(response) => {
                tracing::debug!(status = %response.status(), "photo service lookup failed");
                None
            }
            Err(e) => {
                tracing::debug!("photo service request failed: {}", e);
                None
            }
        }
    }

    /// Encyclopedia fallback: page-summary thumbnail for the place name.
    async fn from_encyclopedia(&self, place: &Place) -> Option<String> {
        let mut url = self.wiki_base.clone();
        match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.push(&place.name);
            }
            Err(()) => {
                tracing::debug!("encyclopedia base URL cannot take a title segment");
                return None;
            }
        }

        let response = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("encyclopedia request failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "encyclopedia lookup failed");
            return None;
        }

        let summary: PageSummary = match response.json().await {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!("encyclopedia parse error: {}", e);
                return None;
            }
        };

        summary.thumbnail.map(|t| t.source)
    }
}
