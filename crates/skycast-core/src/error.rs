//! Centralized error types for the SkyCast application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for the status line
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// All errors in the SkyCast application should be convertible to this type.
/// Use `user_message()` to get a status-line-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for the status line.
    ///
    /// These messages are designed to be actionable and non-technical.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Geocode(e) => e.user_message(),
            AppError::Location(e) => e.user_message(),
            AppError::Decode(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "Could not load forecast. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Geocoding errors (place search and reverse lookup).
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("No results for query: {0}")]
    NoResults(String),

    #[error("Geocoding service error: {0}")]
    Service(String),
}

impl GeocodeError {
    pub fn user_message(&self) -> &'static str {
        match self {
            GeocodeError::NoResults(_) => "Place not found.",
            GeocodeError::Service(_) => "Search failed. Try again.",
        }
    }
}

/// Position lookup errors (the geolocation stand-in).
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    Denied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::Denied => "Permission denied for location.",
            LocationError::Unavailable(_) => "Couldn't get your location.",
        }
    }
}

/// Payload decoding errors (malformed or inconsistent provider data).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Series length mismatch in {series}: {field} has {actual} entries, expected {expected}")]
    SeriesMismatch {
        series: &'static str,
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl DecodeError {
    pub fn user_message(&self) -> &'static str {
        "Received malformed weather data. Please try again."
    }
}

/// Persisted preference errors (saved units/place entries).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Corrupt entry for key {key}: {message}")]
    Corrupt { key: &'static str, message: String },

    #[error("Write failed for key {key}: {message}")]
    WriteFailed { key: &'static str, message: String },
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Corrupt { .. } => "Saved preferences were unreadable. Using defaults.",
            StorageError::WriteFailed { .. } => "Could not save preferences.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let geo_err = GeocodeError::NoResults("atlantis".into());
        let app_err: AppError = geo_err.into();
        assert!(matches!(app_err, AppError::Geocode(GeocodeError::NoResults(_))));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Geocode(GeocodeError::NoResults("atlantis".into()));
        assert_eq!(app_err.user_message(), "Place not found.");
    }

    #[test]
    fn test_server_error_messages_by_status() {
        let transient = NetworkError::ServerError {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(transient.user_message().contains("try again later"));

        let client_side = NetworkError::ServerError {
            status: 404,
            message: "not found".into(),
        };
        assert_eq!(client_side.user_message(), "Could not load forecast. Please try again.");
    }

    #[test]
    fn test_location_messages() {
        assert_eq!(
            LocationError::Denied.user_message(),
            "Permission denied for location."
        );
        assert_eq!(
            LocationError::Unavailable("no backend".into()).user_message(),
            "Couldn't get your location."
        );
    }

    #[test]
    fn test_series_mismatch_display() {
        let err = DecodeError::SeriesMismatch {
            series: "hourly",
            field: "temperature_2m",
            expected: 24,
            actual: 23,
        };
        let msg = err.to_string();
        assert!(msg.contains("hourly"));
        assert!(msg.contains("temperature_2m"));
        assert!(msg.contains("23"));
    }
}
