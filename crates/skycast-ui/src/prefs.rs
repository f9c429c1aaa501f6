//! Persisted user preferences: two independent keyed JSON entries, read at
//! startup with graceful fallback to built-in defaults on absence or parse
//! failure. Writes happen after a successful state commit and are small,
//! synchronous, and idempotent.

use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use skycast_core::StorageError;
use skycast_weather::{Place, UnitSystem};

const UNITS_KEY: &str = "units.json";
const PLACE_KEY: &str = "place.json";

/// Built-in fallback place used until the user picks one
pub fn default_place() -> Place {
    Place {
        name: "Berlin".to_string(),
        country: "DE".to_string(),
        latitude: 52.52,
        longitude: 13.41,
    }
}

/// File-backed preference store
#[derive(Debug, Clone)]
pub struct PrefsStore {
    dir: PathBuf,
}

impl PrefsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load the persisted unit system, defaulting to metric
    pub fn load_units(&self) -> UnitSystem {
        self.read_entry(UNITS_KEY).unwrap_or_default()
    }

    /// Persist the unit system
    pub fn save_units(&self, units: UnitSystem) -> Result<(), StorageError> {
        self.write_entry(UNITS_KEY, &units)
    }

    /// Load the last-selected place, defaulting to the built-in place
    pub fn load_place(&self) -> Place {
        self.read_entry(PLACE_KEY).unwrap_or_else(default_place)
    }

    /// Persist the selected place
    pub fn save_place(&self, place: &Place) -> Result<(), StorageError> {
        self.write_entry(PLACE_KEY, place)
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &'static str) -> Option<T> {
        let path = self.dir.join(key);
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                // Corrupt entries degrade silently to defaults
                tracing::warn!(key, "discarding corrupt preference entry: {}", e);
                None
            }
        }
    }

    fn write_entry<T: Serialize>(&self, key: &'static str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::WriteFailed {
            key,
            message: e.to_string(),
        })?;

        let contents = serde_json::to_string(value).map_err(|e| StorageError::WriteFailed {
            key,
            message: e.to_string(),
        })?;

        fs::write(self.dir.join(key), contents).map_err(|e| StorageError::WriteFailed {
            key,
            message: e.to_string(),
        })
    }
}
