use serde::{Deserialize, Serialize};
use skycast_core::DecodeError;

/// Measurement unit system preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Display label for temperatures
    pub fn temp_label(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
        }
    }

    /// Display label for wind speeds
    pub fn wind_label(&self) -> &'static str {
        match self {
            Self::Metric => "km/h",
            Self::Imperial => "mph",
        }
    }

    /// Display label for precipitation amounts
    pub fn precip_label(&self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Imperial => "in",
        }
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            other => Err(format!("unknown unit system: {}", other)),
        }
    }
}

/// A named geographic point (city-level) with coordinates and country code.
/// Immutable once constructed; replaced wholesale on selection change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    /// ISO-2 country code, or empty when unknown
    #[serde(default)]
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    /// Display label, e.g. "Paris, FR" or just "Paris" when the country is unknown
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    FreezingRain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51 | 53 | 55 | 56 | 57 => Self::Drizzle, // 56/57: freezing drizzle
            61 | 63 | 65 | 80 | 81 | 82 => Self::Rain,
            66 | 67 => Self::FreezingRain,
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear sky",
            Self::MainlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }

    /// Display glyph for the condition
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::MainlyClear => "🌤️",
            Self::PartlyCloudy => "⛅",
            Self::Overcast => "☁️",
            Self::Fog => "🌫️",
            Self::Drizzle => "🌦️",
            Self::Rain => "🌧️",
            Self::FreezingRain => "🌧️",
            Self::Snow => "❄️",
            Self::Thunderstorm => "⛈️",
            Self::Unknown => "🌡️",
        }
    }
}

/// Display symbol for a raw WMO code; never fails
pub fn symbol_for(code: i32) -> &'static str {
    WeatherCondition::from_wmo_code(code).symbol()
}

/// Conditions at "now" per the provider's current timezone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReading {
    pub temperature_2m: f64,
    pub apparent_temperature: f64,
    pub relative_humidity_2m: f64,
    #[serde(default)]
    pub precipitation: f64,
    pub weather_code: i32,
    pub wind_speed_10m: f64,
}

/// Hourly parallel series, index-aligned across all arrays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    /// ISO-8601 local-time strings in the dataset's timezone
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub apparent_temperature: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub weather_code: Vec<i32>,
    pub wind_speed_10m: Vec<f64>,
}

impl HourlySeries {
    fn validate(&self) -> Result<(), DecodeError> {
        let expected = self.time.len();
        check_len("hourly", "temperature_2m", expected, self.temperature_2m.len())?;
        check_len(
            "hourly",
            "apparent_temperature",
            expected,
            self.apparent_temperature.len(),
        )?;
        check_len("hourly", "precipitation", expected, self.precipitation.len())?;
        check_len("hourly", "weather_code", expected, self.weather_code.len())?;
        check_len("hourly", "wind_speed_10m", expected, self.wind_speed_10m.len())?;
        check_ascending("hourly", &self.time)?;
        Ok(())
    }
}

/// Daily parallel series, one entry per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    /// ISO-8601 date strings in the dataset's timezone
    pub time: Vec<String>,
    pub weather_code: Vec<i32>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub precipitation_sum: Vec<f64>,
    pub wind_speed_10m_max: Vec<f64>,
}

impl DailySeries {
    fn validate(&self) -> Result<(), DecodeError> {
        let expected = self.time.len();
        check_len("daily", "weather_code", expected, self.weather_code.len())?;
        check_len(
            "daily",
            "temperature_2m_max",
            expected,
            self.temperature_2m_max.len(),
        )?;
        check_len(
            "daily",
            "temperature_2m_min",
            expected,
            self.temperature_2m_min.len(),
        )?;
        check_len(
            "daily",
            "precipitation_sum",
            expected,
            self.precipitation_sum.len(),
        )?;
        check_len(
            "daily",
            "wind_speed_10m_max",
            expected,
            self.wind_speed_10m_max.len(),
        )?;
        check_ascending("daily", &self.time)?;
        Ok(())
    }
}

fn check_len(
    series: &'static str,
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), DecodeError> {
    if actual == expected {
        Ok(())
    } else {
        Err(DecodeError::SeriesMismatch {
            series,
            field,
            expected,
            actual,
        })
    }
}

// ISO-8601 strings in one fixed timezone compare correctly as strings.
fn check_ascending(series: &'static str, timestamps: &[String]) -> Result<(), DecodeError> {
    let ordered = timestamps.windows(2).all(|pair| pair[0] < pair[1]);
    if ordered {
        Ok(())
    } else {
        Err(DecodeError::Malformed(format!(
            "{} timestamps are not strictly increasing",
            series
        )))
    }
}

/// Complete forecast payload for one place and unit system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDataset {
    pub current: CurrentReading,
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

impl ForecastDataset {
    /// Check the parallel-array invariants the renderer relies on
    pub fn validate(&self) -> Result<(), DecodeError> {
        self.hourly.validate()?;
        self.daily.validate()?;
        Ok(())
    }
}
