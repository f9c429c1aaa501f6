//! Pure projection from session state to a renderable view model.
//!
//! `project` is a total function of the session: same state in, same view
//! out, no side effects. Presentation adapters consume the result and make
//! no content decisions of their own.

use skycast_weather::{format, symbol_for, WeatherCondition};

use crate::session::Session;

/// Unit labels shown next to measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLabels {
    pub temperature: &'static str,
    pub wind: &'static str,
    pub precipitation: &'static str,
}

/// Current-conditions snapshot, values rounded for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub symbol: &'static str,
    pub description: &'static str,
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: i64,
    pub wind_speed: i64,
    pub precipitation: String,
}

/// One day-picker entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub label: String,
    pub symbol: &'static str,
    pub high: i64,
    pub low: i64,
    pub selected: bool,
}

/// One hourly-list entry for the selected day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourView {
    pub label: String,
    pub symbol: &'static str,
    pub temperature: i64,
}

/// Everything a presenter needs, in display form
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub place_label: String,
    pub date_label: String,
    pub units: UnitLabels,
    pub status: String,
    pub suggestions: Vec<String>,
    pub backdrop: Option<String>,
    pub current: Option<CurrentView>,
    pub daily: Vec<DayView>,
    pub hourly: Vec<HourView>,
}

/// Project session state into a view model. Idempotent; tolerates an absent
/// dataset by rendering the data-dependent sections empty.
pub fn project(session: &Session) -> ViewModel {
    let units = UnitLabels {
        temperature: session.units.temp_label(),
        wind: session.units.wind_label(),
        precipitation: session.units.precip_label(),
    };

    let suggestions = session.suggestions.iter().map(|c| c.label()).collect();

    let (date_label, current, daily, hourly) = match &session.dataset {
        Some(dataset) => {
            let date_label = dataset
                .daily
                .time
                .first()
                .map(|d| format::long_date(d))
                .unwrap_or_default();

            let reading = &dataset.current;
            let current = CurrentView {
                symbol: symbol_for(reading.weather_code),
                description: WeatherCondition::from_wmo_code(reading.weather_code).description(),
                temperature: round(reading.temperature_2m),
                feels_like: round(reading.apparent_temperature),
                humidity: round(reading.relative_humidity_2m),
                wind_speed: round(reading.wind_speed_10m),
                precipitation: precip_amount(reading.precipitation),
            };

            let daily = dataset
                .daily
                .time
                .iter()
                .enumerate()
                .map(|(i, date)| DayView {
                    label: format::short_day(date),
                    symbol: symbol_for(dataset.daily.weather_code[i]),
                    high: round(dataset.daily.temperature_2m_max[i]),
                    low: round(dataset.daily.temperature_2m_min[i]),
                    selected: i == session.selected_day,
                })
                .collect();

            let hourly = match dataset.daily.time.get(session.selected_day) {
                Some(day) => dataset
                    .hourly
                    .time
                    .iter()
                    .enumerate()
                    .filter(|(_, ts)| format::date_prefix(ts) == day.as_str())
                    .map(|(i, ts)| HourView {
                        label: format::hour_label(ts),
                        symbol: symbol_for(dataset.hourly.weather_code[i]),
                        temperature: round(dataset.hourly.temperature_2m[i]),
                    })
                    .collect(),
                None => Vec::new(),
            };

            (date_label, Some(current), daily, hourly)
        }
        None => (String::new(), None, Vec::new(), Vec::new()),
    };

    ViewModel {
        place_label: session.place.label(),
        date_label,
        units,
        status: session.status.text().to_string(),
        suggestions,
        backdrop: session.backdrop_url.clone(),
        current,
        daily,
        hourly,
    }
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

/// Precipitation amount with one decimal, trimmed when whole ("0", "1.2")
fn precip_amount(value: f64) -> String {
    let text = format!("{:.1}", value);
    match text.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}
