//! The single mutable session aggregate and its transition functions.
//!
//! Only the controller mutates a `Session`, and every mutation is followed
//! by a render of the full aggregate, so the UI never observes a partially
//! applied transition.

use skycast_weather::{ForecastDataset, GeoCandidate, Place, UnitSystem};

/// Transient status line content
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Searching,
    Locating,
    Message(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Idle => "",
            Status::Loading => "Loading…",
            Status::Searching => "Searching…",
            Status::Locating => "Locating…",
            Status::Message(message) => message,
        }
    }
}

/// Session state: the one aggregate the whole dashboard renders from
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub units: UnitSystem,
    pub place: Place,
    pub dataset: Option<ForecastDataset>,
    /// Index into `dataset.daily.time`; always in range while a dataset is present
    pub selected_day: usize,
    pub suggestions: Vec<GeoCandidate>,
    pub backdrop_url: Option<String>,
    pub status: Status,
}

impl Session {
    pub fn new(units: UnitSystem, place: Place) -> Self {
        Self {
            units,
            place,
            dataset: None,
            selected_day: 0,
            suggestions: Vec::new(),
            backdrop_url: None,
            status: Status::Idle,
        }
    }

    /// Commit a freshly fetched dataset together with the place it was
    /// fetched for. Selecting a new place resets the day selection; a
    /// refetch for the same place (e.g. a unit toggle) keeps the selected
    /// day when it is still a valid index for the new daily series.
    pub fn commit_dataset(&mut self, place: Place, dataset: ForecastDataset) {
        if place != self.place || self.selected_day >= dataset.daily.time.len() {
            self.selected_day = 0;
        }
        self.place = place;
        self.dataset = Some(dataset);
        self.status = Status::Idle;
    }

    /// Number of days in the current daily series
    pub fn day_count(&self) -> usize {
        self.dataset
            .as_ref()
            .map(|d| d.daily.time.len())
            .unwrap_or(0)
    }

    /// Select a day by index. Returns false (and changes nothing) when the
    /// index is out of range or no dataset is present.
    pub fn select_day(&mut self, index: usize) -> bool {
        if index < self.day_count() {
            self.selected_day = index;
            true
        } else {
            false
        }
    }

    pub fn set_suggestions(&mut self, suggestions: Vec<GeoCandidate>) {
        self.suggestions = suggestions;
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use skycast_weather::{CurrentReading, DailySeries, HourlySeries};

    fn place(name: &str) -> Place {
        Place {
            name: name.into(),
            country: "DE".into(),
            latitude: 52.52,
            longitude: 13.41,
        }
    }

    fn dataset_with_days(days: usize) -> ForecastDataset {
        let time: Vec<String> = (1..=days).map(|d| format!("2026-08-{:02}", d)).collect();
        ForecastDataset {
            current: CurrentReading {
                temperature_2m: 20.0,
                apparent_temperature: 19.0,
                relative_humidity_2m: 50.0,
                precipitation: 0.0,
                weather_code: 0,
                wind_speed_10m: 10.0,
            },
            hourly: HourlySeries {
                time: vec![],
                temperature_2m: vec![],
                apparent_temperature: vec![],
                precipitation: vec![],
                weather_code: vec![],
                wind_speed_10m: vec![],
            },
            daily: DailySeries {
                time,
                weather_code: vec![0; days],
                temperature_2m_max: vec![22.0; days],
                temperature_2m_min: vec![12.0; days],
                precipitation_sum: vec![0.0; days],
                wind_speed_10m_max: vec![15.0; days],
            },
        }
    }

    #[test]
    fn test_commit_resets_day_on_place_change() {
        let mut session = Session::new(UnitSystem::Metric, place("Berlin"));
        session.commit_dataset(place("Berlin"), dataset_with_days(7));
        assert!(session.select_day(4));

        session.commit_dataset(place("Paris"), dataset_with_days(7));
        assert_eq!(session.selected_day, 0);
    }

    #[test]
    fn test_commit_keeps_valid_day_for_same_place() {
        let mut session = Session::new(UnitSystem::Metric, place("Berlin"));
        session.commit_dataset(place("Berlin"), dataset_with_days(7));
        assert!(session.select_day(4));

        // Same place refetched (unit toggle): selection survives
        session.commit_dataset(place("Berlin"), dataset_with_days(7));
        assert_eq!(session.selected_day, 4);
    }

    #[test]
    fn test_commit_clamps_out_of_range_day() {
        let mut session = Session::new(UnitSystem::Metric, place("Berlin"));
        session.commit_dataset(place("Berlin"), dataset_with_days(7));
        assert!(session.select_day(6));

        session.commit_dataset(place("Berlin"), dataset_with_days(3));
        assert!(session.selected_day < 3);
        assert_eq!(session.selected_day, 0);
    }

    #[test]
    fn test_select_day_rejects_out_of_range() {
        let mut session = Session::new(UnitSystem::Metric, place("Berlin"));
        assert!(!session.select_day(0)); // no dataset yet

        session.commit_dataset(place("Berlin"), dataset_with_days(3));
        assert!(session.select_day(2));
        assert!(!session.select_day(3));
        assert_eq!(session.selected_day, 2);
    }

    #[test]
    fn test_commit_clears_transient_status() {
        let mut session = Session::new(UnitSystem::Metric, place("Berlin"));
        session.status = Status::Loading;
        session.commit_dataset(place("Berlin"), dataset_with_days(1));
        assert_eq!(session.status, Status::Idle);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(Status::Idle.text(), "");
        assert_eq!(Status::Loading.text(), "Loading…");
        assert_eq!(Status::Searching.text(), "Searching…");
        assert_eq!(Status::Message("Place not found.".into()).text(), "Place not found.");
    }
}
