//! Controller flow tests: the event loop driven deterministically against a
//! mock HTTP server. Service completions are pumped from the channel and fed
//! back by hand, so interleavings (including stale ones) are reproducible.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast_core::Config;
use skycast_ui::controller::Event;
use skycast_ui::{project, Command, Controller, Presenter, Status, ViewModel};
use skycast_weather::UnitSystem;

struct SilentPresenter;

impl Presenter for SilentPresenter {
    fn present(&mut self, _view: &ViewModel) {}
}

struct Harness {
    controller: Controller,
    rx: Receiver<Event>,
    server: MockServer,
    _config_dir: tempfile::TempDir,
    runtime: tokio::runtime::Runtime,
}

impl Harness {
    fn new(debounce_ms: u64) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let server = runtime.block_on(MockServer::start());
        let config_dir = tempfile::tempdir().unwrap();

        let mut config = Config::default();
        config.config_dir = config_dir.path().to_path_buf();
        config.services.forecast_url = format!("{}/v1/forecast", server.uri());
        config.services.geocode_search_url = format!("{}/v1/search", server.uri());
        config.services.geocode_reverse_url = format!("{}/v1/reverse", server.uri());
        config.services.locate_url = format!("{}/ip", server.uri());
        config.services.photo_url = format!("{}/photo", server.uri());
        config.services.wiki_summary_url = format!("{}/wiki", server.uri());
        config.services.request_timeout_secs = 5;
        config.ui.debounce_ms = debounce_ms;

        let (tx, rx) = mpsc::channel();
        let controller = Controller::new(
            &config,
            runtime.handle().clone(),
            tx,
            Box::new(SilentPresenter),
        )
        .unwrap();

        Self {
            controller,
            rx,
            server,
            _config_dir: config_dir,
            runtime,
        }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Receive the next completion and apply it
    fn pump_one(&mut self) -> &'static str {
        let event = self.rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let kind = kind_of(&event);
        self.controller.handle_event(event);
        kind
    }

    /// Pump completions until `count` forecast results have been applied
    fn pump_until_forecasts(&mut self, count: usize) {
        let mut seen = 0;
        while seen < count {
            if self.pump_one() == "forecast" {
                seen += 1;
            }
        }
    }

    /// Pump completions until one of `kind` has been applied, skipping
    /// leftovers from earlier triggers (e.g. stale backdrop lookups)
    fn pump_until(&mut self, kind: &'static str) {
        while self.pump_one() != kind {}
    }

    fn command(&mut self, command: Command) {
        self.controller.handle_event(Event::Command(command));
    }
}

fn kind_of(event: &Event) -> &'static str {
    match event {
        Event::Command(_) => "command",
        Event::DebounceElapsed { .. } => "debounce",
        Event::Suggestions { .. } => "suggestions",
        Event::PlaceResolved { .. } => "place",
        Event::Forecast { .. } => "forecast",
        Event::Backdrop { .. } => "backdrop",
    }
}

fn forecast_body(current_temp: f64) -> serde_json::Value {
    serde_json::json!({
        "current": {
            "temperature_2m": current_temp,
            "apparent_temperature": current_temp - 1.2,
            "relative_humidity_2m": 45,
            "precipitation": 0.0,
            "weather_code": 2,
            "wind_speed_10m": 12.4
        },
        "hourly": {
            "time": ["2026-08-07T10:00", "2026-08-07T11:00"],
            "temperature_2m": [18.4, 19.1],
            "apparent_temperature": [17.9, 18.6],
            "precipitation": [0.0, 0.0],
            "weather_code": [1, 2],
            "wind_speed_10m": [10.0, 9.0]
        },
        "daily": {
            "time": ["2026-08-07"],
            "weather_code": [2],
            "temperature_2m_max": [24.4],
            "temperature_2m_min": [14.5],
            "precipitation_sum": [0.0],
            "wind_speed_10m_max": [18.0]
        }
    })
}

fn geocode_result(name: &str, country: &str, latitude: f64, longitude: f64) -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "name": name,
            "admin1": "Region",
            "country_code": country,
            "latitude": latitude,
            "longitude": longitude
        }]
    })
}

#[test]
fn search_submit_renders_place_and_rounded_temperature() {
    let mut h = Harness::new(300);

    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Paris"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geocode_result("Paris", "FR", 48.85, 2.35)),
            ),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "48.85"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(21.6))),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/photo"))
            .respond_with(ResponseTemplate::new(200)),
    );

    h.command(Command::Search("Paris".into()));
    assert_eq!(h.controller.session().status, Status::Searching);

    assert_eq!(h.pump_one(), "place");
    assert_eq!(h.controller.session().status, Status::Loading);

    h.pump_until_forecasts(1);

    let session = h.controller.session();
    assert_eq!(session.place.label(), "Paris, FR");
    assert_eq!(session.status, Status::Idle);

    let view = project(session);
    assert_eq!(view.place_label, "Paris, FR");
    assert_eq!(view.current.as_ref().unwrap().temperature, 22);

    // Backdrop resolves afterwards, tagged with the same load
    assert_eq!(h.pump_one(), "backdrop");
    assert!(h.controller.session().backdrop_url.is_some());
}

#[test]
fn stale_forecast_response_is_discarded() {
    let mut h = Harness::new(300);

    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Aville"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geocode_result("Aville", "AA", 10.0, 10.0)),
            ),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Bville"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geocode_result("Bville", "BB", 20.0, 20.0)),
            ),
    );
    // A's forecast is slow; B's answers immediately
    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "10"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(forecast_body(10.0))
                    .set_delay(Duration::from_millis(800)),
            ),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(20.0))),
    );
    h.mount(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404)),
    );

    h.command(Command::Search("Aville".into()));
    assert_eq!(h.pump_one(), "place"); // A resolves, its fetch starts

    h.command(Command::Search("Bville".into()));
    assert_eq!(h.pump_one(), "place"); // B resolves, supersedes A

    // Both fetches complete; B first, A (stale) afterwards
    h.pump_until_forecasts(2);

    let session = h.controller.session();
    assert_eq!(session.place.name, "Bville");
    assert_eq!(
        session.dataset.as_ref().unwrap().current.temperature_2m,
        20.0
    );
}

#[test]
fn autocomplete_coalesces_keystrokes_into_one_lookup() {
    let mut h = Harness::new(200);

    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "London"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geocode_result("London", "GB", 51.51, -0.13)),
            )
            .expect(1),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "51.51"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(16.0))),
    );
    h.mount(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404)),
    );

    h.command(Command::Input("Lon".into()));
    h.command(Command::Input("Lond".into()));
    h.command(Command::Input("London".into()));

    assert_eq!(h.pump_one(), "debounce"); // only the final timer fires
    assert_eq!(h.pump_one(), "suggestions");

    let session = h.controller.session();
    assert_eq!(session.suggestions.len(), 1);
    assert_eq!(session.suggestions[0].label(), "London, Region, GB");

    // Picking the suggestion closes the list and loads its forecast
    h.command(Command::Pick(0));
    assert!(h.controller.session().suggestions.is_empty());
    h.pump_until_forecasts(1);
    assert_eq!(h.controller.session().place.label(), "London, GB");

    let server = &h.server;
    h.runtime.block_on(server.verify());
}

#[test]
fn emptied_query_clears_suggestions_without_network() {
    let mut h = Harness::new(100);

    // No mocks mounted: any request here would fail loudly, but none fires
    h.command(Command::Input("Lon".into()));
    h.command(Command::Input(String::new()));

    assert!(h.controller.session().suggestions.is_empty());
    // The cancelled timer never delivers its event
    assert!(h
        .rx
        .recv_timeout(Duration::from_millis(400))
        .is_err());
}

#[test]
fn unit_toggle_refetches_with_imperial_parameters() {
    let mut h = Harness::new(300);

    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("temperature_unit", "celsius"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(22.0))),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("wind_speed_unit", "mph"))
            .and(query_param("precipitation_unit", "inch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(71.6)))
            .expect(1),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/photo"))
            .respond_with(ResponseTemplate::new(404)),
    );
    h.mount(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404)),
    );

    // Startup load for the default place, in metric
    let place = h.controller.session().place.clone();
    h.controller.load_forecast(place);
    h.pump_until_forecasts(1);
    assert_eq!(h.controller.session().units, UnitSystem::Metric);

    h.command(Command::Units(UnitSystem::Imperial));
    h.pump_until_forecasts(1);

    let session = h.controller.session();
    assert_eq!(session.units, UnitSystem::Imperial);
    assert_eq!(
        session.dataset.as_ref().unwrap().current.temperature_2m,
        71.6
    );

    let view = project(session);
    assert_eq!(view.units.temperature, "°F");
    assert_eq!(view.units.wind, "mph");
    assert_eq!(view.units.precipitation, "in");

    // The toggle is persisted independently of the place
    let prefs = skycast_ui::PrefsStore::new(h._config_dir.path());
    assert_eq!(prefs.load_units(), UnitSystem::Imperial);

    let server = &h.server;
    h.runtime.block_on(server.verify());
}

#[test]
fn failed_load_keeps_previous_dataset() {
    let mut h = Harness::new(300);

    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "52.52"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(18.0))),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Xville"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geocode_result("Xville", "XX", 30.0, 30.0)),
            ),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "30"))
            .respond_with(ResponseTemplate::new(500)),
    );
    h.mount(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404)),
    );

    // Healthy startup load for the default place (Berlin)
    let place = h.controller.session().place.clone();
    h.controller.load_forecast(place);
    h.pump_until_forecasts(1);
    assert!(h.controller.session().dataset.is_some());

    // The next trigger fails server-side
    h.command(Command::Search("Xville".into()));
    h.pump_until("place");
    h.pump_until_forecasts(1);

    let session = h.controller.session();
    // Previously displayed data survives; only the status reports the failure
    assert_eq!(session.place.name, "Berlin");
    assert_eq!(
        session.dataset.as_ref().unwrap().current.temperature_2m,
        18.0
    );
    assert!(matches!(session.status, Status::Message(_)));

    // Retrying the same trigger family still works
    h.command(Command::Refresh);
    h.pump_until_forecasts(1);
    assert_eq!(h.controller.session().status, Status::Idle);
}

#[test]
fn locate_uses_reverse_geocoded_label() {
    let mut h = Harness::new(300);

    h.mount(
        Mock::given(method("GET"))
            .and(path("/ip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "lat": 52.52,
                "lon": 13.41,
                "city": "Berlin",
                "countryCode": "DE"
            }))),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/reverse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(geocode_result("Berlin", "DE", 52.52, 13.41)),
            ),
    );
    h.mount(
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(19.0))),
    );
    h.mount(
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404)),
    );

    h.command(Command::Locate);
    assert_eq!(h.controller.session().status, Status::Locating);

    assert_eq!(h.pump_one(), "place");
    h.pump_until_forecasts(1);

    let session = h.controller.session();
    assert_eq!(session.place.label(), "Berlin, DE");
    assert_eq!(session.place.latitude, 52.52);
    assert_eq!(session.status, Status::Idle);
}

#[test]
fn locate_failure_changes_nothing_but_status() {
    let mut h = Harness::new(300);

    h.mount(
        Mock::given(method("GET"))
            .and(path("/ip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "private range"
            }))),
    );

    let place_before = h.controller.session().place.clone();

    h.command(Command::Locate);
    assert_eq!(h.pump_one(), "place");

    let session = h.controller.session();
    assert_eq!(session.place, place_before);
    assert!(session.dataset.is_none());
    assert_eq!(
        session.status,
        Status::Message("Couldn't get your location.".into())
    );
}
