//! The forecast session controller.
//!
//! One thread owns the `Session` and consumes a single event channel fed by
//! the input reader and by async service tasks. Service completions carry
//! the generation tag of the request that caused them; a completion whose
//! tag is no longer current is discarded, so the latest trigger wins by
//! trigger order regardless of network completion order.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use url::Url;

use skycast_core::{AppError, Config};
use skycast_weather::{
    BackdropClient, ForecastClient, ForecastDataset, GeoCandidate, GeocodeClient, IpLocator,
    Place, UnitSystem,
};

use crate::command::{Command, USAGE};
use crate::prefs::PrefsStore;
use crate::presenter::Presenter;
use crate::session::{Session, Status};
use crate::view::{self, ViewModel};

/// Which trigger asked for a place resolution, for failure wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOrigin {
    Search,
    Locate,
}

/// Events consumed by the controller loop: user commands plus tagged
/// completions of async work. Completion order is arbitrary.
#[derive(Debug)]
pub enum Event {
    Command(Command),
    /// The autocomplete quiescence window elapsed for `query`
    DebounceElapsed { generation: u64, query: String },
    /// A suggestion lookup finished
    Suggestions {
        generation: u64,
        result: Result<Vec<GeoCandidate>, AppError>,
    },
    /// A place-changing trigger resolved to a concrete place
    PlaceResolved {
        generation: u64,
        origin: ResolveOrigin,
        result: Result<Place, AppError>,
    },
    /// A forecast load finished for the tagged request
    Forecast {
        generation: u64,
        place: Place,
        units: UnitSystem,
        result: Result<ForecastDataset, AppError>,
    },
    /// A backdrop lookup finished for the tagged forecast load
    Backdrop { generation: u64, url: Option<String> },
}

/// Loop outcome of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Controller {
    session: Session,
    prefs: PrefsStore,
    handle: Handle,
    tx: Sender<Event>,
    forecast: Arc<ForecastClient>,
    geocode: Arc<GeocodeClient>,
    locator: Arc<IpLocator>,
    backdrop: Arc<BackdropClient>,
    presenter: Box<dyn Presenter>,
    debounce: Duration,
    /// Tag of the newest place/forecast trigger; only its completions apply
    forecast_generation: u64,
    /// Tag of the newest suggestion lookup
    suggest_generation: u64,
    /// Cancels the pending debounce timer when a newer keystroke arrives
    debounce_guard: Option<CancellationToken>,
    last_view: Option<ViewModel>,
}

impl Controller {
    /// Build a controller and its service clients from configuration.
    /// Persisted preferences are loaded here; absent or corrupt entries
    /// fall back to the built-in defaults.
    pub fn new(
        config: &Config,
        handle: Handle,
        tx: Sender<Event>,
        presenter: Box<dyn Presenter>,
    ) -> Result<Self> {
        let timeout = Duration::from_secs(config.services.request_timeout_secs);

        let forecast_base =
            Url::parse(&config.services.forecast_url).context("invalid forecast URL")?;
        let search_base = Url::parse(&config.services.geocode_search_url)
            .context("invalid geocode search URL")?;
        let reverse_base = Url::parse(&config.services.geocode_reverse_url)
            .context("invalid geocode reverse URL")?;
        let locate_base = Url::parse(&config.services.locate_url).context("invalid locate URL")?;
        let photo_base = Url::parse(&config.services.photo_url).context("invalid photo URL")?;
        let wiki_base =
            Url::parse(&config.services.wiki_summary_url).context("invalid wiki summary URL")?;

        let prefs = PrefsStore::new(&config.config_dir);
        let units = prefs.load_units();
        let place = prefs.load_place();
        tracing::info!(place = %place.label(), units = units.as_str(), "session restored");

        Ok(Self {
            session: Session::new(units, place),
            prefs,
            handle,
            tx,
            forecast: Arc::new(ForecastClient::new(forecast_base, timeout)?),
            geocode: Arc::new(GeocodeClient::new(search_base, reverse_base, timeout)?),
            locator: Arc::new(IpLocator::new(locate_base, timeout)?),
            backdrop: Arc::new(BackdropClient::new(photo_base, wiki_base, timeout)?),
            presenter,
            debounce: Duration::from_millis(config.ui.debounce_ms),
            forecast_generation: 0,
            suggest_generation: 0,
            debounce_guard: None,
            last_view: None,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Issue the startup load and consume events until exit.
    pub fn run(&mut self, rx: &Receiver<Event>) -> Result<()> {
        self.load_forecast(self.session.place.clone());
        self.render();

        while let Ok(event) = rx.recv() {
            if self.handle_event(event) == Flow::Exit {
                break;
            }
            self.render();
        }
        Ok(())
    }

    /// Apply one event to the session. Exposed so the loop can be driven
    /// deterministically in tests.
    pub fn handle_event(&mut self, event: Event) -> Flow {
        match event {
            Event::Command(command) => return self.handle_command(command),
            Event::DebounceElapsed { generation, query } => {
                self.on_debounce_elapsed(generation, query)
            }
            Event::Suggestions { generation, result } => self.on_suggestions(generation, result),
            Event::PlaceResolved {
                generation,
                origin,
                result,
            } => self.on_place_resolved(generation, origin, result),
            Event::Forecast {
                generation,
                place,
                units,
                result,
            } => self.on_forecast(generation, place, units, result),
            Event::Backdrop { generation, url } => self.on_backdrop(generation, url),
        }
        Flow::Continue
    }

    /// Re-issue the forecast load for `place` as a fresh trigger
    pub fn load_forecast(&mut self, place: Place) {
        self.forecast_generation += 1;
        let generation = self.forecast_generation;
        self.spawn_forecast_fetch(generation, place);
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Input(query) => self.on_query_input(query),
            Command::Search(query) => self.on_search_submit(query),
            Command::Pick(index) => self.on_pick(index),
            Command::Units(units) => self.on_units(units),
            Command::Day(index) => self.on_day(index),
            Command::Locate => self.on_locate(),
            Command::Refresh => self.load_forecast(self.session.place.clone()),
            Command::Help => self.session.status = Status::Message(USAGE.to_string()),
            Command::Quit => return Flow::Exit,
        }
        Flow::Continue
    }

    /// Debounced autocomplete lookup. Every input change resets
    /// the quiescence timer; an emptied query clears the list without any
    /// network traffic.
    fn on_query_input(&mut self, query: String) {
        if let Some(guard) = self.debounce_guard.take() {
            guard.cancel();
        }
        self.suggest_generation += 1;

        let trimmed = query.trim().to_string();
        if trimmed.is_empty() {
            self.session.clear_suggestions();
            return;
        }

        let generation = self.suggest_generation;
        let guard = CancellationToken::new();
        self.debounce_guard = Some(guard.clone());
        let tx = self.tx.clone();
        let delay = self.debounce;
        self.handle.spawn(async move {
            tokio::select! {
                _ = guard.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(Event::DebounceElapsed {
                        generation,
                        query: trimmed,
                    });
                }
            }
        });
    }

    fn on_debounce_elapsed(&mut self, generation: u64, query: String) {
        if generation != self.suggest_generation {
            tracing::debug!(generation, "ignoring superseded debounce timer");
            return;
        }
        let geocode = self.geocode.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = geocode.search(&query).await;
            let _ = tx.send(Event::Suggestions { generation, result });
        });
    }

    fn on_suggestions(&mut self, generation: u64, result: Result<Vec<GeoCandidate>, AppError>) {
        if generation != self.suggest_generation {
            tracing::debug!(generation, "discarding stale suggestion response");
            return;
        }
        match result {
            Ok(candidates) => self.session.set_suggestions(candidates),
            Err(e) => {
                // Suggestion failures are silent; the list just closes
                tracing::debug!("suggestion lookup failed: {}", e);
                self.session.clear_suggestions();
            }
        }
    }

    /// Free-text search submit, taking the best-ranked match
    fn on_search_submit(&mut self, query: String) {
        let query = query.trim().to_string();
        if query.is_empty() {
            return;
        }
        self.drop_pending_suggestions();

        self.forecast_generation += 1;
        let generation = self.forecast_generation;
        self.session.status = Status::Searching;

        let geocode = self.geocode.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = geocode
                .first_match(&query)
                .await
                .map(GeoCandidate::into_place);
            let _ = tx.send(Event::PlaceResolved {
                generation,
                origin: ResolveOrigin::Search,
                result,
            });
        });
    }

    /// Pick a suggestion from the list
    fn on_pick(&mut self, index: usize) {
        match self.session.suggestions.get(index) {
            Some(candidate) => {
                let place = candidate.clone().into_place();
                self.drop_pending_suggestions();
                self.load_forecast(place);
            }
            None => self.session.status = Status::Message("No such suggestion.".to_string()),
        }
    }

    /// Unit toggle. Units affect server-side conversion, so the
    /// dataset is refetched rather than relabeled.
    fn on_units(&mut self, units: UnitSystem) {
        if units == self.session.units {
            return;
        }
        self.session.units = units;
        if let Err(e) = self.prefs.save_units(units) {
            tracing::warn!("failed to persist units: {}", e);
        }
        self.load_forecast(self.session.place.clone());
    }

    /// Day selection; no network traffic
    fn on_day(&mut self, index: usize) {
        if !self.session.select_day(index) {
            self.session.status = Status::Message("No such day.".to_string());
        }
    }

    /// Resolve the machine's position, then reverse-geocode it
    /// for a label (best-effort)
    fn on_locate(&mut self) {
        self.forecast_generation += 1;
        let generation = self.forecast_generation;
        self.session.status = Status::Locating;

        let locator = self.locator.clone();
        let geocode = self.geocode.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = resolve_position(&locator, &geocode).await;
            let _ = tx.send(Event::PlaceResolved {
                generation,
                origin: ResolveOrigin::Locate,
                result,
            });
        });
    }

    fn on_place_resolved(
        &mut self,
        generation: u64,
        origin: ResolveOrigin,
        result: Result<Place, AppError>,
    ) {
        if generation != self.forecast_generation {
            tracing::debug!(generation, "discarding superseded place resolution");
            return;
        }
        match result {
            Ok(place) => self.spawn_forecast_fetch(generation, place),
            Err(e) => {
                tracing::warn!(?origin, "place resolution failed: {}", e);
                self.session.status = Status::Message(e.user_message().to_string());
            }
        }
    }

    fn spawn_forecast_fetch(&mut self, generation: u64, place: Place) {
        self.session.status = Status::Loading;
        let units = self.session.units;
        let client = self.forecast.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = client.fetch(place.latitude, place.longitude, units).await;
            let _ = tx.send(Event::Forecast {
                generation,
                place,
                units,
                result,
            });
        });
    }

    fn on_forecast(
        &mut self,
        generation: u64,
        place: Place,
        units: UnitSystem,
        result: Result<ForecastDataset, AppError>,
    ) {
        if generation != self.forecast_generation {
            tracing::debug!(
                generation,
                latest = self.forecast_generation,
                "discarding stale forecast response"
            );
            return;
        }
        match result {
            Ok(dataset) => {
                tracing::info!(place = %place.label(), units = units.as_str(), "forecast committed");
                self.session.commit_dataset(place.clone(), dataset);
                if let Err(e) = self.prefs.save_place(&place) {
                    tracing::warn!("failed to persist place: {}", e);
                }
                self.spawn_backdrop_lookup(generation, place);
            }
            Err(e) => {
                // A failed load never clears an already-displayed dataset
                tracing::warn!("forecast load failed: {}", e);
                self.session.status = Status::Message(e.user_message().to_string());
            }
        }
    }

    fn spawn_backdrop_lookup(&mut self, generation: u64, place: Place) {
        let client = self.backdrop.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let url = client.resolve(&place).await;
            let _ = tx.send(Event::Backdrop { generation, url });
        });
    }

    fn on_backdrop(&mut self, generation: u64, url: Option<String>) {
        if generation != self.forecast_generation {
            tracing::debug!(generation, "discarding stale backdrop response");
            return;
        }
        self.session.backdrop_url = url;
    }

    /// Invalidate the suggestion list and any pending lookup for it
    fn drop_pending_suggestions(&mut self) {
        if let Some(guard) = self.debounce_guard.take() {
            guard.cancel();
        }
        self.suggest_generation += 1;
        self.session.clear_suggestions();
    }

    fn render(&mut self) {
        let view = view::project(&self.session);
        if self.last_view.as_ref() == Some(&view) {
            return;
        }
        self.presenter.present(&view);
        self.last_view = Some(view);
    }
}

/// Resolve the current position to a Place. The reverse-geocoded label is
/// best-effort; precise coordinates always win, and a failed label lookup
/// falls back to a generic name with empty country.
async fn resolve_position(
    locator: &IpLocator,
    geocode: &GeocodeClient,
) -> Result<Place, AppError> {
    let fix = locator.position().await?;
    tracing::info!(
        latitude = fix.latitude,
        longitude = fix.longitude,
        "position resolved"
    );

    match geocode.reverse(fix.latitude, fix.longitude).await {
        Ok(Some(candidate)) => Ok(Place {
            name: candidate.name,
            country: candidate.country_code.unwrap_or_default(),
            latitude: fix.latitude,
            longitude: fix.longitude,
        }),
        Ok(None) => Ok(generic_place(&fix)),
        Err(e) => {
            tracing::debug!("reverse geocode failed, using generic label: {}", e);
            Ok(generic_place(&fix))
        }
    }
}

fn generic_place(fix: &skycast_weather::PositionFix) -> Place {
    Place {
        name: fix
            .city
            .clone()
            .unwrap_or_else(|| "My location".to_string()),
        country: String::new(),
        latitude: fix.latitude,
        longitude: fix.longitude,
    }
}
