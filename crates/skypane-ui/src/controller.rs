//! Lookup orchestration: trigger → fetch → extract → render, plus the
//! transient error indicator on the query input.
//!
//! A new lookup supersedes the one in flight: the older lookup is cancelled
//! and its result is never rendered.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use skypane_weather::{
    extract, ErrorKind, Location, LocationQuery, WeatherError, WeatherInfo, WeatherSource,
};

use crate::page::{Page, RegionId};
use crate::render::{RenderError, RenderState, Renderer};

/// Class applied to the query input while a failure is being signalled.
pub const ERROR_CLASS: &str = "error";

/// User or sensor event that may start a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Geolocation fix arrived
    Geolocated(Location),
    /// Key released in the query input; `value` is the input's content
    KeyUp { key: String, value: String },
    /// Search button clicked
    SearchClicked,
    /// Temperature region clicked
    TemperatureClicked,
}

impl Trigger {
    pub fn enter(value: impl Into<String>) -> Self {
        Trigger::KeyUp {
            key: "Enter".to_string(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::Weather(e) => e.kind(),
            LookupError::Render(_) => ErrorKind::Shape,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            LookupError::Weather(e) => e.user_message(),
            LookupError::Render(_) => "The page could not be updated.".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum LookupOutcome {
    Rendered(WeatherInfo),
    /// A newer lookup started before this one finished
    Superseded,
    Failed(LookupError),
}

impl LookupOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, LookupOutcome::Rendered(_))
    }
}

struct View<P> {
    page: P,
    renderer: Renderer,
}

struct InFlight {
    id: u64,
    token: CancellationToken,
}

pub struct WeatherController<S, P> {
    source: S,
    view: Arc<Mutex<View<P>>>,
    error_flash: Duration,
    inflight: Mutex<Option<InFlight>>,
    next_id: AtomicU64,
}

impl<S, P> WeatherController<S, P>
where
    S: WeatherSource,
    P: Page + 'static,
{
    pub fn new(source: S, page: P, renderer: Renderer, error_flash: Duration) -> Self {
        Self {
            source,
            view: Arc::new(Mutex::new(View { page, renderer })),
            error_flash,
            inflight: Mutex::new(None),
            next_id: AtomicU64::new(0),
        }
    }

    /// Run `f` against the current page.
    pub fn page<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.view.lock().page)
    }

    pub fn render_state(&self) -> RenderState {
        self.view.lock().renderer.state().clone()
    }

    /// React to a trigger. Returns the lookup outcome when the trigger
    /// started one.
    pub async fn handle(&self, trigger: Trigger) -> Option<LookupOutcome> {
        match trigger {
            Trigger::Geolocated(location) => {
                tracing::info!(
                    "Got location: {}, {}",
                    location.latitude,
                    location.longitude
                );
                Some(self.show(location.to_query()).await)
            }
            Trigger::KeyUp { key, value } => {
                self.set_query_input(&value);
                if key == "Enter" {
                    Some(self.show(LocationQuery::from(value)).await)
                } else {
                    None
                }
            }
            Trigger::SearchClicked => match self.query_input() {
                Ok(query) => Some(self.show(query).await),
                Err(e) => {
                    tracing::warn!("Search clicked without a query input: {}", e);
                    self.flag_error();
                    Some(LookupOutcome::Failed(e.into()))
                }
            },
            Trigger::TemperatureClicked => {
                self.toggle_unit();
                None
            }
        }
    }

    /// Fetch, extract and render weather for `query`.
    ///
    /// Every failure flags the query input for the configured flash
    /// duration, whatever its kind.
    #[instrument(skip(self), level = "info")]
    pub async fn show(&self, query: LocationQuery) -> LookupOutcome {
        let (id, token) = self.begin();

        let fetched = tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Lookup #{} superseded while fetching", id);
                return LookupOutcome::Superseded;
            }
            result = self.source.current_weather(&query) => result,
        };

        let result = {
            let mut view = self.view.lock();
            if token.is_cancelled() {
                tracing::debug!("Lookup #{} superseded before rendering", id);
                return LookupOutcome::Superseded;
            }

            let View { page, renderer } = &mut *view;
            fetched
                .map_err(LookupError::from)
                .and_then(|response| -> Result<WeatherInfo, LookupError> {
                    let info = extract(&response)?;
                    renderer.render(page, info.clone())?;
                    Ok(info)
                })
        };
        self.finish(id);

        match result {
            Ok(info) => {
                tracing::info!("Showing weather for {}", info.city);
                LookupOutcome::Rendered(info)
            }
            Err(e) => {
                tracing::warn!(kind = ?e.kind(), "Lookup failed: {}", e);
                self.flag_error();
                LookupOutcome::Failed(e)
            }
        }
    }

    fn toggle_unit(&self) {
        let mut view = self.view.lock();
        let View { page, renderer } = &mut *view;
        match renderer.toggle_unit(page) {
            Ok(Some(unit)) => tracing::debug!("Temperature now shown as {:?}", unit),
            Ok(None) => tracing::debug!("Nothing rendered yet, toggle ignored"),
            Err(e) => tracing::warn!("Failed to toggle temperature unit: {}", e),
        }
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let previous = self.inflight.lock().replace(InFlight {
            id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            tracing::debug!("Lookup #{} supersedes #{}", id, previous.id);
            previous.token.cancel();
        }

        (id, token)
    }

    fn finish(&self, id: u64) {
        let mut inflight = self.inflight.lock();
        if inflight.as_ref().is_some_and(|f| f.id == id) {
            *inflight = None;
        }
    }

    fn set_query_input(&self, value: &str) {
        match self.view.lock().page.region_mut(RegionId::LocationQuarry) {
            Some(region) => region.value = value.to_string(),
            None => tracing::warn!("Page has no #{} region", RegionId::LocationQuarry),
        }
    }

    fn query_input(&self) -> Result<LocationQuery, RenderError> {
        let view = self.view.lock();
        view.page
            .region(RegionId::LocationQuarry)
            .map(|region| LocationQuery::new(region.value.clone()))
            .ok_or(RenderError::MissingRegion(RegionId::LocationQuarry))
    }

    /// Add the error class to the query input and schedule its removal.
    /// Removal is never cancelled by later lookups.
    fn flag_error(&self) {
        {
            let mut view = self.view.lock();
            match view.page.region_mut(RegionId::LocationQuarry) {
                Some(region) => region.add_class(ERROR_CLASS),
                None => {
                    tracing::warn!("Page has no #{} region", RegionId::LocationQuarry);
                    return;
                }
            }
        }

        let view = Arc::clone(&self.view);
        let delay = self.error_flash;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(region) = view.lock().page.region_mut(RegionId::LocationQuarry) {
                region.remove_class(ERROR_CLASS);
            }
        });
    }
}
