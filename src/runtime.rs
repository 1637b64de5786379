//! Effect runtime: turns reducer effects into background tasks

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use tui_dispatch::{EffectContext, TaskKey};

use crate::action::Action;
use crate::api::WeatherService;
use crate::effect::Effect;
use crate::state::{ForecastRequest, SEARCH_DEBOUNCE_MS};
use crate::storage::{KeyValueStore, LAST_CITY_KEY};

pub const SEARCH_TASK: &str = "city_search";
pub const FORECAST_TASK: &str = "forecast";
pub const STORAGE_READ_TASK: &str = "storage_read";
pub const STORAGE_WRITE_TASK: &str = "storage_write";

/// The outside world the app talks to.
#[derive(Clone)]
pub struct Services {
    weather: Arc<dyn WeatherService>,
    store: Arc<dyn KeyValueStore>,
}

impl Services {
    pub fn new(weather: Arc<dyn WeatherService>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { weather, store }
    }

    /// Read the remembered city. An unreadable store counts as "nothing saved".
    pub async fn load_saved_city(&self) -> Action {
        match self.store.get(LAST_CITY_KEY).await {
            Ok(city) => {
                debug!(?city, "saved city loaded");
                Action::SavedCityDidLoad(city)
            }
            Err(e) => {
                warn!(error = %e, "could not read saved city");
                Action::SavedCityDidLoad(None)
            }
        }
    }

    pub async fn fetch_forecast(&self, request: ForecastRequest, days: u8) -> Action {
        info!(city = %request.city, id = request.id, days, "fetching forecast");
        match self.weather.forecast(&request.city, days).await {
            Ok(payload) => Action::ForecastDidLoad {
                request_id: request.id,
                payload,
            },
            Err(e) => {
                warn!(city = %request.city, id = request.id, error = %e, "forecast failed");
                Action::ForecastDidError {
                    request_id: request.id,
                    error: e.to_string(),
                }
            }
        }
    }

    pub async fn save_city(&self, city: String) -> Action {
        match self.store.put(LAST_CITY_KEY, &city).await {
            Ok(()) => {
                debug!(%city, "city saved");
                Action::CityDidSave(city)
            }
            Err(e) => {
                warn!(%city, error = %e, "could not save city");
                Action::CityDidError(e.to_string())
            }
        }
    }

    pub async fn lookup_locations(&self, query: String, generation: u64) -> Action {
        debug!(%query, generation, "looking up locations");
        match self.weather.search_locations(&query).await {
            Ok(results) => Action::SearchDidLoad {
                generation,
                results,
            },
            Err(e) => {
                warn!(%query, error = %e, "location lookup failed");
                Action::SearchDidError {
                    generation,
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Work produced by an action-returning future.
pub type Work = Pin<Box<dyn Future<Output = Action> + Send>>;

/// How an effect is scheduled on the task manager.
pub enum TaskPlan {
    /// Run now, replacing any task under the same key.
    Spawn { key: &'static str, work: Work },
    /// Run once `delay` passes without another plan for the same key.
    Debounce {
        key: &'static str,
        delay: Duration,
        work: Work,
    },
    Cancel { key: &'static str },
}

pub fn plan_effect(effect: Effect, services: &Services) -> TaskPlan {
    let services = services.clone();
    match effect {
        Effect::LoadSavedCity => TaskPlan::Spawn {
            key: STORAGE_READ_TASK,
            work: Box::pin(async move { services.load_saved_city().await }),
        },
        Effect::FetchForecast { request, days } => TaskPlan::Spawn {
            key: FORECAST_TASK,
            work: Box::pin(async move { services.fetch_forecast(request, days).await }),
        },
        Effect::SaveCity { city } => TaskPlan::Spawn {
            key: STORAGE_WRITE_TASK,
            work: Box::pin(async move { services.save_city(city).await }),
        },
        Effect::SearchLocations {
            query,
            generation,
            debounce,
        } => {
            let work: Work =
                Box::pin(async move { services.lookup_locations(query, generation).await });
            if debounce {
                TaskPlan::Debounce {
                    key: SEARCH_TASK,
                    delay: Duration::from_millis(SEARCH_DEBOUNCE_MS),
                    work,
                }
            } else {
                TaskPlan::Spawn {
                    key: SEARCH_TASK,
                    work,
                }
            }
        }
        Effect::CancelSearch => TaskPlan::Cancel { key: SEARCH_TASK },
    }
}

/// Handle effects by spawning keyed tasks.
///
/// Spawning under a key that is already running replaces the old task.
pub fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: &Services) {
    match plan_effect(effect, services) {
        TaskPlan::Spawn { key, work } => {
            ctx.tasks().spawn(key, work);
        }
        TaskPlan::Debounce { key, delay, work } => {
            ctx.tasks().debounce(key, delay, work);
        }
        TaskPlan::Cancel { key } => {
            ctx.tasks().cancel(&TaskKey::new(key));
        }
    }
}
