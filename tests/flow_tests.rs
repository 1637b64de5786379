//! End-to-end flows: reducer + services against a fake weather source
//!
//! Effects are executed inline, in order, instead of on the task runtime.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use citycast::{
    action::Action,
    api::{ApiError, WeatherService},
    effect::Effect,
    reducer::reducer,
    runtime::Services,
    state::{AppState, Location, WeatherPayload},
    storage::{KeyValueStore, LAST_CITY_KEY, MemoryStore},
};
use pretty_assertions::assert_eq;

/// Answers every forecast and records the calls it saw.
#[derive(Default)]
struct FakeWeather {
    forecasts: Mutex<Vec<(String, u8)>>,
    lookups: Mutex<Vec<String>>,
    failing: Vec<String>,
}

impl FakeWeather {
    fn failing(city: &str) -> Self {
        Self {
            failing: vec![city.to_string()],
            ..Default::default()
        }
    }

    fn forecast_calls(&self) -> Vec<(String, u8)> {
        self.forecasts.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherService for FakeWeather {
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ApiError> {
        self.lookups.lock().unwrap().push(query.to_string());
        Ok(vec![
            Location {
                name: "London".into(),
                country: "United Kingdom".into(),
                ..Default::default()
            },
            Location {
                name: "Londonderry".into(),
                country: "United Kingdom".into(),
                ..Default::default()
            },
        ])
    }

    async fn forecast(&self, city: &str, days: u8) -> Result<WeatherPayload, ApiError> {
        self.forecasts.lock().unwrap().push((city.to_string(), days));
        if self.failing.iter().any(|failing| failing == city) {
            return Err(ApiError::Status {
                status: 502,
                message: "Bad Gateway".into(),
            });
        }
        Ok(WeatherPayload {
            location: Location {
                name: city.to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
    }
}

struct App {
    state: AppState,
    services: Services,
}

impl App {
    fn new(weather: Arc<FakeWeather>, storage: Arc<MemoryStore>) -> Self {
        Self {
            state: AppState::default(),
            services: Services::new(weather, storage),
        }
    }

    /// Dispatch, then run every resulting effect to completion.
    async fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);
        while let Some(action) = queue.pop_front() {
            let result = reducer(&mut self.state, action);
            for effect in result.effects {
                if let Some(next) = self.run(effect).await {
                    queue.push_back(next);
                }
            }
        }
    }

    async fn run(&self, effect: Effect) -> Option<Action> {
        let services = &self.services;
        match effect {
            Effect::LoadSavedCity => Some(services.load_saved_city().await),
            Effect::FetchForecast { request, days } => {
                Some(services.fetch_forecast(request, days).await)
            }
            Effect::SaveCity { city } => Some(services.save_city(city).await),
            Effect::SearchLocations {
                query, generation, ..
            } => Some(services.lookup_locations(query, generation).await),
            Effect::CancelSearch => None,
        }
    }

    fn state(&self) -> &AppState {
        &self.state
    }
}

#[tokio::test]
async fn test_first_start_fetches_fallback_once() {
    let weather = Arc::new(FakeWeather::default());
    let storage = Arc::new(MemoryStore::new());
    let mut app = App::new(weather.clone(), storage.clone());

    app.dispatch(Action::Init).await;

    assert_eq!(weather.forecast_calls(), vec![("Kolkata".to_string(), 7)]);
    assert_eq!(app.state().city, "Kolkata");
    assert!(!app.state().is_loading());
    assert_eq!(storage.get(LAST_CITY_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_start_uses_remembered_city() {
    let weather = Arc::new(FakeWeather::default());
    let storage = Arc::new(MemoryStore::with_entry(LAST_CITY_KEY, "Reykjavik"));
    let mut app = App::new(weather.clone(), storage);

    app.dispatch(Action::Init).await;

    assert_eq!(weather.forecast_calls(), vec![("Reykjavik".to_string(), 7)]);
    assert_eq!(
        app.state().current_location().map(|l| l.name.as_str()),
        Some("Reykjavik")
    );
}

#[tokio::test]
async fn test_search_select_switches_and_remembers() {
    let weather = Arc::new(FakeWeather::default());
    let storage = Arc::new(MemoryStore::new());
    let mut app = App::new(weather.clone(), storage.clone());
    app.dispatch(Action::Init).await;

    app.dispatch(Action::SearchOpen).await;
    app.dispatch(Action::SearchQueryChange("Lo".into())).await;
    assert!(weather.lookups.lock().unwrap().is_empty());

    app.dispatch(Action::SearchQueryChange("Lon".into())).await;
    assert_eq!(*weather.lookups.lock().unwrap(), vec!["Lon".to_string()]);
    assert_eq!(app.state().search_results.len(), 2);

    app.dispatch(Action::SearchConfirm).await;

    assert!(!app.state().search_mode);
    assert!(app.state().search_results.is_empty());
    assert_eq!(
        weather.forecast_calls(),
        vec![("Kolkata".to_string(), 7), ("London".to_string(), 7)]
    );
    assert_eq!(app.state().city, "London");
    assert_eq!(
        storage.get(LAST_CITY_KEY).await.unwrap(),
        Some("London".to_string())
    );
}

#[tokio::test]
async fn test_failed_switch_keeps_city_and_is_not_remembered() {
    let weather = Arc::new(FakeWeather::failing("London"));
    let storage = Arc::new(MemoryStore::new());
    let mut app = App::new(weather.clone(), storage.clone());
    app.dispatch(Action::Init).await;

    app.dispatch(Action::SearchOpen).await;
    app.dispatch(Action::SearchQuerySubmit("London".into())).await;
    app.dispatch(Action::SearchConfirm).await;

    assert!(!app.state().is_loading());
    assert_eq!(app.state().city, "Kolkata");
    assert_eq!(
        app.state().status.as_deref(),
        Some("Could not load London: Bad Gateway (HTTP 502)")
    );
    assert_eq!(storage.get(LAST_CITY_KEY).await.unwrap(), None);

    // Retry goes after the city that failed
    app.dispatch(Action::ForecastRetry).await;
    assert_eq!(
        weather.forecast_calls().last(),
        Some(&("London".to_string(), 7))
    );
}
