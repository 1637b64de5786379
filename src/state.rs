//! Application state - single source of truth

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

/// City used when nothing has been remembered yet.
pub const DEFAULT_FALLBACK_CITY: &str = "Kolkata";

/// Number of forecast days requested per fetch.
pub const DEFAULT_FORECAST_DAYS: u8 = 7;

/// Queries shorter than this (after trimming) never reach the lookup service.
pub const MIN_QUERY_CHARS: usize = 3;

/// Quiet period before a typed query is looked up.
pub const SEARCH_DEBOUNCE_MS: u64 = 1200;

/// Animation timing for the header gradient seam.
pub const LOADING_ANIM_TICK_MS: u64 = 15;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 60;

/// A place returned by the lookup and forecast endpoints
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub region: String,
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

impl Location {
    /// "Name, Country" as shown in the candidate list.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }

    /// "Region, Country", skipping empty parts.
    pub fn subtitle(&self) -> String {
        [self.region.as_str(), self.country.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Condition {
    pub text: String,
}

/// Current conditions block of the forecast payload
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurrentWeather {
    pub temp_c: f32,
    pub wind_kph: f32,
    pub humidity: u8,
    pub condition: Condition,
    #[serde(default)]
    pub feelslike_c: Option<f32>,
    #[serde(default)]
    pub is_day: Option<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Astro {
    pub sunrise: String,
    #[serde(default)]
    pub sunset: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DaySummary {
    pub avgtemp_c: f32,
    #[serde(default)]
    pub maxtemp_c: Option<f32>,
    #[serde(default)]
    pub mintemp_c: Option<f32>,
    pub condition: Condition,
}

/// One entry of the multi-day forecast
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub astro: Astro,
    pub day: DaySummary,
}

impl ForecastDay {
    /// Full weekday name ("Monday"), or the raw date if it doesn't parse.
    pub fn weekday_name(&self) -> String {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map(|date| date.format("%A").to_string())
            .unwrap_or_else(|_| self.date.clone())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Forecast {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

/// Current conditions plus the multi-day forecast for one location
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherPayload {
    pub location: Location,
    pub current: CurrentWeather,
    #[serde(default)]
    pub forecast: Forecast,
}

impl WeatherPayload {
    /// Sunrise of the first forecast day, if any.
    pub fn sunrise(&self) -> Option<&str> {
        self.forecast
            .forecastday
            .first()
            .map(|day| day.astro.sunrise.as_str())
            .filter(|sunrise| !sunrise.is_empty())
    }
}

/// A forecast fetch that has been issued but not yet resolved
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastRequest {
    /// Generation stamp; results for any other id are stale.
    pub id: u64,
    pub city: String,
    /// Remember the city once this request succeeds.
    pub persist: bool,
}

/// Temperature unit preference
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn toggle(&self) -> Self {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }

    pub fn format(&self, celsius: f32) -> String {
        match self {
            TempUnit::Celsius => format!("{:.1}°C", celsius),
            TempUnit::Fahrenheit => format!("{:.1}°F", celsius * 9.0 / 5.0 + 32.0),
        }
    }

    /// Whole degrees with a bare degree sign, for the forecast cards.
    pub fn format_short(&self, celsius: f32) -> String {
        match self {
            TempUnit::Celsius => format!("{:.0}°", celsius),
            TempUnit::Fahrenheit => format!("{:.0}°", celsius * 9.0 / 5.0 + 32.0),
        }
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Startup settings ---
    #[debug(section = "Settings", label = "Fallback city")]
    pub fallback_city: String,

    #[debug(section = "Settings", label = "Forecast days")]
    pub forecast_days: u8,

    // --- Forecast ---
    /// City of the payload currently on screen (empty before the first load)
    #[debug(section = "Forecast", label = "City")]
    pub city: String,

    /// Payload lifecycle: Empty → Loading → Loaded/Failed
    #[debug(section = "Forecast", label = "Data", debug_fmt)]
    pub weather: DataResource<WeatherPayload>,

    /// A newer payload is on its way while the current one stays visible
    #[debug(section = "Forecast", label = "Refreshing")]
    pub is_refreshing: bool,

    #[debug(section = "Forecast", label = "In flight", debug_fmt)]
    pub in_flight: Option<ForecastRequest>,

    /// Last request that failed; `ForecastRetry` re-issues it
    #[debug(section = "Forecast", label = "Failed", debug_fmt)]
    pub failed_request: Option<ForecastRequest>,

    #[debug(section = "Forecast", label = "Generation")]
    pub forecast_generation: u64,

    #[debug(section = "Forecast", label = "Unit", debug_fmt)]
    pub unit: TempUnit,

    /// Transient message for the status line
    #[debug(section = "Forecast", label = "Status", debug_fmt)]
    pub status: Option<String>,

    // --- Animation internals (skipped) ---
    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current animation cycle after loading
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,

    // --- Search ---
    #[debug(section = "Search", label = "Open")]
    pub search_mode: bool,

    #[debug(section = "Search", label = "Query", debug_fmt)]
    pub search_query: String,

    #[debug(skip)]
    pub search_results: Vec<Location>,

    #[debug(skip)]
    pub search_error: Option<String>,

    #[debug(skip)]
    pub search_selected: usize,

    /// Bumped on every query change; lookups issued under an older value are ignored
    #[debug(section = "Search", label = "Generation")]
    pub search_generation: u64,
}

impl AppState {
    pub fn new(fallback_city: impl Into<String>, forecast_days: u8) -> Self {
        Self {
            fallback_city: fallback_city.into(),
            forecast_days,
            city: String::new(),
            weather: DataResource::Empty,
            is_refreshing: false,
            in_flight: None,
            failed_request: None,
            forecast_generation: 0,
            unit: TempUnit::default(),
            status: None,
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
            search_mode: false,
            search_query: String::new(),
            search_results: Vec::new(),
            search_error: None,
            search_selected: 0,
            search_generation: 0,
        }
    }

    /// True while any forecast request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.weather.is_loading() || self.is_refreshing
    }

    /// Location of the displayed payload.
    pub fn current_location(&self) -> Option<&Location> {
        self.weather.data().map(|payload| &payload.location)
    }

    /// Name for the header: the displayed location, else whatever is being loaded.
    pub fn headline(&self) -> &str {
        if let Some(location) = self.current_location() {
            return &location.name;
        }
        self.in_flight
            .as_ref()
            .or(self.failed_request.as_ref())
            .map(|request| request.city.as_str())
            .unwrap_or(&self.city)
    }

    pub fn loading_anim_active(&self) -> bool {
        self.is_loading() || self.loading_anim_ticks_remaining > 0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_CITY, DEFAULT_FORECAST_DAYS)
    }
}
