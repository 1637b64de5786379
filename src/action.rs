//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{Location, WeatherPayload};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Startup =====
    /// Dispatched once when the runtime starts: read the remembered city
    Init,

    /// Result: remembered city read from storage (None if never saved)
    SavedCityDidLoad(Option<String>),

    // ===== Forecast category =====
    /// Periodic refresh of the displayed city
    ForecastRefresh,

    /// Re-issue the last failed request, or refresh the displayed city
    ForecastRetry,

    /// Result: forecast payload for the request with `request_id`
    ForecastDidLoad {
        request_id: u64,
        payload: WeatherPayload,
    },

    /// Result: forecast request `request_id` failed
    ForecastDidError { request_id: u64, error: String },

    // ===== City persistence =====
    /// Result: city remembered for the next start
    CityDidSave(String),

    /// Result: remembering the city failed
    CityDidError(String),

    // ===== Search category =====
    /// Open the city search overlay
    SearchOpen,

    /// Close the search overlay (cancel)
    SearchClose,

    /// Open when closed, close when open
    SearchToggle,

    /// Search text changed (debounced lookup)
    SearchQueryChange(String),

    /// Submit search text (immediate lookup)
    SearchQuerySubmit(String),

    /// Result: candidates for the lookup issued under `generation`
    SearchDidLoad {
        generation: u64,
        results: Vec<Location>,
    },

    /// Result: lookup issued under `generation` failed
    SearchDidError { generation: u64, error: String },

    /// Highlight a candidate (by index)
    SearchSelect(usize),

    /// Switch to the highlighted candidate
    SearchConfirm,

    // ===== UI category =====
    /// Toggle between Celsius and Fahrenheit
    UiToggleUnits,

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
