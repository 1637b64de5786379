//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, ForecastRequest, LOADING_ANIM_CYCLE_TICKS, MIN_QUERY_CHARS};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Startup =====
        Action::Init => {
            state.weather = DataResource::Loading;
            DispatchResult::changed_with(Effect::LoadSavedCity)
        }

        Action::SavedCityDidLoad(saved) => {
            let city = saved
                .map(|city| city.trim().to_string())
                .filter(|city| !city.is_empty())
                .unwrap_or_else(|| state.fallback_city.clone());
            DispatchResult::changed_with(start_forecast(state, city, false))
        }

        // ===== Forecast actions =====
        Action::ForecastRefresh => {
            if state.in_flight.is_some() || state.city.is_empty() {
                return DispatchResult::unchanged();
            }
            let city = state.city.clone();
            DispatchResult::changed_with(start_forecast(state, city, false))
        }

        Action::ForecastRetry => {
            if state.in_flight.is_some() {
                return DispatchResult::unchanged();
            }
            let (city, persist) = match state.failed_request.take() {
                Some(request) => (request.city, request.persist),
                None if !state.city.is_empty() => (state.city.clone(), false),
                None => (state.fallback_city.clone(), false),
            };
            DispatchResult::changed_with(start_forecast(state, city, persist))
        }

        Action::ForecastDidLoad {
            request_id,
            payload,
        } => {
            let Some(request) = take_in_flight(state, request_id) else {
                return DispatchResult::unchanged();
            };
            state.weather = DataResource::Loaded(payload);
            state.is_refreshing = false;
            state.city = request.city.clone();
            state.status = None;
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            if request.persist {
                DispatchResult::changed_with(Effect::SaveCity { city: request.city })
            } else {
                DispatchResult::changed()
            }
        }

        Action::ForecastDidError { request_id, error } => {
            let Some(request) = take_in_flight(state, request_id) else {
                return DispatchResult::unchanged();
            };
            if state.weather.is_loaded() {
                state.status = Some(format!("Could not load {}: {}", request.city, error));
            } else {
                state.weather = DataResource::Failed(error);
            }
            state.is_refreshing = false;
            state.failed_request = Some(request);
            state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
            DispatchResult::changed()
        }

        // ===== City persistence =====
        Action::CityDidSave(_) => DispatchResult::unchanged(),

        Action::CityDidError(msg) => {
            state.status = Some(format!("Could not remember city: {}", msg));
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchOpen => {
            state.search_mode = true;
            reset_search(state);
            DispatchResult::changed()
        }

        Action::SearchClose => {
            state.search_mode = false;
            reset_search(state);
            DispatchResult::changed_with(Effect::CancelSearch)
        }

        Action::SearchToggle => {
            let next = if state.search_mode {
                Action::SearchClose
            } else {
                Action::SearchOpen
            };
            reducer(state, next)
        }

        Action::SearchQueryChange(query) => {
            if !state.search_mode {
                return DispatchResult::unchanged();
            }
            state.search_query = query;
            state.search_error = None;
            state.search_generation += 1;
            DispatchResult::changed_with(lookup_effect(state, true))
        }

        Action::SearchQuerySubmit(query) => {
            if !state.search_mode {
                return DispatchResult::unchanged();
            }
            state.search_query = query.trim().to_string();
            state.search_error = None;
            state.search_generation += 1;
            DispatchResult::changed_with(lookup_effect(state, false))
        }

        Action::SearchDidLoad {
            generation,
            results,
        } => {
            if !state.search_mode || generation != state.search_generation {
                return DispatchResult::unchanged();
            }
            state.search_results = results;
            state.search_error = None;
            state.search_selected = 0;
            DispatchResult::changed()
        }

        Action::SearchDidError { generation, error } => {
            if !state.search_mode || generation != state.search_generation {
                return DispatchResult::unchanged();
            }
            state.search_results.clear();
            state.search_error = Some(error);
            state.search_selected = 0;
            DispatchResult::changed()
        }

        Action::SearchSelect(index) => {
            if index < state.search_results.len() && index != state.search_selected {
                state.search_selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SearchConfirm => {
            let Some(location) = state.search_results.get(state.search_selected).cloned() else {
                return DispatchResult::unchanged();
            };

            state.search_mode = false;
            reset_search(state);
            let mut result =
                DispatchResult::changed_with(start_forecast(state, location.name, true));
            result.effects.push(Effect::CancelSearch);
            result
        }

        // ===== UI actions =====
        Action::UiToggleUnits => {
            state.unit = state.unit.toggle();
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            let animating = state.loading_anim_active();
            if animating {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Stamp a new request, mark loading and describe the fetch.
///
/// A payload already on screen stays there until the new one arrives.
fn start_forecast(state: &mut AppState, city: String, persist: bool) -> Effect {
    state.forecast_generation += 1;
    let request = ForecastRequest {
        id: state.forecast_generation,
        city,
        persist,
    };
    if state.weather.is_loaded() {
        state.is_refreshing = true;
    } else {
        state.weather = DataResource::Loading;
    }
    state.in_flight = Some(request.clone());
    state.failed_request = None;
    state.status = None;
    state.tick_count = 0;
    state.loading_anim_ticks_remaining = 0;
    Effect::FetchForecast {
        request,
        days: state.forecast_days,
    }
}

/// Take the in-flight request if `request_id` is the current generation.
fn take_in_flight(state: &mut AppState, request_id: u64) -> Option<ForecastRequest> {
    match &state.in_flight {
        Some(request) if request.id == request_id => state.in_flight.take(),
        _ => None,
    }
}

fn reset_search(state: &mut AppState) {
    state.search_query.clear();
    state.search_results.clear();
    state.search_error = None;
    state.search_selected = 0;
    state.search_generation += 1;
}

/// Trimmed query, if it is long enough to be worth a lookup.
pub fn lookup_query(raw: &str) -> Option<String> {
    let query = raw.trim();
    (query.chars().count() >= MIN_QUERY_CHARS).then(|| query.to_string())
}

fn lookup_effect(state: &AppState, debounce: bool) -> Effect {
    match lookup_query(&state.search_query) {
        Some(query) => Effect::SearchLocations {
            query,
            generation: state.search_generation,
            debounce,
        },
        None => Effect::CancelSearch,
    }
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    if tick_count == 0 {
        return cycle;
    }
    let remainder = tick_count % cycle;
    if remainder == 0 { 0 } else { cycle - remainder }
}
