//! Store flows with EffectStoreTestHarness
//!
//! Each test plays the runtime: dispatch, inspect the declared effects,
//! then feed back the action the effect would have produced.

use citycast::{
    action::Action,
    components::{Component, WeatherDisplay, WeatherDisplayProps},
    effect::Effect,
    reducer::reducer,
    state::{
        AppState, Astro, Condition, CurrentWeather, DaySummary, Forecast, ForecastDay,
        ForecastRequest, Location, TempUnit, WeatherPayload,
    },
    theme::Theme,
};
use tui_dispatch::testing::*;
use tui_dispatch::{DataResource, NumericComponentId};

fn location(name: &str, country: &str) -> Location {
    Location {
        name: name.into(),
        region: String::new(),
        country: country.into(),
        lat: 0.0,
        lon: 0.0,
    }
}

fn mock_payload(name: &str) -> WeatherPayload {
    WeatherPayload {
        location: location(name, "Somewhere"),
        current: CurrentWeather {
            temp_c: 21.0,
            wind_kph: 9.0,
            humidity: 60,
            condition: Condition {
                text: "Sunny".into(),
            },
            ..Default::default()
        },
        forecast: Forecast {
            forecastday: vec![ForecastDay {
                date: "2024-03-04".into(),
                astro: Astro {
                    sunrise: "06:01 AM".into(),
                    sunset: None,
                },
                day: DaySummary {
                    avgtemp_c: 20.0,
                    condition: Condition {
                        text: "Sunny".into(),
                    },
                    ..Default::default()
                },
            }],
        },
    }
}

fn state_with_weather(name: &str) -> AppState {
    AppState {
        city: name.into(),
        weather: DataResource::Loaded(mock_payload(name)),
        ..Default::default()
    }
}

fn fetch_of(effect: &Effect) -> Option<&ForecastRequest> {
    match effect {
        Effect::FetchForecast { request, .. } => Some(request),
        _ => None,
    }
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn test_startup_with_saved_city() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadSavedCity));

    harness.dispatch_collect(Action::SavedCityDidLoad(Some("Oslo".into())));

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(e, Effect::FetchForecast { request, days: 7 } if request.city == "Oslo")
    });
    harness.assert_state(|s| s.weather.is_loading());
}

#[test]
fn test_startup_fallback_then_load() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::SavedCityDidLoad(None));

    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_all_match(|e| {
        matches!(e, Effect::LoadSavedCity)
            || matches!(e, Effect::FetchForecast { request, .. } if request.city == "Kolkata")
    });

    harness.complete_action(Action::ForecastDidLoad {
        request_id: 1,
        payload: mock_payload("Kolkata"),
    });
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 1, "Should have processed 1 action");
    assert_eq!(changed, 1, "Action should have changed state");
    harness.assert_state(|s| s.weather.is_loaded());
    harness.assert_state(|s| s.city == "Kolkata");
    harness.drain_effects().effects_empty();
}

// ============================================================================
// Failures and retry
// ============================================================================

#[test]
fn test_first_load_error_then_retry() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SavedCityDidLoad(None));
    harness.drain_effects();

    harness.complete_action(Action::ForecastDidError {
        request_id: 1,
        error: "Network error".into(),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.weather.is_failed());
    harness.assert_state(|s| s.weather.error() == Some("Network error"));
    harness.assert_state(|s| !s.is_loading());

    harness.dispatch_collect(Action::ForecastRetry);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        fetch_of(e).is_some_and(|r| r.id == 2 && r.city == "Kolkata")
    });
    harness.assert_state(|s| s.weather.is_loading());
}

#[test]
fn test_refresh_error_keeps_previous_payload() {
    let mut harness = EffectStoreTestHarness::new(state_with_weather("Lima"), reducer);

    harness.dispatch_collect(Action::ForecastRefresh);
    harness.assert_state(|s| s.is_refreshing && s.weather.is_loaded());
    harness.drain_effects();

    harness.complete_action(Action::ForecastDidError {
        request_id: 1,
        error: "Bad Gateway (HTTP 502)".into(),
    });
    harness.process_emitted();

    harness.assert_state(|s| !s.is_loading());
    harness.assert_state(|s| s.current_location().is_some_and(|l| l.name == "Lima"));
    harness.assert_state(|s| {
        s.status.as_deref() == Some("Could not load Lima: Bad Gateway (HTTP 502)")
    });
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_short_query_issues_no_lookup() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchOpen);

    harness.dispatch_collect(Action::SearchQueryChange("Lo".into()));
    harness.dispatch_collect(Action::SearchQueryChange("  Lo ".into()));

    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_all_match(|e| matches!(e, Effect::CancelSearch));
    harness.assert_state(|s| s.search_results.is_empty());
}

#[test]
fn test_typing_issues_debounced_lookup() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchOpen);

    harness.dispatch_collect(Action::SearchQueryChange(" Lon ".into()));

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::SearchLocations { query, debounce: true, .. } if query == "Lon"
        )
    });
}

#[test]
fn test_submit_looks_up_immediately() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::SearchOpen);
    harness.dispatch_collect(Action::SearchQuerySubmit("London".into()));

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::SearchLocations { query, debounce: false, .. } if query == "London"
        )
    });
}

#[test]
fn test_stale_lookup_results_are_ignored() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchOpen);
    // Opening bumps the generation to 1, each keystroke after that by one
    harness.dispatch_collect(Action::SearchQueryChange("Lon".into()));
    harness.dispatch_collect(Action::SearchQueryChange("Lond".into()));
    harness.drain_effects();

    harness.complete_action(Action::SearchDidLoad {
        generation: 2,
        results: vec![location("Longyearbyen", "Norway")],
    });
    harness.complete_action(Action::SearchDidLoad {
        generation: 3,
        results: vec![location("London", "United Kingdom")],
    });
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 2);
    assert_eq!(changed, 1);
    harness.assert_state(|s| s.search_results.len() == 1);
    harness.assert_state(|s| s.search_results[0].name == "London");
}

#[test]
fn test_select_candidate_fetches_and_remembers() {
    let mut harness = EffectStoreTestHarness::new(state_with_weather("Kolkata"), reducer);
    harness.dispatch_collect(Action::SearchOpen);
    harness.dispatch_collect(Action::SearchQueryChange("Lon".into()));
    harness.drain_effects();

    harness.complete_action(Action::SearchDidLoad {
        generation: 2,
        results: vec![
            location("Londrina", "Brazil"),
            location("London", "United Kingdom"),
        ],
    });
    harness.process_emitted();
    harness.dispatch_collect(Action::SearchSelect(1));
    harness.dispatch_collect(Action::SearchConfirm);

    harness.assert_state(|s| !s.search_mode);
    harness.assert_state(|s| s.search_results.is_empty() && s.search_query.is_empty());

    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::FetchForecast { request, days: 7 }
                if request.city == "London" && request.persist
        )
    });

    harness.dispatch_collect(Action::ForecastDidLoad {
        request_id: 1,
        payload: mock_payload("London"),
    });

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::SaveCity { city } if city == "London"));
    harness.assert_state(|s| s.city == "London");
}

#[test]
fn test_close_search_cancels_lookup() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::SearchOpen);
    harness.dispatch_collect(Action::SearchQueryChange("Paris".into()));
    harness.drain_effects();

    harness.dispatch_collect(Action::SearchClose);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::CancelSearch));

    // A lookup that finishes after closing changes nothing
    harness.complete_action(Action::SearchDidLoad {
        generation: 2,
        results: vec![location("Paris", "France")],
    });
    let (changed, _) = harness.process_emitted();
    assert_eq!(changed, 0);
}

// ============================================================================
// Component + Store Integration Tests
// ============================================================================

#[test]
fn test_keyboard_toggle_units() {
    let mut harness = EffectStoreTestHarness::new(state_with_weather("Lima"), reducer);
    let mut component = WeatherDisplay;
    let theme = Theme::default();

    harness.assert_state(|s| s.unit == TempUnit::Celsius);

    let actions = harness.send_keys::<NumericComponentId, _, _>("u", |state, event| {
        let props = WeatherDisplayProps {
            state,
            theme: &theme,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    for action in actions {
        harness.dispatch_collect(action);
    }

    harness.assert_state(|s| s.unit == TempUnit::Fahrenheit);
}

#[test]
fn test_render_unit_toggle_changes_display() {
    let mut harness = EffectStoreTestHarness::new(state_with_weather("Lima"), reducer);
    let mut component = WeatherDisplay;
    let theme = Theme::default();

    let celsius_output = harness.render_plain(80, 30, |frame, area, state| {
        let props = WeatherDisplayProps {
            state,
            theme: &theme,
            is_focused: true,
        };
        component.render(frame, area, props);
    });

    harness.dispatch_collect(Action::UiToggleUnits);

    let fahrenheit_output = harness.render_plain(80, 30, |frame, area, state| {
        let props = WeatherDisplayProps {
            state,
            theme: &theme,
            is_focused: true,
        };
        component.render(frame, area, props);
    });

    assert_ne!(
        celsius_output, fahrenheit_output,
        "Celsius and Fahrenheit renders should differ"
    );
}
