//! citycast - current conditions and a week of forecast in the terminal

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use citycast::action::Action;
use citycast::api::WeatherApiClient;
use citycast::components::{
    Component, SearchOverlay, SearchOverlayProps, WeatherDisplay, WeatherDisplayProps,
};
use citycast::config::CliConfig;
use citycast::effect::Effect;
use citycast::reducer::reducer;
use citycast::runtime::{self, Services};
use citycast::state::{AppState, LOADING_ANIM_TICK_MS};
use citycast::storage::FileStore;
use citycast::theme::Theme;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem};

/// Weather forecast TUI with city search
#[derive(Parser, Debug)]
#[command(name = "citycast")]
#[command(about = "Current weather and a 7-day forecast for any city")]
struct Args {
    #[command(flatten)]
    config: CliConfig,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum CastComponentId {
    Display,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum CastContext {
    Main,
    Search,
}

impl EventRoutingState<CastComponentId, CastContext> for AppState {
    fn focused(&self) -> Option<CastComponentId> {
        if self.search_mode {
            Some(CastComponentId::Search)
        } else {
            Some(CastComponentId::Display)
        }
    }

    fn modal(&self) -> Option<CastComponentId> {
        if self.search_mode {
            Some(CastComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: CastComponentId) -> CastContext {
        match id {
            CastComponentId::Display => CastContext::Main,
            CastComponentId::Search => CastContext::Search,
        }
    }

    fn default_context(&self) -> CastContext {
        CastContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    // A .env next to the binary may carry WEATHER_API_KEY
    dotenvy::dotenv().ok();

    let Args {
        config,
        debug: debug_args,
    } = Args::parse();

    let config = match config.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if let Some(path) = &config.log_file {
        init_logging(path)?;
    }
    info!(
        fallback = %config.fallback_city,
        days = config.forecast_days,
        storage = %config.storage_path.display(),
        "starting citycast"
    );

    let weather = WeatherApiClient::new(config.api_key.clone(), config.base_url.clone())
        .map_err(io::Error::other)?;
    let services = Services::new(
        Arc::new(weather),
        Arc::new(FileStore::new(config.storage_path.clone())),
    );

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let fallback_city = config.fallback_city.clone();
    let forecast_days = config.forecast_days;
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(fallback_city, forecast_days))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(
        &mut terminal,
        &debug,
        store,
        services,
        config.refresh_interval,
        replay_actions,
    )
    .await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    info!("citycast stopped");
    Ok(())
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("citycast=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))
}

struct CastUi {
    theme: Theme,
    display: WeatherDisplay,
    search: SearchOverlay,
}

impl CastUi {
    fn new(theme: Theme) -> Self {
        Self {
            theme,
            display: WeatherDisplay,
            search: SearchOverlay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<CastComponentId>,
    ) {
        event_ctx.set_component_area(CastComponentId::Display, area);

        let props = WeatherDisplayProps {
            state,
            theme: &self.theme,
            is_focused: render_ctx.is_focused() && !state.search_mode,
        };
        self.display.render(frame, area, props);

        self.search.set_open(state.search_mode);
        if state.search_mode {
            event_ctx.set_component_area(CastComponentId::Search, SearchOverlay::modal_area(area));
            let props = search_props(state, &self.theme, render_ctx.is_focused());
            self.search.render(frame, area, props);
        } else {
            event_ctx.component_areas.remove(&CastComponentId::Search);
        }
    }

    fn handle_display_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = WeatherDisplayProps {
            state,
            theme: &self.theme,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
        if actions.is_empty() {
            HandlerResponse::ignored()
        } else {
            HandlerResponse {
                actions,
                consumed: true,
                needs_render: false,
            }
        }
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_open(state.search_mode);
        let props = search_props(state, &self.theme, true);
        let actions: Vec<_> = self.search.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn search_props<'a>(
    state: &'a AppState,
    theme: &'a Theme,
    is_focused: bool,
) -> SearchOverlayProps<'a> {
    SearchOverlayProps {
        query: &state.search_query,
        results: &state.search_results,
        selected: state.search_selected,
        is_focused,
        error: state.search_error.as_deref(),
        theme,
        on_query_change: Action::SearchQueryChange,
        on_query_submit: Action::SearchQuerySubmit,
        on_select: Action::SearchSelect,
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    services: Services,
    refresh_interval: Duration,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(CastUi::new(Theme::default())));
    let mut bus: EventBus<AppState, Action, CastComponentId, CastContext> = EventBus::new();
    let keybindings: Keybindings<CastContext> = Keybindings::new();

    let ui_display = Rc::clone(&ui);
    bus.register(CastComponentId::Display, move |event, state| {
        ui_display
            .borrow_mut()
            .handle_display_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(CastComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );

                runtime
                    .subscriptions()
                    .interval("refresh", refresh_interval, || Action::ForecastRefresh);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect: Effect, ctx: &mut EffectContext<Action>| {
                runtime::handle_effect(effect, ctx, &services)
            },
        )
        .await
}
