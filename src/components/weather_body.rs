use artbox::{
    Alignment as ArtAlignment, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use tui_dispatch::DataResource;

use super::forecast_strip::FORECAST_STRIP_HEIGHT;
use super::location_header::{HEADER_OVERHEAD, gradient_colors};
use super::{
    Component, ERROR_ICON, ForecastStrip, ForecastStripProps, LocationHeader, LocationHeaderProps,
};
use crate::action::Action;
use crate::sprites::{self, SPRITE_HEIGHT};
use crate::state::{AppState, WeatherPayload};
use crate::theme::Theme;

pub struct WeatherBody;

pub struct WeatherBodyProps<'a> {
    pub state: &'a AppState,
    pub theme: &'a Theme,
}

/// Fixed rows: blank + description + blank + stats + blank.
const LAYOUT_FIXED: u16 = 5;

/// Text cap tiers: (header_cap, temp_cap).
/// terminus(6), miniwi(4), plain(1) - with HEADER_OVERHEAD added to header.
const TEXT_TIERS: [(u16, u16); 3] = [
    (6 + HEADER_OVERHEAD, 6),
    (4 + HEADER_OVERHEAD, 4),
    (1 + HEADER_OVERHEAD, 1),
];

/// Smallest body that still gets the forecast strip (plain text, emoji icon).
const STRIP_MIN_HEIGHT: u16 = 1 + HEADER_OVERHEAD + 1 + 1 + LAYOUT_FIXED + FORECAST_STRIP_HEIGHT;

#[derive(Debug, PartialEq)]
struct LayoutSizing {
    show_sprite: bool,
    sprite_h: u16,
    header_cap: u16,
    temp_cap: u16,
    strip_h: u16,
}

/// Keep the forecast strip if possible, then fit the sprite by shrinking
/// text; fall back to the emoji when no sprite fits even with plain text.
fn compute_layout(area_height: u16) -> LayoutSizing {
    let strip_h = if area_height >= STRIP_MIN_HEIGHT {
        FORECAST_STRIP_HEIGHT
    } else {
        0
    };
    for &(hcap, tcap) in &TEXT_TIERS {
        let budget = area_height.saturating_sub(hcap + tcap + LAYOUT_FIXED + strip_h);
        if budget >= SPRITE_HEIGHT {
            return LayoutSizing {
                show_sprite: true,
                sprite_h: SPRITE_HEIGHT,
                header_cap: hcap,
                temp_cap: tcap,
                strip_h,
            };
        }
    }
    let (hcap, tcap) = TEXT_TIERS[2];
    LayoutSizing {
        show_sprite: false,
        sprite_h: 1,
        header_cap: hcap,
        temp_cap: tcap,
        strip_h,
    }
}

// ============================================================================
// Component
// ============================================================================

impl Component<Action> for WeatherBody {
    type Props<'a> = WeatherBodyProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let WeatherBodyProps { state, theme } = props;
        let sizing = compute_layout(area.height);

        match &state.weather {
            DataResource::Failed(error) => render_error(frame, area, theme, error),
            DataResource::Loaded(payload) => {
                render_ready(frame, area, state, theme, payload, &sizing);
            }
            DataResource::Loading => {
                render_placeholder(frame, area, state, theme, &sizing, "Loading forecast...");
            }
            DataResource::Empty => {
                render_placeholder(frame, area, state, theme, &sizing, "Waiting for a city...");
            }
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let subtitle = state
        .current_location()
        .map(|location| location.subtitle())
        .unwrap_or_default();
    let mut header = LocationHeader;
    header.render(
        frame,
        area,
        LocationHeaderProps {
            name: state.headline(),
            subtitle: &subtitle,
            temperature: state.weather.data().map(|w| w.current.temp_c),
            is_animating: state.loading_anim_active(),
            tick_count: state.tick_count,
            subtitle_color: theme.muted,
        },
    );
}

fn make_layout(area: Rect, sizing: &LayoutSizing) -> std::rc::Rc<[Rect]> {
    Layout::vertical([
        Constraint::Max(sizing.header_cap),
        Constraint::Length(1),
        Constraint::Length(sizing.sprite_h),
        Constraint::Max(sizing.temp_cap),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(sizing.strip_h),
    ])
    .flex(Flex::Center)
    .split(area)
}

fn render_ready(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    theme: &Theme,
    payload: &WeatherPayload,
    sizing: &LayoutSizing,
) {
    let chunks = make_layout(area, sizing);

    render_header(frame, chunks[0], state, theme);

    // Sprite or emoji
    let condition = theme.conditions.resolve(&payload.current.condition.text);
    if sizing.show_sprite {
        frame.render_widget(
            Paragraph::new(sprites::get_sprite(condition)).alignment(Alignment::Center),
            chunks[2],
        );
    } else {
        let emoji = Line::from(condition.emoji()).centered();
        frame.render_widget(Paragraph::new(emoji), chunks[2]);
    }

    // Temperature
    let temp_text = state.unit.format(payload.current.temp_c);
    let (start, end) = gradient_colors(Some(payload.current.temp_c));
    let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
        .with_plain_fallback()
        .with_alignment(ArtAlignment::Center)
        .with_fill(Fill::Linear(LinearGradient::horizontal(start, end)));
    frame.render_widget(ArtBox::new(&renderer, &temp_text), chunks[3]);

    // Condition text
    let desc = Line::from(vec![Span::styled(
        payload.current.condition.text.clone(),
        Style::default().fg(ratatui::style::Color::Gray),
    )])
    .centered();
    frame.render_widget(Paragraph::new(desc), chunks[4]);

    frame.render_widget(Paragraph::new(stats_line(payload, theme)), chunks[6]);

    if sizing.strip_h > 0 {
        let mut strip = ForecastStrip;
        strip.render(
            frame,
            chunks[8],
            ForecastStripProps {
                days: &payload.forecast.forecastday,
                unit: state.unit,
                theme,
            },
        );
    }
}

/// Wind, humidity and sunrise on one line.
fn stats_line(payload: &WeatherPayload, theme: &Theme) -> Line<'static> {
    let label = Style::default().fg(theme.muted);
    let value = Style::default().fg(theme.text).bold();
    let mut spans = vec![
        Span::styled("wind ", label),
        Span::styled(format!("{:.1} kph", payload.current.wind_kph), value),
        Span::raw("   "),
        Span::styled("humidity ", label),
        Span::styled(format!("{} %", payload.current.humidity), value),
    ];
    if let Some(sunrise) = payload.sunrise() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled("sunrise ", label));
        spans.push(Span::styled(sunrise.to_string(), value));
    }
    Line::from(spans).centered()
}

fn render_placeholder(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    theme: &Theme,
    sizing: &LayoutSizing,
    message: &str,
) {
    let chunks = make_layout(area, sizing);
    render_header(frame, chunks[0], state, theme);

    let msg = Line::from(vec![Span::styled(
        message.to_string(),
        Style::default().fg(theme.muted),
    )])
    .centered();
    frame.render_widget(Paragraph::new(msg), chunks[4]);
}

fn render_error(frame: &mut Frame, area: Rect, theme: &Theme, error: &str) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // blank
        Constraint::Length(1), // icon
        Constraint::Length(1), // "Error"
        Constraint::Length(1), // message
        Constraint::Length(1), // blank
        Constraint::Length(1), // hint
    ])
    .flex(Flex::Center)
    .split(area);

    let centered = |line: Line<'static>| Paragraph::new(line.centered());

    frame.render_widget(centered(Line::from(ERROR_ICON)), chunks[1]);
    frame.render_widget(
        centered(Line::from(Span::styled(
            "Error",
            Style::default().fg(ratatui::style::Color::Red).bold(),
        ))),
        chunks[2],
    );
    frame.render_widget(
        centered(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(theme.error),
        ))),
        chunks[3],
    );
    frame.render_widget(
        centered(Line::from(vec![
            Span::styled("Press ", Style::default().fg(theme.muted)),
            Span::styled("r", Style::default().fg(theme.accent).bold()),
            Span::styled(" to retry or ", Style::default().fg(theme.muted)),
            Span::styled("/", Style::default().fg(theme.accent).bold()),
            Span::styled(" to search", Style::default().fg(theme.muted)),
        ])),
        chunks[5],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tall_area_gets_sprite_and_strip() {
        let sizing = compute_layout(40);
        assert!(sizing.show_sprite);
        assert_eq!(sizing.strip_h, FORECAST_STRIP_HEIGHT);
        assert_eq!(sizing.header_cap, 6 + HEADER_OVERHEAD);
    }

    #[test]
    fn test_short_area_drops_strip_and_sprite() {
        let sizing = compute_layout(10);
        assert!(!sizing.show_sprite);
        assert_eq!(sizing.strip_h, 0);
        assert_eq!(sizing.sprite_h, 1);
    }
}
