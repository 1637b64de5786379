//! Weather sprites with multi-color layer support
//!
//! Every sprite is 5 rows tall. Multi-layer sprites (like partly cloudy)
//! composite several colored layers; spaces are transparent.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};

/// Rows occupied by every sprite.
pub const SPRITE_HEIGHT: u16 = 5;

// ============================================================================
// Sprite data
// ============================================================================

mod sprite_data {
    pub const SUN: &str = concat!(
        "    \\   /    \n",
        "     .-.     \n",
        "  - (   ) -  \n",
        "     `-'     \n",
        "    /   \\    \n",
    );

    pub const PARTLY_SUN: &str = concat!(
        "   \\  /      \n",
        " _ /\"\"       \n",
        "   \\_        \n",
        "   /         \n",
        "             \n",
    );
    pub const PARTLY_CLOUD: &str = concat!(
        "             \n",
        "      .-.    \n",
        "     (   ).  \n",
        "    (___(__) \n",
        "             \n",
    );

    pub const CLOUD_BACK: &str = concat!(
        "        .--. \n",
        "     .-(    )\n",
        "             \n",
        "             \n",
        "             \n",
    );
    pub const CLOUD_FRONT: &str = concat!(
        "             \n",
        "     .--.    \n",
        "  .-(    ).  \n",
        " (___.__)__) \n",
        "             \n",
    );

    pub const FOG: &str = concat!(
        "             \n",
        " _ - _ - _ - \n",
        "  _ - _ - _  \n",
        " _ - _ - _ - \n",
        "             \n",
    );

    pub const RAIN_CLOUD: &str = concat!(
        "     .-.     \n",
        "    (   ).   \n",
        "   (___(__)  \n",
        "             \n",
        "             \n",
    );
    pub const DRIZZLE: &str = concat!(
        "             \n",
        "             \n",
        "             \n",
        "    ' ' ' '  \n",
        "   ' ' ' '   \n",
    );
    pub const RAIN: &str = concat!(
        "             \n",
        "             \n",
        "             \n",
        "  ,',',',',  \n",
        "  ,',',',',  \n",
    );
    pub const SNOW: &str = concat!(
        "             \n",
        "             \n",
        "             \n",
        "    *  *  *  \n",
        "   *  *  *   \n",
    );
    pub const LIGHTNING: &str = concat!(
        "             \n",
        "             \n",
        "             \n",
        "   ,/  ,/    \n",
        "   /   /     \n",
    );
}

// ============================================================================
// Layer compositing
// ============================================================================

struct SpriteLayer {
    content: &'static str,
    color: Color,
}

/// Composite layers into Text, later layers drawn on top; spaces are transparent
fn composite_layers(layers: &[SpriteLayer]) -> Text<'static> {
    let grids: Vec<Vec<Vec<char>>> = layers
        .iter()
        .map(|layer| layer.content.lines().map(|l| l.chars().collect()).collect())
        .collect();

    let rows = grids.iter().map(Vec::len).max().unwrap_or(0);
    let cols = grids
        .iter()
        .flat_map(|grid| grid.iter().map(Vec::len))
        .max()
        .unwrap_or(0);

    let lines = (0..rows)
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..cols)
                .map(|col| {
                    let top = layers.iter().zip(&grids).rev().find_map(|(layer, grid)| {
                        grid.get(row)
                            .and_then(|line| line.get(col))
                            .filter(|ch| **ch != ' ')
                            .map(|ch| (*ch, layer.color))
                    });
                    let (ch, color) = top.unwrap_or((' ', Color::Reset));
                    Span::styled(ch.to_string(), Style::default().fg(color))
                })
                .collect();
            Line::from(spans)
        })
        .collect::<Vec<_>>();

    Text::from(lines)
}

// ============================================================================
// Types
// ============================================================================

/// Weather condition categories
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeatherCondition {
    ClearSky,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Best guess from free-form condition text ("Patchy light rain with thunder").
    pub fn guess_from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        let has = |needle: &str| text.contains(needle);
        if has("thunder") {
            WeatherCondition::Thunderstorm
        } else if has("snow") || has("sleet") || has("ice") || has("blizzard") {
            WeatherCondition::Snow
        } else if has("drizzle") || has("light rain") || has("patchy rain") {
            WeatherCondition::Drizzle
        } else if has("rain") || has("shower") {
            WeatherCondition::Rain
        } else if has("fog") || has("mist") || has("haze") {
            WeatherCondition::Fog
        } else if has("partly") {
            WeatherCondition::PartlyCloudy
        } else if has("cloud") || has("overcast") {
            WeatherCondition::Cloudy
        } else if has("sun") || has("clear") {
            WeatherCondition::ClearSky
        } else {
            WeatherCondition::Unknown
        }
    }

    /// Emoji representation for when sprites don't fit
    pub fn emoji(self) -> &'static str {
        match self {
            WeatherCondition::ClearSky => "\u{2600}\u{fe0f}",
            WeatherCondition::PartlyCloudy => "\u{26c5}",
            WeatherCondition::Cloudy | WeatherCondition::Unknown => "\u{2601}\u{fe0f}",
            WeatherCondition::Fog => "\u{1f32b}\u{fe0f}",
            WeatherCondition::Drizzle => "\u{1f326}\u{fe0f}",
            WeatherCondition::Rain => "\u{1f327}\u{fe0f}",
            WeatherCondition::Snow => "\u{2744}\u{fe0f}",
            WeatherCondition::Thunderstorm => "\u{26c8}\u{fe0f}",
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

const CLOUD_GRAY: Color = Color::Rgb(200, 200, 210);
const CLOUD_DARK: Color = Color::Rgb(120, 120, 140);
const RAIN_BLUE: Color = Color::Rgb(100, 160, 255);

/// Get weather art for the given condition
pub fn get_sprite(condition: WeatherCondition) -> Text<'static> {
    use sprite_data::*;

    let layer = |content, color| SpriteLayer { content, color };
    let layers = match condition {
        WeatherCondition::ClearSky => vec![layer(SUN, Color::Yellow)],
        WeatherCondition::PartlyCloudy => vec![
            layer(PARTLY_SUN, Color::Yellow),
            layer(PARTLY_CLOUD, CLOUD_GRAY),
        ],
        WeatherCondition::Cloudy | WeatherCondition::Unknown => vec![
            layer(CLOUD_BACK, CLOUD_DARK),
            layer(CLOUD_FRONT, Color::Rgb(170, 170, 185)),
        ],
        WeatherCondition::Fog => vec![layer(FOG, Color::Rgb(180, 180, 190))],
        WeatherCondition::Drizzle => vec![layer(RAIN_CLOUD, CLOUD_GRAY), layer(DRIZZLE, RAIN_BLUE)],
        WeatherCondition::Rain => vec![layer(RAIN_CLOUD, CLOUD_DARK), layer(RAIN, RAIN_BLUE)],
        WeatherCondition::Snow => vec![layer(RAIN_CLOUD, CLOUD_GRAY), layer(SNOW, Color::White)],
        WeatherCondition::Thunderstorm => vec![
            layer(RAIN_CLOUD, CLOUD_DARK),
            layer(LIGHTNING, Color::Rgb(255, 220, 80)),
        ],
    };

    composite_layers(&layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_from_text() {
        assert_eq!(
            WeatherCondition::guess_from_text("Moderate or heavy rain with thunder"),
            WeatherCondition::Thunderstorm
        );
        assert_eq!(
            WeatherCondition::guess_from_text("Patchy light drizzle"),
            WeatherCondition::Drizzle
        );
        assert_eq!(
            WeatherCondition::guess_from_text("Heavy rain at times"),
            WeatherCondition::Rain
        );
        assert_eq!(
            WeatherCondition::guess_from_text("Freezing fog"),
            WeatherCondition::Fog
        );
        assert_eq!(
            WeatherCondition::guess_from_text("Something new"),
            WeatherCondition::Unknown
        );
    }

    #[test]
    fn test_sprites_have_fixed_height() {
        for condition in [
            WeatherCondition::ClearSky,
            WeatherCondition::PartlyCloudy,
            WeatherCondition::Cloudy,
            WeatherCondition::Fog,
            WeatherCondition::Drizzle,
            WeatherCondition::Rain,
            WeatherCondition::Snow,
            WeatherCondition::Thunderstorm,
        ] {
            assert_eq!(get_sprite(condition).lines.len() as u16, SPRITE_HEIGHT);
        }
    }

    #[test]
    fn test_top_layer_wins() {
        let text = get_sprite(WeatherCondition::Rain);
        let drop = &text.lines[3].spans[2];
        assert_eq!(drop.content, ",");
        assert_eq!(drop.style.fg, Some(RAIN_BLUE));
    }
}
