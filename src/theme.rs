//! Read-only rendering configuration handed to components through props

use std::collections::HashMap;

use ratatui::style::Color;

use crate::sprites::WeatherCondition;

/// Known condition texts from the forecast API and the art they map to
const CONDITION_TABLE: &[(&str, WeatherCondition)] = &[
    ("Sunny", WeatherCondition::ClearSky),
    ("Clear", WeatherCondition::ClearSky),
    ("Partly cloudy", WeatherCondition::PartlyCloudy),
    ("Partly Cloudy", WeatherCondition::PartlyCloudy),
    ("Cloudy", WeatherCondition::Cloudy),
    ("Overcast", WeatherCondition::Cloudy),
    ("Mist", WeatherCondition::Fog),
    ("Fog", WeatherCondition::Fog),
    ("Freezing fog", WeatherCondition::Fog),
    ("Patchy rain possible", WeatherCondition::Drizzle),
    ("Patchy rain nearby", WeatherCondition::Drizzle),
    ("Light drizzle", WeatherCondition::Drizzle),
    ("Patchy light drizzle", WeatherCondition::Drizzle),
    ("Light rain", WeatherCondition::Drizzle),
    ("Patchy light rain", WeatherCondition::Drizzle),
    ("Moderate rain", WeatherCondition::Rain),
    ("Moderate rain at times", WeatherCondition::Rain),
    ("Heavy rain", WeatherCondition::Rain),
    ("Heavy rain at times", WeatherCondition::Rain),
    ("Moderate or heavy freezing rain", WeatherCondition::Rain),
    ("Moderate or heavy rain shower", WeatherCondition::Rain),
    ("Torrential rain shower", WeatherCondition::Rain),
    ("Moderate or heavy rain with thunder", WeatherCondition::Thunderstorm),
    ("Thundery outbreaks possible", WeatherCondition::Thunderstorm),
    ("Light snow", WeatherCondition::Snow),
    ("Moderate snow", WeatherCondition::Snow),
    ("Heavy snow", WeatherCondition::Snow),
    ("Blizzard", WeatherCondition::Snow),
];

/// Condition text → condition category, with a keyword fallback
#[derive(Clone, Debug)]
pub struct ConditionMap {
    entries: HashMap<String, WeatherCondition>,
}

impl ConditionMap {
    pub fn new(entries: impl IntoIterator<Item = (String, WeatherCondition)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(text, condition)| (normalize(&text), condition))
                .collect(),
        }
    }

    pub fn resolve(&self, text: &str) -> WeatherCondition {
        self.entries
            .get(&normalize(text))
            .copied()
            .unwrap_or_else(|| WeatherCondition::guess_from_text(text))
    }
}

impl Default for ConditionMap {
    fn default() -> Self {
        Self::new(
            CONDITION_TABLE
                .iter()
                .map(|(text, condition)| (text.to_string(), *condition)),
        )
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
    pub overlay_bg: Color,
    pub input_bg: Color,
    pub card_bg: Color,
    pub conditions: ConditionMap,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Reset,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            error: Color::Rgb(200, 100, 100),
            overlay_bg: Color::Rgb(35, 35, 45),
            input_bg: Color::Rgb(50, 50, 60),
            card_bg: Color::Rgb(30, 34, 44),
            conditions: ConditionMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup_is_case_insensitive() {
        let map = ConditionMap::default();
        assert_eq!(map.resolve("partly cloudy "), WeatherCondition::PartlyCloudy);
        assert_eq!(map.resolve("Light rain"), WeatherCondition::Drizzle);
    }

    #[test]
    fn test_unknown_text_falls_back_to_keywords() {
        let map = ConditionMap::default();
        assert_eq!(
            map.resolve("Patchy snow with thunder"),
            WeatherCondition::Thunderstorm
        );
    }

    #[test]
    fn test_custom_map_overrides() {
        let map = ConditionMap::new([("Sunny".to_string(), WeatherCondition::Fog)]);
        assert_eq!(map.resolve("Sunny"), WeatherCondition::Fog);
    }
}
