//! Horizontal row of daily forecast cards

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Paragraph},
};

use super::Component;
use crate::action::Action;
use crate::state::{ForecastDay, TempUnit};
use crate::theme::Theme;

/// Card height: border + weekday + icon + temperature + border.
pub const FORECAST_STRIP_HEIGHT: u16 = 5;
const CARD_WIDTH: u16 = 12;
const CARD_GAP: u16 = 1;

pub struct ForecastStrip;

pub struct ForecastStripProps<'a> {
    pub days: &'a [ForecastDay],
    pub unit: TempUnit,
    pub theme: &'a Theme,
}

/// How many cards fit side by side in `width` columns.
pub fn visible_cards(width: u16, available: usize) -> usize {
    let per_card = CARD_WIDTH + CARD_GAP;
    let fit = ((width + CARD_GAP) / per_card) as usize;
    fit.min(available)
}

impl Component<Action> for ForecastStrip {
    type Props<'a> = ForecastStripProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let count = visible_cards(area.width, props.days.len());
        if count == 0 || area.height < FORECAST_STRIP_HEIGHT {
            return;
        }

        let cards = Layout::horizontal(vec![Constraint::Length(CARD_WIDTH); count])
            .spacing(CARD_GAP)
            .flex(Flex::Center)
            .split(area);

        for (day, card_area) in props.days.iter().zip(cards.iter()) {
            let condition = props.theme.conditions.resolve(&day.day.condition.text);
            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(props.theme.muted))
                .style(Style::default().bg(props.theme.card_bg));

            let lines = vec![
                Line::from(day.weekday_name()).centered(),
                Line::from(condition.emoji()).centered(),
                Line::from(props.unit.format_short(day.day.avgtemp_c))
                    .bold()
                    .centered(),
            ];
            frame.render_widget(Paragraph::new(lines).block(block), *card_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_cards() {
        assert_eq!(visible_cards(11, 7), 0);
        assert_eq!(visible_cards(12, 7), 1);
        assert_eq!(visible_cards(25, 7), 2);
        assert_eq!(visible_cards(200, 7), 7);
    }
}
