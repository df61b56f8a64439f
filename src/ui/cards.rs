//! Summary cards shown above the chart.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::data::format::format_fixed;
use crate::data::Metrics;

use super::theme::Theme;

/// Glyph shown next to a card title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardIcon {
    Chart,
    Bell,
    Clock,
}

impl CardIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            CardIcon::Chart => "≋",
            CardIcon::Bell => "⍾",
            CardIcon::Clock => "◷",
        }
    }
}

/// How a card's value is colored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardTone {
    #[default]
    Normal,
    /// Drawn in the alert color.
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardConfig {
    pub title: &'static str,
    pub icon: CardIcon,
    pub tone: CardTone,
}

pub const TOTAL_POINTS: CardConfig = CardConfig {
    title: "Total Data Points Processed",
    icon: CardIcon::Chart,
    tone: CardTone::Normal,
};

pub const ANOMALIES: CardConfig = CardConfig {
    title: "Anomalies Detected",
    icon: CardIcon::Bell,
    tone: CardTone::Alert,
};

pub const PROCESSING_TIME: CardConfig = CardConfig {
    title: "Processing Time per Data Point",
    icon: CardIcon::Clock,
    tone: CardTone::Normal,
};

pub const AVERAGE_CURRENT: CardConfig = CardConfig {
    title: "Average Current Value",
    icon: CardIcon::Chart,
    tone: CardTone::Normal,
};

/// A card ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub config: CardConfig,
    pub value: String,
}

/// The four summary cards for a metrics snapshot, left to right.
pub fn summary_cards(metrics: &Metrics) -> [Card; 4] {
    [
        Card {
            config: TOTAL_POINTS,
            value: metrics.total_points.to_string(),
        },
        Card {
            config: ANOMALIES,
            value: metrics.anomalies_detected.to_string(),
        },
        Card {
            config: PROCESSING_TIME,
            value: format!("{} ms", format_fixed(metrics.average_processing_time, 2)),
        },
        Card {
            config: AVERAGE_CURRENT,
            value: format_fixed(metrics.average_current_value, 2),
        },
    ]
}

/// Render the card row.
pub fn render(frame: &mut Frame, theme: &Theme, metrics: &Metrics, area: Rect) {
    let cards = summary_cards(metrics);
    let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        render_card(frame, theme, card, *column);
    }
}

fn render_card(frame: &mut Frame, theme: &Theme, card: &Card, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", card.config.title), theme.title),
        Span::styled(format!("{} ", card.config.icon.glyph()), theme.muted),
    ]);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));

    let value = Paragraph::new(Line::from(Span::styled(
        format!(" {}", card.value),
        theme.value_style(card.config.tone == CardTone::Alert),
    )))
    .block(block);

    frame.render_widget(value, area);
}
