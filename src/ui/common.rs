//! Common UI components shared across the dashboard.
//!
//! This module contains the header bar, status bar, help overlay and the
//! chart tooltip.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::format::{format_age, format_count};
use crate::data::{DataPoint, SlotStatus};

use super::chart::tooltip_lines;
use super::theme::Theme;

/// Render the header bar.
///
/// Displays: title, sample and anomaly counts of the held series, backend.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let series = app.series();
    let anomalies = series.anomaly_count();

    let mut spans = vec![
        Span::styled(" ANOMALY DASH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format_count(series.len() as u64),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" points "),
        if anomalies > 0 {
            Span::styled(
                format_count(anomalies as u64),
                Style::default().fg(app.theme.alert).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" anomalies "),
    ];

    if let Some((min, max)) = series.value_range() {
        spans.push(Span::raw(format!("│ range {}..{} ", min, max)));
    }
    spans.push(Span::raw(format!("│ {}", app.source_description())));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Status text for one state slice, e.g. "series 0.4s ago #12".
pub fn slice_status(name: &str, status: Option<SlotStatus>, now: Instant) -> String {
    match status {
        Some(status) => format!(
            "{} {} ago #{}",
            name,
            format_age(now.saturating_duration_since(status.updated_at)),
            status.tick
        ),
        None => format!("{} waiting", name),
    }
}

/// Render the status bar at the bottom.
///
/// Shows how old each slice is and the available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let now = Instant::now();
    let status = format!(
        " {} | {} | ←/→:inspect r:refresh R:remount ?:help q:quit",
        slice_status("series", app.series_status(), now),
        slice_status("metrics", app.metrics_status(), now),
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Chart",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Move tooltip"),
        Line::from("  Home/End    Oldest/newest sample"),
        Line::from("  Esc         Hide tooltip"),
        Line::from("  Mouse       Hover to inspect"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh now"),
        Line::from("  R         Remount (clear state)"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 17u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Where a tooltip box of `width`x`height` goes for a sample drawn at
/// `column`: beside the sample, flipped left near the right edge, and kept
/// inside `plot`.
pub fn tooltip_area(column: u16, plot: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(plot.width);
    let height = height.min(plot.height);

    let right_of = column.saturating_add(2);
    let x = if right_of.saturating_add(width) <= plot.right() {
        right_of
    } else {
        column.saturating_sub(width + 1).max(plot.x)
    };

    Rect::new(x, plot.y, width, height)
}

/// Render the tooltip for the hovered sample.
pub fn render_tooltip(frame: &mut Frame, theme: &Theme, point: &DataPoint, column: u16, plot: Rect) {
    let [time, current, anomaly] = tooltip_lines(point);
    let anomaly_style = if point.anomaly {
        Style::default().fg(theme.alert).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let width = [&time, &current, &anomaly]
        .iter()
        .map(|l| l.chars().count() as u16)
        .max()
        .unwrap_or(0)
        + 4;
    let area = tooltip_area(column, plot, width, 5);

    let lines = vec![
        Line::from(time),
        Line::from(current),
        Line::from(Span::styled(anomaly, anomaly_style)),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
