//! Live chart of the display series.
//!
//! [`ChartModel::build`] turns a [`DisplaySeries`] into everything the chart
//! widget needs (datasets, bounds, labels) without touching the terminal,
//! and [`render`] draws it.
//!
//! ```text
//!   1.7 ┤
//!   1.2 ┤     ⡠⠊⠉⠢⡀      ██
//!   0.6 ┤⠤⠔⠊      ⠈⠢⠤⠔⠊⠉
//!   0.3 ┼──────────────────────
//!       10:00   10:05    10:10
//! ```

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::format::format_hour_minute;
use crate::data::{DataPoint, DisplaySeries};

use super::theme::Theme;

pub const CHART_TITLE: &str = "Real-Time Data Stream";
pub const CHART_DESCRIPTION: &str = "Live updates of Current values and anomalies";

/// Fixed y display domain. Samples outside it are plotted and clipped.
pub const Y_BOUNDS: [f64; 2] = [0.3, 1.7];
/// Explicit y ticks, bottom to top.
pub const Y_TICKS: [f64; 6] = [0.3, 0.6, 0.9, 1.2, 1.5, 1.7];

/// How time labels on the x axis are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisLabelStyle {
    /// Rotation in degrees. Terminal cells cannot rotate text, so a non-zero
    /// angle only widens the spacing between labels.
    pub angle: i16,
}

impl Default for AxisLabelStyle {
    fn default() -> Self {
        Self { angle: -45 }
    }
}

impl AxisLabelStyle {
    /// Blank columns kept between neighbouring labels.
    pub fn gap(&self) -> u16 {
        if self.angle == 0 {
            1
        } else {
            3
        }
    }
}

/// How anomalous samples are marked.
///
/// A filled dot of radius 6 with a matching outline shrinks to one full
/// block cell in the terminal, so only the fill color is left to choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyMarker {
    pub fill: Color,
}

impl AnomalyMarker {
    pub fn new(fill: Color) -> Self {
        Self { fill }
    }

    pub fn glyph(&self) -> Marker {
        Marker::Block
    }
}

/// A y-axis tick: the value it marks and its text.
#[derive(Debug, Clone, PartialEq)]
pub struct YTick {
    pub value: f64,
    pub text: String,
}

/// One x-axis label and the sample it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XLabel {
    pub index: usize,
    pub text: String,
}

/// Everything needed to draw one frame of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    /// `(index, current)` for every sample, in series order.
    pub line: Vec<(f64, f64)>,
    /// `(index, current)` for anomalous samples only.
    pub anomalies: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_labels: Vec<XLabel>,
    pub y_ticks: Vec<YTick>,
}

impl ChartModel {
    /// Build the chart model for a plot `plot_width` columns wide.
    pub fn build(series: &DisplaySeries, plot_width: u16) -> Self {
        Self::build_with(series, plot_width, AxisLabelStyle::default())
    }

    pub fn build_with(series: &DisplaySeries, plot_width: u16, style: AxisLabelStyle) -> Self {
        let line: Vec<(f64, f64)> = series
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.current))
            .collect();

        let anomalies = series
            .iter()
            .enumerate()
            .filter(|(_, p)| p.anomaly)
            .map(|(i, p)| (i as f64, p.current))
            .collect();

        // A single sample still needs a non-empty x range.
        let x_max = (series.len().saturating_sub(1) as f64).max(1.0);

        Self {
            line,
            anomalies,
            x_bounds: [0.0, x_max],
            y_bounds: Y_BOUNDS,
            x_labels: x_labels(series, plot_width, style),
            y_ticks: Y_TICKS
                .iter()
                .map(|&value| YTick {
                    value,
                    text: format!("{:.1}", value),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    fn y_label_width(&self) -> usize {
        self.y_ticks.iter().map(|t| t.text.chars().count()).max().unwrap_or(0)
    }
}

fn x_labels(series: &DisplaySeries, plot_width: u16, style: AxisLabelStyle) -> Vec<XLabel> {
    let texts: Vec<String> = series.iter().map(|p| format_hour_minute(&p.datetime)).collect();
    let label_width = texts.iter().map(|t| t.chars().count()).max().unwrap_or(0).max(1);
    let budget = plot_width as usize / (label_width + style.gap() as usize);

    thin_indices(texts.len(), budget)
        .into_iter()
        .map(|index| XLabel {
            index,
            text: texts[index].clone(),
        })
        .collect()
}

/// Pick at most `budget` evenly spaced indices out of `len`, always keeping
/// the first and the last. A budget below 2 is raised to 2.
pub fn thin_indices(len: usize, budget: usize) -> Vec<usize> {
    match len {
        0 => return Vec::new(),
        1 => return vec![0],
        _ => {}
    }

    let count = budget.max(2).min(len);
    let span = len - 1;
    let steps = count - 1;
    (0..count).map(|k| (k * span + steps / 2) / steps).collect()
}

/// Tooltip text for one sample, straight from its stored fields.
pub fn tooltip_lines(point: &DataPoint) -> [String; 3] {
    [
        format!("Time: {}", point.datetime),
        format!("Current: {}", point.current),
        format!("Anomaly: {}", if point.anomaly { "Yes" } else { "No" }),
    ]
}

/// Map a terminal column inside `plot` to the nearest sample index.
pub fn sample_at(column: u16, plot: Rect, len: usize) -> Option<usize> {
    if len == 0 || plot.width == 0 || column < plot.x || column >= plot.right() {
        return None;
    }
    if len == 1 {
        return Some(0);
    }

    let offset = (column - plot.x) as f64;
    let span = plot.width.saturating_sub(1).max(1) as f64;
    let index = (offset / span * (len - 1) as f64).round() as usize;
    Some(index.min(len - 1))
}

/// Terminal column a sample index is drawn at.
pub fn column_of(index: usize, plot: Rect, len: usize) -> u16 {
    if len <= 1 || plot.width == 0 {
        return plot.x;
    }
    let span = plot.width.saturating_sub(1) as f64;
    plot.x + (index as f64 / (len - 1) as f64 * span).round() as u16
}

/// Row of `plot` that a value in the y domain is drawn on.
///
/// Uses the same truncating grid mapping as the chart's block markers, so a
/// tick and a sample of equal value always share a row.
pub fn row_of(value: f64, plot: Rect) -> Option<u16> {
    let [bottom, top] = Y_BOUNDS;
    if plot.height == 0 || !(bottom..=top).contains(&value) {
        return None;
    }
    let offset = ((top - value) * f64::from(plot.height - 1) / (top - bottom)) as u16;
    Some(plot.y + offset)
}

/// Where the chart widget puts its graph inside `inner`.
///
/// Follows the widget's own layout: y labels (or the overhang of the first
/// x label) and the y axis line on the left, x labels and the x axis line
/// at the bottom.
pub fn plot_area(inner: Rect, model: &ChartModel) -> Rect {
    let y_label_width = model.y_label_width();
    let first_x_overhang = model
        .x_labels
        .first()
        .map_or(0, |l| l.text.chars().count().saturating_sub(1));
    let left = (y_label_width.max(first_x_overhang) as u16).min(inner.width / 3) + 1;
    let bottom = if model.x_labels.is_empty() { 0 } else { 2 };

    Rect::new(
        inner.x + left,
        inner.y,
        inner.width.saturating_sub(left),
        inner.height.saturating_sub(bottom),
    )
}

/// Render the chart panel and record its plot area on `app` for mouse hover.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme.clone();
    let series = app.series();

    let block = Block::default()
        .title(Line::from(Span::styled(format!(" {} ", CHART_TITLE), theme.title)))
        .title_bottom(Line::from(Span::styled(format!(" {} ", CHART_DESCRIPTION), theme.muted)))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);

    // y labels are three columns wide, plus the axis line
    let model = ChartModel::build(&series, inner.width.saturating_sub(4));
    let plot = plot_area(inner, &model);
    app.plot_area = plot;

    let hovered = app.hovered_index();
    let hover_point: Vec<(f64, f64)> = hovered
        .and_then(|i| model.line.get(i).copied())
        .into_iter()
        .collect();

    let axis_style = Style::default().fg(theme.axis);
    let chart = chart_widget(&model, &hover_point, &theme).block(block);
    frame.render_widget(chart, area);
    render_y_ticks(frame, &model, inner, plot, axis_style);

    if model.is_empty() {
        let waiting = Paragraph::new("Waiting for data...")
            .style(theme.muted)
            .alignment(Alignment::Center);
        let y = plot.y + plot.height / 2;
        frame.render_widget(waiting, Rect::new(plot.x, y, plot.width, 1));
        return;
    }

    if let Some(index) = hovered {
        if let Some(point) = series.get(index) {
            let column = column_of(index, plot, series.len());
            super::common::render_tooltip(frame, &theme, point, column, plot);
        }
    }
}

/// The chart widget without its panel block.
///
/// The y axis carries blank labels only to reserve its column; the tick
/// text is drawn by [`render_y_ticks`] at each tick's own row.
fn chart_widget<'a>(model: &'a ChartModel, hover: &'a [(f64, f64)], theme: &Theme) -> Chart<'a> {
    let marker = AnomalyMarker::new(theme.alert);
    let mut datasets = vec![Dataset::default()
        .name("Current")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(theme.line))
        .data(&model.line)];
    if !model.anomalies.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Anomaly")
                .marker(marker.glyph())
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(marker.fill))
                .data(&model.anomalies),
        );
    }
    if !hover.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(theme.highlight))
                .data(hover),
        );
    }

    let axis_style = Style::default().fg(theme.axis);
    let blank = " ".repeat(model.y_label_width());
    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds(model.x_bounds)
                .labels(model.x_labels.iter().map(|l| Span::raw(l.text.as_str()))),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds(model.y_bounds)
                .labels([Span::raw(blank.clone()), Span::raw(blank)]),
        )
        .legend_position(None)
}

/// Draw the y tick text left of the axis line, each on its value's row.
fn render_y_ticks(frame: &mut Frame, model: &ChartModel, inner: Rect, plot: Rect, style: Style) {
    let width = plot.x.saturating_sub(inner.x).saturating_sub(1);
    for tick in &model.y_ticks {
        if let Some(row) = row_of(tick.value, plot) {
            let area = Rect::new(inner.x, row, width, 1);
            frame.render_widget(Span::styled(tick.text.as_str(), style), area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn series(points: &[(&str, f64, bool)]) -> DisplaySeries {
        DisplaySeries::new(points.iter().map(|(t, c, a)| DataPoint::new(*t, *c, *a)).collect())
    }

    fn minutes(n: usize) -> DisplaySeries {
        DisplaySeries::new(
            (0..n)
                .map(|i| {
                    let t = format!("2024-03-01 {:02}:{:02}:00", 10 + i / 60, i % 60);
                    DataPoint::new(t, 1.0, false)
                })
                .collect(),
        )
    }

    #[test]
    fn test_fixed_y_domain_and_ticks() {
        let model = ChartModel::build(&minutes(3), 80);
        assert_eq!(model.y_bounds, [0.3, 1.7]);
        let texts: Vec<&str> = model.y_ticks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["0.3", "0.6", "0.9", "1.2", "1.5", "1.7"]);
        let values: Vec<f64> = model.y_ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, Y_TICKS.to_vec());
    }

    #[test]
    fn test_out_of_domain_values_are_plotted() {
        let model = ChartModel::build(&series(&[("t1", 2.0, false), ("t2", 0.1, true)]), 80);
        assert_eq!(model.line, vec![(0.0, 2.0), (1.0, 0.1)]);
        assert_eq!(model.anomalies, vec![(1.0, 0.1)]);
    }

    #[test]
    fn test_only_anomalies_get_markers() {
        let model = ChartModel::build(
            &series(&[
                ("t1", 1.0, false),
                ("t2", 1.5, true),
                ("t3", 0.9, false),
                ("t4", 1.6, true),
            ]),
            80,
        );
        assert_eq!(model.line.len(), 4);
        assert_eq!(model.anomalies, vec![(1.0, 1.5), (3.0, 1.6)]);
    }

    #[test]
    fn test_x_bounds_follow_series_length() {
        assert_eq!(ChartModel::build(&minutes(10), 80).x_bounds, [0.0, 9.0]);
        assert_eq!(ChartModel::build(&minutes(1), 80).x_bounds, [0.0, 1.0]);
        assert_eq!(ChartModel::build(&minutes(0), 80).x_bounds, [0.0, 1.0]);
    }

    #[test]
    fn test_labels_are_hour_minute() {
        let model = ChartModel::build(&minutes(2), 80);
        let texts: Vec<&str> = model.x_labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["10:00", "10:01"]);
    }

    #[test]
    fn test_thinned_labels_keep_ends_within_budget() {
        let series = minutes(120);
        for width in [0u16, 10, 24, 40, 80, 200] {
            let model = ChartModel::build(&series, width);
            let budget = (width as usize / (5 + 3)).max(2);
            let indices: Vec<usize> = model.x_labels.iter().map(|l| l.index).collect();
            assert!(indices.len() <= budget, "width {}", width);
            assert_eq!(indices.first(), Some(&0));
            assert_eq!(indices.last(), Some(&119));
            assert!(indices.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_flat_angle_packs_more_labels() {
        let series = minutes(120);
        let angled = ChartModel::build(&series, 80);
        let flat = ChartModel::build_with(&series, 80, AxisLabelStyle { angle: 0 });
        assert!(flat.x_labels.len() > angled.x_labels.len());
    }

    #[test]
    fn test_thin_indices() {
        assert_eq!(thin_indices(0, 5), Vec::<usize>::new());
        assert_eq!(thin_indices(1, 5), vec![0]);
        assert_eq!(thin_indices(3, 10), vec![0, 1, 2]);
        assert_eq!(thin_indices(10, 0), vec![0, 9]);
        assert_eq!(thin_indices(11, 3), vec![0, 5, 10]);
    }

    #[test]
    fn test_tooltip_reads_stored_fields() {
        let lines = tooltip_lines(&DataPoint::new("2024-03-01T10:15:00Z", 1.25, true));
        assert_eq!(
            lines,
            [
                "Time: 2024-03-01T10:15:00Z".to_string(),
                "Current: 1.25".to_string(),
                "Anomaly: Yes".to_string(),
            ]
        );

        let lines = tooltip_lines(&DataPoint::new("t", 1.0, false));
        assert_eq!(lines[1], "Current: 1");
        assert_eq!(lines[2], "Anomaly: No");
    }

    #[test]
    fn test_sample_at_maps_columns() {
        let plot = Rect::new(10, 0, 11, 5);
        assert_eq!(sample_at(10, plot, 3), Some(0));
        assert_eq!(sample_at(15, plot, 3), Some(1));
        assert_eq!(sample_at(20, plot, 3), Some(2));
        assert_eq!(sample_at(9, plot, 3), None);
        assert_eq!(sample_at(21, plot, 3), None);
        assert_eq!(sample_at(15, plot, 0), None);
        assert_eq!(sample_at(12, plot, 1), Some(0));
    }

    #[test]
    fn test_column_of_inverts_sample_at() {
        let plot = Rect::new(4, 2, 60, 10);
        for index in 0..25 {
            let column = column_of(index, plot, 25);
            assert_eq!(sample_at(column, plot, 25), Some(index));
        }
    }

    /// Draw the chart without its panel block; returns the buffer and plot area.
    fn draw_chart(model: &ChartModel, width: u16, height: u16) -> (Buffer, Rect) {
        let theme = Theme::dark();
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut plot = Rect::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                plot = plot_area(area, model);
                frame.render_widget(chart_widget(model, &[], &theme), area);
                render_y_ticks(frame, model, area, plot, Style::default().fg(theme.axis));
            })
            .unwrap();
        (terminal.backend().buffer().clone(), plot)
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_row_of_matches_block_grid() {
        let plot = Rect::new(4, 0, 30, 14);
        assert_eq!(row_of(1.7, plot), Some(0));
        assert_eq!(row_of(1.5, plot), Some(1));
        assert_eq!(row_of(1.2, plot), Some(4));
        assert_eq!(row_of(1.8, plot), None);
        assert_eq!(row_of(0.2, plot), None);
        assert_eq!(row_of(1.0, Rect::new(0, 0, 10, 0)), None);
        assert_eq!(row_of(1.7, Rect::new(0, 3, 10, 5)), Some(3));
    }

    #[test]
    fn test_tick_labels_share_rows_with_samples() {
        let theme = Theme::dark();
        let model = ChartModel::build(&series(&[("t1", 1.5, true), ("t2", 1.2, true)]), 36);

        for height in [12u16, 15, 16, 17, 24] {
            let (buffer, plot) = draw_chart(&model, 40, height);
            let label_row = |text: &str| (0..height).find(|&y| row_text(&buffer, y).starts_with(text));
            let marker_row = |x: u16| (plot.y..plot.bottom()).find(|&y| buffer[(x, y)].symbol() == "█");

            let first = marker_row(plot.x);
            let last = marker_row(plot.right() - 1);
            assert!(first.is_some(), "height {}", height);
            assert_eq!(label_row("1.5"), first, "height {}", height);
            assert_eq!(label_row("1.2"), last, "height {}", height);
            assert_eq!(label_row("1.7"), Some(plot.y), "height {}", height);

            let y = first.unwrap();
            assert_eq!(buffer[(plot.x, y)].fg, theme.alert);
        }
    }

    #[test]
    fn test_plot_area_without_x_labels_keeps_full_height() {
        let model = ChartModel::build(&minutes(0), 60);
        assert!(model.x_labels.is_empty());
        assert_eq!(plot_area(Rect::new(0, 0, 40, 16), &model), Rect::new(4, 0, 36, 16));
    }

    #[test]
    fn test_plot_area_leaves_room_for_axes() {
        let model = ChartModel::build(&minutes(5), 60);
        let plot = plot_area(Rect::new(1, 1, 60, 20), &model);
        // "10:00" overhangs by 4, y labels are 3 wide, plus the axis line.
        assert_eq!(plot, Rect::new(6, 1, 55, 18));
    }
}
