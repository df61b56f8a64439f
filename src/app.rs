//! Application state and navigation logic.

use std::sync::Arc;

use ratatui::layout::Rect;

use crate::dashboard::Dashboard;
use crate::data::{DisplaySeries, Metrics, SlotStatus};
use crate::ui::chart::sample_at;
use crate::ui::Theme;

/// Which sample the tooltip points at.
///
/// The stored index is never trusted as-is: the series can shrink between
/// ticks, so every read clamps it to the current length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverCursor {
    index: Option<usize>,
}

impl HoverCursor {
    /// The hovered index, clamped to a series of `len` samples.
    pub fn get(&self, len: usize) -> Option<usize> {
        match (self.index, len) {
            (_, 0) | (None, _) => None,
            (Some(i), len) => Some(i.min(len - 1)),
        }
    }

    pub fn set(&mut self, index: usize) {
        self.index = Some(index);
    }

    pub fn hide(&mut self) {
        self.index = None;
    }

    /// Step one sample left. A hidden cursor appears on the newest sample.
    pub fn prev(&mut self, len: usize) {
        self.index = match self.get(len) {
            Some(i) => Some(i.saturating_sub(1)),
            None => len.checked_sub(1),
        };
    }

    /// Step one sample right. A hidden cursor appears on the newest sample.
    pub fn next(&mut self, len: usize) {
        self.index = match self.get(len) {
            Some(i) => Some((i + 1).min(len - 1)),
            None => len.checked_sub(1),
        };
    }

    pub fn first(&mut self, len: usize) {
        self.index = if len == 0 { None } else { Some(0) };
    }

    pub fn last(&mut self, len: usize) {
        self.index = len.checked_sub(1);
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    dashboard: Dashboard,
    hover: HoverCursor,

    /// Graph area of the chart as of the last frame, for mouse hover.
    pub plot_area: Rect,

    // UI
    pub theme: Theme,
}

impl App {
    pub fn new(dashboard: Dashboard, theme: Theme) -> Self {
        Self {
            running: true,
            show_help: false,
            dashboard,
            hover: HoverCursor::default(),
            plot_area: Rect::default(),
            theme,
        }
    }

    /// Returns a description of the backend being polled.
    pub fn source_description(&self) -> &str {
        self.dashboard.backend_description()
    }

    pub fn series(&self) -> Arc<DisplaySeries> {
        self.dashboard.store().series()
    }

    pub fn metrics(&self) -> Metrics {
        self.dashboard.store().metrics()
    }

    pub fn series_status(&self) -> Option<SlotStatus> {
        self.dashboard.store().series_status()
    }

    pub fn metrics_status(&self) -> Option<SlotStatus> {
        self.dashboard.store().metrics_status()
    }

    /// Hovered sample index, clamped to the series currently held.
    pub fn hovered_index(&self) -> Option<usize> {
        self.hover.get(self.series().len())
    }

    pub fn cursor_prev(&mut self) {
        let len = self.series().len();
        self.hover.prev(len);
    }

    pub fn cursor_next(&mut self) {
        let len = self.series().len();
        self.hover.next(len);
    }

    pub fn cursor_first(&mut self) {
        let len = self.series().len();
        self.hover.first(len);
    }

    pub fn cursor_last(&mut self) {
        let len = self.series().len();
        self.hover.last(len);
    }

    pub fn hide_tooltip(&mut self) {
        self.hover.hide();
    }

    /// Point the tooltip at whatever sample sits under the mouse.
    ///
    /// Returns false when the position is outside the plot.
    pub fn hover_at(&mut self, column: u16, row: u16) -> bool {
        let plot = self.plot_area;
        if row < plot.y || row >= plot.bottom() {
            return false;
        }
        match sample_at(column, plot, self.series().len()) {
            Some(index) => {
                self.hover.set(index);
                true
            }
            None => false,
        }
    }

    /// Fire a refresh without waiting for the next tick.
    pub fn refresh(&self) {
        self.dashboard.refresh_now();
    }

    /// Tear down and mount again with empty state.
    pub fn remount(&mut self) {
        self.dashboard.remount();
        self.hover.hide();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Stop polling; the app is done with the dashboard after this.
    pub fn shutdown(self) {
        self.dashboard.teardown();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::poller::PollSettings;
    use crate::source::{AnomalyFlag, Backend, DataPayload, MetricsPayload, RawPoint, SourceError};

    /// Serves a fixed series of `points` samples, every third one anomalous.
    #[derive(Debug)]
    pub(crate) struct SeriesBackend {
        pub points: usize,
    }

    #[async_trait]
    impl Backend for SeriesBackend {
        async fn fetch_data(&self) -> Result<DataPayload, SourceError> {
            Ok(DataPayload {
                data_points: (0..self.points)
                    .map(|i| RawPoint::new(format!("2024-03-01 10:{:02}:00", i), 1.0))
                    .collect(),
                anomaly_flags: (0..self.points)
                    .map(|i| AnomalyFlag::from(i64::from(i % 3 == 2)))
                    .collect(),
            })
        }

        async fn fetch_metrics(&self) -> Result<MetricsPayload, SourceError> {
            Ok(MetricsPayload {
                total_points: self.points as u64,
                anomalies_detected: (self.points / 3) as u64,
                average_processing_time: 0.25,
                average_current_value: 1.0,
            })
        }

        fn description(&self) -> &str {
            "http: test"
        }
    }

    /// An app whose store has been filled by one tick.
    pub(crate) async fn loaded_app(points: usize) -> App {
        let dashboard = Dashboard::mount(Arc::new(SeriesBackend { points }), PollSettings::default());
        tokio::time::sleep(Duration::from_millis(1100)).await;
        App::new(dashboard, Theme::dark())
    }

    #[test]
    fn test_cursor_hidden_until_moved() {
        let cursor = HoverCursor::default();
        assert_eq!(cursor.get(10), None);
    }

    #[test]
    fn test_cursor_appears_on_newest_sample() {
        let mut cursor = HoverCursor::default();
        cursor.prev(10);
        assert_eq!(cursor.get(10), Some(9));

        let mut cursor = HoverCursor::default();
        cursor.next(10);
        assert_eq!(cursor.get(10), Some(9));
    }

    #[test]
    fn test_cursor_steps_and_stops_at_ends() {
        let mut cursor = HoverCursor::default();
        cursor.first(3);
        cursor.prev(3);
        assert_eq!(cursor.get(3), Some(0));
        cursor.next(3);
        cursor.next(3);
        cursor.next(3);
        assert_eq!(cursor.get(3), Some(2));
    }

    #[test]
    fn test_cursor_clamps_when_series_shrinks() {
        let mut cursor = HoverCursor::default();
        cursor.set(40);
        assert_eq!(cursor.get(50), Some(40));
        assert_eq!(cursor.get(10), Some(9));
        assert_eq!(cursor.get(0), None);
        // Growing back restores the original position.
        assert_eq!(cursor.get(50), Some(40));
    }

    #[test]
    fn test_cursor_on_empty_series() {
        let mut cursor = HoverCursor::default();
        cursor.prev(0);
        cursor.last(0);
        cursor.first(0);
        assert_eq!(cursor.get(0), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_app_reads_store() {
        let app = loaded_app(6).await;
        assert_eq!(app.series().len(), 6);
        assert_eq!(app.series().anomaly_count(), 2);
        assert_eq!(app.metrics().total_points, 6);
        assert_eq!(app.series_status().unwrap().tick, 1);
        assert_eq!(app.source_description(), "http: test");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hover_at_maps_mouse_to_sample() {
        let mut app = loaded_app(5).await;
        app.plot_area = Rect::new(10, 2, 41, 10);

        assert!(app.hover_at(10, 5));
        assert_eq!(app.hovered_index(), Some(0));
        assert!(app.hover_at(50, 5));
        assert_eq!(app.hovered_index(), Some(4));

        // Outside the plot leaves the tooltip where it was.
        assert!(!app.hover_at(5, 5));
        assert!(!app.hover_at(30, 12));
        assert_eq!(app.hovered_index(), Some(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remount_clears_state_and_tooltip() {
        let mut app = loaded_app(5).await;
        app.cursor_last();
        assert_eq!(app.hovered_index(), Some(4));

        app.remount();
        assert!(app.series().is_empty());
        assert_eq!(app.hovered_index(), None);
        assert_eq!(app.metrics().total_points, 0);
    }
}
