//! Display records built from backend payloads.
//!
//! These are the types the renderer reads. They are produced once per
//! successful response and replaced wholesale, never patched in place.

/// One sample at one instant, with its anomaly verdict attached.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    /// Timestamp exactly as the backend delivered it.
    pub datetime: String,
    /// Measured current.
    pub current: f64,
    /// Whether the paired flag marked this sample anomalous.
    pub anomaly: bool,
}

impl DataPoint {
    pub fn new(datetime: impl Into<String>, current: f64, anomaly: bool) -> Self {
        Self {
            datetime: datetime.into(),
            current,
            anomaly,
        }
    }
}

/// Ordered samples currently shown on the chart.
///
/// Order is the delivery order of the backend and is treated as
/// chronological. Nothing in this crate re-sorts it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplaySeries {
    points: Vec<DataPoint>,
}

impl DisplaySeries {
    pub fn new(points: Vec<DataPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DataPoint> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataPoint> {
        self.points.iter()
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    /// Number of samples flagged anomalous in this series.
    pub fn anomaly_count(&self) -> usize {
        self.points.iter().filter(|p| p.anomaly).count()
    }

    /// Smallest and largest `Current` in the series, if any.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.current).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Aggregate counters reported by the backend.
///
/// A point-in-time snapshot; the dashboard never derives these itself.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub total_points: u64,
    pub anomalies_detected: u64,
    /// Milliseconds per processed point.
    pub average_processing_time: f64,
    pub average_current_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty_and_zeroed() {
        let series = DisplaySeries::default();
        assert!(series.is_empty());
        assert_eq!(series.value_range(), None);

        let metrics = Metrics::default();
        assert_eq!(metrics.total_points, 0);
        assert_eq!(metrics.anomalies_detected, 0);
        assert_eq!(metrics.average_processing_time, 0.0);
        assert_eq!(metrics.average_current_value, 0.0);
    }

    #[test]
    fn test_series_helpers() {
        let series = DisplaySeries::new(vec![
            DataPoint::new("t1", 1.2, false),
            DataPoint::new("t2", 0.4, true),
            DataPoint::new("t3", 2.0, true),
        ]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.anomaly_count(), 2);
        assert_eq!(series.value_range(), Some((0.4, 2.0)));
        assert_eq!(series.get(1).map(|p| p.datetime.as_str()), Some("t2"));
        assert!(series.get(3).is_none());
    }
}
