//! Wire schemas for the two backend endpoints.
//!
//! Responses are decoded into these types before any domain record is
//! built, so a body with the wrong shape fails here and nowhere later.

use serde::Deserialize;
use serde_json::Number;

use crate::data::Metrics;

/// Body of the data endpoint.
///
/// `data_points` and `anomaly_flags` are parallel sequences paired by
/// position.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPayload {
    pub data_points: Vec<RawPoint>,
    pub anomaly_flags: Vec<AnomalyFlag>,
}

/// A measurement as delivered, before its flag is attached.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPoint {
    /// Backend-native timestamp, kept verbatim.
    pub datetime: String,
    #[serde(rename = "Current")]
    pub current: f64,
}

impl RawPoint {
    pub fn new(datetime: impl Into<String>, current: f64) -> Self {
        Self {
            datetime: datetime.into(),
            current,
        }
    }
}

/// Raw anomaly code. Only the value one means anomalous.
///
/// Any JSON number is accepted; strings, booleans and null are not.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Number")]
pub struct AnomalyFlag(Number);

impl AnomalyFlag {
    pub fn is_anomalous(&self) -> bool {
        self.0.as_f64() == Some(1.0)
    }
}

impl From<Number> for AnomalyFlag {
    fn from(code: Number) -> Self {
        Self(code)
    }
}

impl From<i64> for AnomalyFlag {
    fn from(code: i64) -> Self {
        Self(Number::from(code))
    }
}

/// Body of the metrics endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsPayload {
    pub total_points: u64,
    pub anomalies_detected: u64,
    pub average_processing_time: f64,
    pub average_current_value: f64,
}

impl From<MetricsPayload> for Metrics {
    fn from(payload: MetricsPayload) -> Self {
        Metrics {
            total_points: payload.total_points,
            anomalies_detected: payload.anomalies_detected,
            average_processing_time: payload.average_processing_time,
            average_current_value: payload.average_current_value,
        }
    }
}
