//! Backend abstraction for fetching dashboard payloads.
//!
//! The poller talks to a [`Backend`] rather than to HTTP directly, so the
//! refresh loop can be driven by an in-memory backend in tests.

mod error;
mod http;
mod payload;

pub use error::{Endpoint, SourceError};
pub use http::{
    HttpBackend, HttpBackendBuilder, DEFAULT_BASE_URL, DEFAULT_DATA_PATH, DEFAULT_METRICS_PATH,
    DEFAULT_TIMEOUT,
};
pub use payload::{AnomalyFlag, DataPayload, MetricsPayload, RawPoint};

use std::fmt::Debug;

use async_trait::async_trait;

/// Trait for fetching the two dashboard payloads.
///
/// The two fetches are independent: one failing says nothing about the
/// other, and callers issue them concurrently.
///
/// # Example
///
/// ```no_run
/// use anomaly_dash::{Backend, HttpBackend};
///
/// # tokio_test::block_on(async {
/// let backend = HttpBackend::builder().base_url("http://localhost:5000").build()?;
/// let metrics = backend.fetch_metrics().await?;
/// println!("{} points processed", metrics.total_points);
/// # Ok::<_, anomaly_dash::SourceError>(())
/// # });
/// ```
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Fetch the measurement sequence and its parallel flag sequence.
    async fn fetch_data(&self) -> Result<DataPayload, SourceError>;

    /// Fetch the current metrics snapshot.
    async fn fetch_metrics(&self) -> Result<MetricsPayload, SourceError>;

    /// Returns a human-readable description of the backend.
    ///
    /// Used for display in the TUI header.
    fn description(&self) -> &str;
}
