//! # anomaly-dash
//!
//! A live terminal dashboard for a sensor stream whose anomalies are
//! detected by a backend service.
//!
//! Once a second the dashboard asks the backend for the latest readings
//! with their anomaly flags and for its aggregate metrics. It draws the
//! readings as a line chart with the anomalous samples marked, next to
//! four summary cards.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │ (store)  │    │(render) │    │         │  │
//! │  └────┬────┘    └────▲─────┘    └─────────┘    └─────────┘  │
//! │       │              │                                      │
//! │       ▼              │                                      │
//! │  ┌──────────┐   ┌────┴─────┐                                │
//! │  │dashboard │──▶│  poller  │◀── source (Backend: HTTP)      │
//! │  └──────────┘   └──────────┘                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: The [`Backend`] trait, its HTTP implementation and the
//!   wire schemas of both endpoints
//! - **[`data`]**: Display records, the positional [`merge`] of readings
//!   with flags, and the [`StateStore`] the renderer reads
//! - **[`poller`]**: The timer that refreshes both state cells every tick
//! - **[`dashboard`]**: A mounted session: fresh state plus a running poller
//! - **[`ui`]**: Chart, cards, header and status bar rendering with ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! anomaly-dash --url http://localhost:5000
//! anomaly-dash --config dash.toml --flag-policy strict
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use anomaly_dash::{Dashboard, HttpBackend, PollSettings};
//!
//! # tokio_test::block_on(async {
//! let backend = HttpBackend::builder().base_url("http://localhost:5000").build()?;
//! let dashboard = Dashboard::mount(Arc::new(backend), PollSettings::default());
//!
//! tokio::time::sleep(Duration::from_secs(2)).await;
//! let metrics = dashboard.store().metrics();
//! println!("{} anomalies in {} points", metrics.anomalies_detected, metrics.total_points);
//!
//! dashboard.teardown();
//! # Ok::<_, anomaly_dash::SourceError>(())
//! # });
//! ```
//!
//! ### Merging a payload by hand
//!
//! ```
//! use anomaly_dash::{merge, FlagPolicy};
//! use anomaly_dash::source::{AnomalyFlag, RawPoint};
//!
//! let points = vec![RawPoint::new("2024-03-01 10:00:00", 1.0), RawPoint::new("2024-03-01 10:00:01", 1.6)];
//! let flags = vec![AnomalyFlag::from(0_i64), AnomalyFlag::from(1_i64)];
//!
//! let series = merge(points, &flags, FlagPolicy::Clamp).unwrap();
//! assert_eq!(series.anomaly_count(), 1);
//! ```

pub mod app;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod events;
pub mod poller;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{Overrides, Settings};
pub use dashboard::Dashboard;
pub use data::{
    merge, Applied, DataPoint, DisplaySeries, FlagPolicy, MergeError, Metrics, StateStore,
};
pub use poller::{PollSettings, Poller, PollerHandle, TickReport};
pub use source::{Backend, HttpBackend, SourceError};
