//! Display model and the state it lives in.
//!
//! ## Submodules
//!
//! - [`model`]: Display records ([`DataPoint`], [`DisplaySeries`], [`Metrics`])
//! - [`merge`]: Positional pairing of measurements with anomaly flags
//! - [`store`]: The two independently updated state cells ([`StateStore`])
//! - [`format`]: Fixed-decimal, clock-time and count formatting
//!
//! ## Data Flow
//!
//! ```text
//! DataPayload (raw JSON)          MetricsPayload (raw JSON)
//!        │                                │
//!        ▼                                │
//! merge(points, flags, policy)            │
//!        │                                │
//!        ▼                                ▼
//! StateStore::apply_series()      StateStore::apply_metrics()
//! ```

pub mod format;
pub mod merge;
pub mod model;
pub mod store;

pub use merge::{merge, FlagPolicy, MergeError};
pub use model::{DataPoint, DisplaySeries, Metrics};
pub use store::{Applied, SlotStatus, StateStore};
