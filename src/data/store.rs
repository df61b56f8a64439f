//! Last-known dashboard state, held in two independent cells.
//!
//! The series and the metrics are written by separate request completions
//! and are never updated together. A reader may see a series from one
//! tick next to metrics from another.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use super::model::{DisplaySeries, Metrics};

/// Outcome of writing into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Updated,
    /// The store was torn down; the value was dropped.
    Discarded,
}

/// When a cell was last written, and by which tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStatus {
    pub updated_at: Instant,
    pub tick: u64,
}

#[derive(Debug, Default)]
struct Slot<T> {
    value: T,
    status: Option<SlotStatus>,
}

impl<T> Slot<T> {
    fn replace(&mut self, value: T, tick: u64) {
        self.value = value;
        self.status = Some(SlotStatus {
            updated_at: Instant::now(),
            tick,
        });
    }
}

/// Thread-safe holder for the displayed series and metrics.
#[derive(Debug, Default)]
pub struct StateStore {
    series: RwLock<Slot<Arc<DisplaySeries>>>,
    metrics: RwLock<Slot<Metrics>>,
    closed: AtomicBool,
}

impl StateStore {
    /// Create an empty store: no samples, zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the series wholesale.
    pub fn apply_series(&self, series: DisplaySeries, tick: u64) -> Applied {
        let mut slot = self.series.write();
        if self.closed.load(Ordering::Acquire) {
            return Applied::Discarded;
        }
        slot.replace(Arc::new(series), tick);
        Applied::Updated
    }

    /// Replace the metrics snapshot wholesale.
    pub fn apply_metrics(&self, metrics: Metrics, tick: u64) -> Applied {
        let mut slot = self.metrics.write();
        if self.closed.load(Ordering::Acquire) {
            return Applied::Discarded;
        }
        slot.replace(metrics, tick);
        Applied::Updated
    }

    /// Current series. Cheap: shares the stored allocation.
    pub fn series(&self) -> Arc<DisplaySeries> {
        self.series.read().value.clone()
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.read().value
    }

    pub fn series_status(&self) -> Option<SlotStatus> {
        self.series.read().status
    }

    pub fn metrics_status(&self) -> Option<SlotStatus> {
        self.metrics.read().status
    }

    /// Mark the store torn down. Every later write is discarded.
    ///
    /// Both cell locks are held while the flag flips, so a write that
    /// already holds its lock completes before this returns.
    pub fn close(&self) {
        let _series = self.series.write();
        let _metrics = self.metrics.write();
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
