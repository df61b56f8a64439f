//! Periodic refresh of the dashboard state.
//!
//! Every tick fires two independent requests, one per state cell. Each
//! request runs in its own task and writes only its own cell when it
//! resolves. Requests from earlier ticks are never cancelled or coalesced;
//! whichever response for a cell lands last is what the cell holds.
//!
//! ```text
//!   tick N ──┬──▶ fetch_data ──▶ merge ──▶ StateStore::apply_series
//!            └──▶ fetch_metrics ────────▶ StateStore::apply_metrics
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use crate::data::{merge, Applied, FlagPolicy, Metrics, StateStore};
use crate::source::{Backend, Endpoint, SourceError};

/// Default refresh cadence.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Settings for the refresh loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Time between ticks.
    pub interval: Duration,
    /// How a data response with too few flags is merged.
    pub flag_policy: FlagPolicy,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            flag_policy: FlagPolicy::default(),
        }
    }
}

/// Result of refreshing both cells for one tick.
#[derive(Debug)]
pub struct TickReport {
    pub tick: u64,
    pub series: Result<Applied, SourceError>,
    pub metrics: Result<Applied, SourceError>,
}

/// Fetches one cell's payload and writes it into the store.
#[derive(Debug, Clone)]
struct Refresher {
    backend: Arc<dyn Backend>,
    store: Arc<StateStore>,
    flag_policy: FlagPolicy,
}

impl Refresher {
    async fn refresh_series(self, tick: u64) -> Result<Applied, SourceError> {
        let result = async {
            let payload = self.backend.fetch_data().await?;
            let series = merge(payload.data_points, &payload.anomaly_flags, self.flag_policy)?;
            Ok::<_, SourceError>(self.store.apply_series(series, tick))
        }
        .await;
        log_outcome(Endpoint::Data, tick, &result);
        result
    }

    async fn refresh_metrics(self, tick: u64) -> Result<Applied, SourceError> {
        let result = async {
            let payload = self.backend.fetch_metrics().await?;
            Ok::<_, SourceError>(self.store.apply_metrics(Metrics::from(payload), tick))
        }
        .await;
        log_outcome(Endpoint::Metrics, tick, &result);
        result
    }

    /// Fire both requests for `tick` without waiting on either.
    fn spawn_tick(&self, tick: u64) {
        trace!(tick, "tick");
        tokio::spawn(self.clone().refresh_series(tick));
        tokio::spawn(self.clone().refresh_metrics(tick));
    }
}

fn log_outcome(endpoint: Endpoint, tick: u64, result: &Result<Applied, SourceError>) {
    match result {
        Ok(Applied::Updated) => debug!(%endpoint, tick, "state updated"),
        Ok(Applied::Discarded) => debug!(%endpoint, tick, "response arrived after teardown, discarded"),
        Err(error) => warn!(%endpoint, tick, %error, "refresh failed, keeping previous state"),
    }
}

/// Drives periodic refreshes of a [`StateStore`] from a [`Backend`].
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use anomaly_dash::{HttpBackend, PollSettings, Poller, StateStore};
///
/// # tokio_test::block_on(async {
/// let backend = Arc::new(HttpBackend::builder().build().unwrap());
/// let store = Arc::new(StateStore::new());
///
/// let handle = Poller::new(backend, store.clone(), PollSettings::default()).start();
/// // ... render from `store` ...
/// handle.stop();
/// # });
/// ```
#[derive(Debug)]
pub struct Poller {
    refresher: Refresher,
    interval: Duration,
    ticks: Arc<AtomicU64>,
}

impl Poller {
    pub fn new(backend: Arc<dyn Backend>, store: Arc<StateStore>, settings: PollSettings) -> Self {
        Self {
            refresher: Refresher {
                backend,
                store,
                flag_policy: settings.flag_policy,
            },
            interval: settings.interval,
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run one tick to completion, both requests concurrently.
    ///
    /// Uses the same tick numbering as the background loop.
    pub async fn refresh_once(&self) -> TickReport {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        let (series, metrics) = tokio::join!(
            self.refresher.clone().refresh_series(tick),
            self.refresher.clone().refresh_metrics(tick),
        );
        TickReport {
            tick,
            series,
            metrics,
        }
    }

    /// Start the background timer.
    ///
    /// The first tick fires one interval after start. Must be called from
    /// within a tokio runtime.
    pub fn start(self) -> PollerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let refresh = Arc::new(Notify::new());
        let refresh_rx = refresh.clone();
        let ticks = self.ticks.clone();
        let refresher = self.refresher;
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                        continue;
                    }
                    _ = timer.tick() => {}
                    _ = refresh_rx.notified() => {}
                }

                let tick = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                refresher.spawn_tick(tick);
            }

            debug!("poller stopped");
        });

        PollerHandle {
            stop_tx,
            refresh,
            ticks: self.ticks,
            task,
        }
    }
}

/// Handle for controlling a running [`Poller`].
///
/// Drop this handle to stop the timer, or call `stop()` explicitly.
/// Requests already in flight are left to finish.
#[derive(Debug)]
pub struct PollerHandle {
    stop_tx: watch::Sender<bool>,
    refresh: Arc<Notify>,
    ticks: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the timer. No tick starts after this.
    pub fn stop(self) {
        drop(self);
    }

    /// Fire a tick now, outside the regular cadence.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    /// Number of ticks fired so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}
