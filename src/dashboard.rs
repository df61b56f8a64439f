//! A mounted dashboard: fresh state plus the poller feeding it.
//!
//! Mounting creates an empty [`StateStore`] and starts a [`Poller`] on it.
//! Teardown stops the poller first and then closes the store, so responses
//! still in flight resolve into a closed store and are dropped.

use std::sync::Arc;

use tracing::info;

use crate::data::StateStore;
use crate::poller::{PollSettings, Poller, PollerHandle};
use crate::source::Backend;

/// Dashboard session bound to one backend.
///
/// Tearing down happens on [`Dashboard::teardown`] or on drop, whichever
/// comes first.
#[derive(Debug)]
pub struct Dashboard {
    backend: Arc<dyn Backend>,
    settings: PollSettings,
    store: Arc<StateStore>,
    poller: Option<PollerHandle>,
}

impl Dashboard {
    /// Mount a dashboard and start polling. Must be called within a tokio
    /// runtime.
    pub fn mount(backend: Arc<dyn Backend>, settings: PollSettings) -> Self {
        let (store, poller) = start(&backend, settings);
        Self {
            backend,
            settings,
            store,
            poller: Some(poller),
        }
    }

    /// Tear down and mount again on the same backend, starting from empty state.
    pub fn remount(&mut self) {
        self.shutdown();
        let (store, poller) = start(&self.backend, self.settings);
        self.store = store;
        self.poller = Some(poller);
    }

    /// State the renderer reads from.
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Returns a description of the backend being polled.
    pub fn backend_description(&self) -> &str {
        self.backend.description()
    }

    /// Fire an extra tick right away.
    pub fn refresh_now(&self) {
        if let Some(ref poller) = self.poller {
            poller.refresh_now();
        }
    }

    /// Ticks fired since mount.
    pub fn ticks(&self) -> u64 {
        self.poller.as_ref().map_or(0, PollerHandle::ticks)
    }

    pub fn is_active(&self) -> bool {
        self.poller.is_some()
    }

    /// Stop polling and close the store.
    pub fn teardown(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
            self.store.close();
            info!(backend = self.backend.description(), "dashboard torn down");
        }
    }
}

fn start(backend: &Arc<dyn Backend>, settings: PollSettings) -> (Arc<StateStore>, PollerHandle) {
    let store = Arc::new(StateStore::new());
    let poller = Poller::new(backend.clone(), store.clone(), settings).start();
    info!(
        backend = backend.description(),
        interval_ms = settings.interval.as_millis() as u64,
        flag_policy = %settings.flag_policy,
        "dashboard mounted"
    );
    (store, poller)
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.shutdown();
    }
}
