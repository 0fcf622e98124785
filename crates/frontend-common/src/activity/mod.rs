//! Browser wiring of the activity monitor

pub mod channel;
pub mod listeners;
pub mod logout;
pub mod storage;
pub mod timer;

pub use logout::{BeaconSignOut, LocationNavigator};
pub use storage::LocalStorageStore;
pub use timer::GlooTimer;

use crate::clock::BrowserClock;
use gloo::events::EventListener;
use gnt_core::{
    ActivityMonitor, CrossTabSync, IdlePolicy, LAST_ACTIVITY_KEY, LogoutCoordinator, MonitorState,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

pub type BrowserCoordinator = LogoutCoordinator<BeaconSignOut, LocalStorageStore, LocationNavigator>;
pub type BrowserMonitor = ActivityMonitor<LocalStorageStore, GlooTimer, Rc<BrowserCoordinator>>;

/// Build the coordinator shared by the monitor and manual logout
pub fn browser_coordinator(store: LocalStorageStore) -> BrowserCoordinator {
    LogoutCoordinator::new(
        BeaconSignOut::default(),
        store,
        LocationNavigator,
        LAST_ACTIVITY_KEY,
    )
}

/// A mounted monitor with its timer and listeners.
///
/// Dropping it stops the monitor and detaches every listener, so no stale
/// timeout can fire once the authenticated shell is gone.
pub struct BrowserActivity {
    monitor: Rc<RefCell<BrowserMonitor>>,
    _interaction: Vec<EventListener>,
    _storage: Option<EventListener>,
}

impl BrowserActivity {
    /// Create the monitor, read the stored marker and start tracking.
    /// Listeners are attached only if the stored marker was still fresh.
    pub fn mount(store: LocalStorageStore, coordinator: Rc<BrowserCoordinator>) -> Self {
        let monitor = Rc::new_cyclic(|weak: &Weak<RefCell<BrowserMonitor>>| {
            let weak = weak.clone();
            let timer = GlooTimer::new(move || {
                with_monitor(&weak, |monitor| {
                    monitor.on_timer_fired();
                });
            });
            RefCell::new(ActivityMonitor::new(
                IdlePolicy::default(),
                Arc::new(BrowserClock),
                store,
                timer,
                coordinator,
            ))
        });

        let state = monitor.borrow_mut().start();
        if state != MonitorState::Tracking {
            return Self {
                monitor,
                _interaction: Vec::new(),
                _storage: None,
            };
        }

        let weak = Rc::downgrade(&monitor);
        let interaction = listeners::listen_for_interaction(move || {
            with_monitor(&weak, BrowserMonitor::record_interaction);
        });

        let weak = Rc::downgrade(&monitor);
        let sync = CrossTabSync::new(LAST_ACTIVITY_KEY);
        let storage = channel::listen_for_storage_changes(move |change| {
            if let Some(timestamp) = sync.accept(&change) {
                with_monitor(&weak, |monitor| {
                    monitor.on_remote_activity(timestamp);
                });
            }
        });
        if storage.is_none() {
            tracing::warn!("Cross-tab activity sync unavailable");
        }

        Self {
            monitor,
            _interaction: interaction,
            _storage: storage,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.monitor.borrow().state()
    }
}

impl Drop for BrowserActivity {
    fn drop(&mut self) {
        if let Ok(mut monitor) = self.monitor.try_borrow_mut() {
            monitor.stop();
        }
    }
}

/// Run `f` against the monitor if it is still alive and not already busy
fn with_monitor(weak: &Weak<RefCell<BrowserMonitor>>, f: impl FnOnce(&mut BrowserMonitor)) {
    let Some(monitor) = weak.upgrade() else {
        return;
    };
    match monitor.try_borrow_mut() {
        Ok(mut monitor) => f(&mut monitor),
        Err(_) => tracing::trace!("Activity monitor busy, skipping event"),
    };
}
