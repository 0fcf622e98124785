//! Cross-tab propagation of activity
//!
//! Tabs of one origin share a key/value store and get notified when another
//! tab changes it. Notifications carry only the latest value of a key; they
//! are neither durable nor ordered, and the writing tab is never notified of
//! its own write.
//!
//! [`CrossTabSync`] filters raw notifications down to usable remote activity
//! timestamps. [`OriginBus`] is an in-process implementation of the shared
//! store plus notifications, used to run several monitors side by side.

use crate::error::CoreResult;
use crate::marker::parse_remote_marker;
use crate::store::ActivityStore;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// A change to one key, as seen by the tabs that did not make it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    /// `None` when the key was removed
    pub new_value: Option<String>,
}

/// Turns storage-change notifications into remote activity timestamps
#[derive(Debug, Clone)]
pub struct CrossTabSync {
    key: String,
}

impl CrossTabSync {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Timestamp carried by `change`, if it concerns the marker key and holds
    /// a positive number. Removals and garbage are ignored.
    pub fn accept(&self, change: &StorageChange) -> Option<i64> {
        if change.key != self.key {
            return None;
        }
        let timestamp = change.new_value.as_deref().and_then(parse_remote_marker);
        if timestamp.is_none() {
            tracing::trace!(value = ?change.new_value, "Ignoring non-activity storage change");
        }
        timestamp
    }
}

type Listener = Rc<dyn Fn(&StorageChange)>;

#[derive(Default)]
struct BusInner {
    values: HashMap<String, String>,
    listeners: Vec<(u64, u64, Listener)>,
    next_tab: u64,
    next_listener: u64,
    delivery_enabled: bool,
}

/// In-process same-origin store with change notifications
#[derive(Clone)]
pub struct OriginBus {
    inner: Rc<RefCell<BusInner>>,
}

impl Default for OriginBus {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                delivery_enabled: true,
                ..BusInner::default()
            })),
        }
    }

    /// Open a new tab on this origin
    pub fn open_tab(&self) -> TabStorage {
        let mut inner = self.inner.borrow_mut();
        let tab = inner.next_tab;
        inner.next_tab += 1;
        TabStorage {
            inner: self.inner.clone(),
            tab,
        }
    }

    /// Stop or resume delivering notifications. Writes still land.
    pub fn set_delivery_enabled(&self, enabled: bool) {
        self.inner.borrow_mut().delivery_enabled = enabled;
    }
}

/// One tab's view of an [`OriginBus`]
#[derive(Clone)]
pub struct TabStorage {
    inner: Rc<RefCell<BusInner>>,
    tab: u64,
}

impl TabStorage {
    /// Register for changes made by other tabs. Dropping the returned
    /// [`Subscription`] detaches the listener.
    pub fn subscribe(&self, listener: impl Fn(&StorageChange) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.push((id, self.tab, Rc::new(listener)));
        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    fn publish(&self, change: &StorageChange) {
        // Collect first: listeners may touch the bus again.
        let targets: Vec<Listener> = {
            let inner = self.inner.borrow();
            if !inner.delivery_enabled {
                return;
            }
            inner
                .listeners
                .iter()
                .filter(|(_, tab, _)| *tab != self.tab)
                .map(|(_, _, listener)| listener.clone())
                .collect()
        };
        for listener in targets {
            listener(change);
        }
    }
}

impl ActivityStore for TabStorage {
    fn read(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.inner.borrow().values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> CoreResult<()> {
        self.inner
            .borrow_mut()
            .values
            .insert(key.to_string(), value.to_string());
        self.publish(&StorageChange {
            key: key.to_string(),
            new_value: Some(value.to_string()),
        });
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let existed = self.inner.borrow_mut().values.remove(key).is_some();
        if existed {
            self.publish(&StorageChange {
                key: key.to_string(),
                new_value: None,
            });
        }
        Ok(())
    }
}

/// Keeps a listener attached for as long as it lives
pub struct Subscription {
    inner: Weak<RefCell<BusInner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.listeners.retain(|(id, _, _)| *id != self.id);
            }
        }
    }
}
