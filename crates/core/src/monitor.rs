//! Client-side idle tracking for one tab
//!
//! [`ActivityMonitor`] owns the tab's single pending timeout and the
//! bookkeeping around the client-observable marker. The host (the browser
//! shell, or a test) feeds it interaction events, timer expiries and
//! cross-tab activity; the monitor decides when to persist, when to re-arm and
//! when to hand the session to the logout coordinator.
//!
//! The timer is the authoritative local schedule. Storage writes are
//! debounced and only serve to inform sibling tabs.

use crate::clock::Clock;
use crate::logout::{SessionTerminator, SignInReason};
use crate::marker::{format_marker, parse_marker};
use crate::policy::{IdlePolicy, LAST_ACTIVITY_KEY};
use crate::store::ActivityStore;
use crate::timer::IdleTimer;
use std::sync::Arc;

/// Lifecycle of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Constructed, `start` not called yet
    Inactive,
    /// A timeout is pending for the current deadline
    Tracking,
    /// The budget ran out and the session was handed to the coordinator
    Expired,
    /// Torn down by the host
    Stopped,
}

/// Per-tab idle timer controller
pub struct ActivityMonitor<S, T, L> {
    policy: IdlePolicy,
    clock: Arc<dyn Clock>,
    store: S,
    timer: T,
    terminator: L,
    state: MonitorState,
    last_activity_ms: i64,
    last_write_ms: Option<i64>,
    last_written_value: Option<i64>,
    deadline_ms: Option<i64>,
}

impl<S, T, L> ActivityMonitor<S, T, L>
where
    S: ActivityStore,
    T: IdleTimer,
    L: SessionTerminator,
{
    pub fn new(policy: IdlePolicy, clock: Arc<dyn Clock>, store: S, timer: T, terminator: L) -> Self {
        Self {
            policy,
            clock,
            store,
            timer,
            terminator,
            state: MonitorState::Inactive,
            last_activity_ms: 0,
            last_write_ms: None,
            last_written_value: None,
            deadline_ms: None,
        }
    }

    pub const fn state(&self) -> MonitorState {
        self.state
    }

    /// Time at which the tab will expire if nothing else happens
    pub const fn deadline(&self) -> Option<i64> {
        self.deadline_ms
    }

    /// Most recent activity this tab knows about, local or remote
    pub const fn last_activity(&self) -> i64 {
        self.last_activity_ms
    }

    /// Mount the monitor.
    ///
    /// A stored marker that is already stale expires the session right away.
    /// A fresh one arms the timer for the remaining budget only, so reloading
    /// the page never extends a session. Without a marker the mount itself
    /// counts as activity.
    pub fn start(&mut self) -> MonitorState {
        if self.state == MonitorState::Tracking {
            return self.state;
        }

        let now = self.clock.now_ms();
        let stored = match self.store.read(LAST_ACTIVITY_KEY) {
            Ok(raw) => raw.as_deref().and_then(parse_marker),
            Err(e) => {
                tracing::warn!("Failed to read activity marker, treating as absent: {}", e);
                None
            }
        };

        self.state = MonitorState::Tracking;

        match stored {
            Some(marker) if self.policy.is_exhausted(now.saturating_sub(marker)) => {
                tracing::info!(
                    marker,
                    idle_ms = now.saturating_sub(marker),
                    "Stored activity marker is stale on mount"
                );
                self.expire();
            }
            Some(marker) => {
                // A marker from the future would otherwise extend the budget.
                // Only this tab's own writes seed the non-decreasing value.
                self.last_activity_ms = marker.min(now);
                self.rearm(now);
            }
            None => {
                self.last_activity_ms = now;
                self.persist(now);
                self.rearm(now);
            }
        }

        self.state
    }

    /// Tear down: cancel the pending timeout and ignore further input
    pub fn stop(&mut self) {
        self.timer.cancel();
        self.deadline_ms = None;
        if self.state != MonitorState::Expired {
            self.state = MonitorState::Stopped;
        }
    }

    /// A genuine user interaction happened in this tab.
    ///
    /// Always re-arms for a full budget; persists the marker only when the
    /// last write is older than the debounce window.
    pub fn record_interaction(&mut self) {
        if !self.is_live() {
            return;
        }

        let now = self.clock.now_ms();
        let due = self
            .last_write_ms
            .is_none_or(|written| now.saturating_sub(written) > self.policy.write_debounce_ms);
        if due {
            self.persist(now);
        }

        self.last_activity_ms = self.last_activity_ms.max(now);
        self.rearm(now);
    }

    /// Another tab reported activity at `timestamp_ms`.
    ///
    /// Only strictly newer activity counts. The deadline moves to one full
    /// budget after the remote timestamp; nothing is written back to storage.
    /// Returns whether the deadline moved.
    pub fn on_remote_activity(&mut self, timestamp_ms: i64) -> bool {
        if !self.is_live() || timestamp_ms <= self.last_activity_ms {
            return false;
        }

        let now = self.clock.now_ms();
        self.last_activity_ms = timestamp_ms.min(now);
        tracing::debug!(timestamp_ms, "Activity observed in another tab");
        self.rearm(now);
        true
    }

    /// The pending timeout elapsed.
    ///
    /// Timers in background tabs can fire early or late; the deadline is
    /// re-checked against the clock and the timer re-armed for any remainder.
    pub fn on_timer_fired(&mut self) -> MonitorState {
        if !self.is_live() {
            return self.state;
        }

        let now = self.clock.now_ms();
        if self.policy.is_exhausted(now.saturating_sub(self.last_activity_ms)) {
            self.expire();
        } else {
            self.rearm(now);
        }
        self.state
    }

    fn rearm(&mut self, now: i64) {
        let deadline = self.last_activity_ms.saturating_add(self.policy.idle_budget_ms);
        let delay = deadline.saturating_sub(now).max(0);
        self.timer.cancel();
        self.timer.arm(delay);
        self.deadline_ms = Some(deadline);
        tracing::trace!(deadline, delay, "Idle timer armed");
    }

    /// Tracking and the session not ended elsewhere. A logout started outside
    /// the monitor stops it, so late input cannot recreate the cleared marker.
    fn is_live(&mut self) -> bool {
        if self.state != MonitorState::Tracking {
            return false;
        }
        if self.terminator.is_terminated() {
            tracing::debug!("Session already ended, stopping activity monitor");
            self.stop();
            return false;
        }
        true
    }

    fn persist(&mut self, now: i64) {
        let value = self.last_written_value.map_or(now, |previous| previous.max(now));
        match self.store.write(LAST_ACTIVITY_KEY, &format_marker(value)) {
            Ok(()) => {
                self.last_written_value = Some(value);
                tracing::debug!(value, "Activity marker persisted");
            }
            Err(e) => tracing::warn!("Failed to persist activity marker: {}", e),
        }
        self.last_write_ms = Some(now);
    }

    fn expire(&mut self) {
        self.timer.cancel();
        self.deadline_ms = None;
        self.state = MonitorState::Expired;
        self.terminator.terminate(SignInReason::Inactive);
    }
}
