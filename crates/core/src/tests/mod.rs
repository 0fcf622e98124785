//! Test doubles for driving monitors deterministically

use crate::clock::{Clock, ManualClock};
use crate::error::CoreResult;
use crate::logout::{LogoutCoordinator, Navigator, SignOut};
use crate::monitor::ActivityMonitor;
use crate::policy::{IdlePolicy, LAST_ACTIVITY_KEY};
use crate::store::ActivityStore;
use crate::sync::{CrossTabSync, Subscription, TabStorage};
use crate::timer::IdleTimer;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

mod cross_tab;

/// What a [`RecordingTimer`] has been asked to do
#[derive(Debug, Default)]
pub struct TimerLog {
    /// Absolute time the pending timeout would fire at
    pub fires_at: Option<i64>,
    pub arms: usize,
    pub cancels: usize,
}

/// Timer that only records; tests decide when it "fires"
pub struct RecordingTimer {
    clock: ManualClock,
    log: Rc<RefCell<TimerLog>>,
}

impl RecordingTimer {
    pub fn new(clock: ManualClock) -> (Self, Rc<RefCell<TimerLog>>) {
        let log = Rc::new(RefCell::new(TimerLog::default()));
        (
            Self {
                clock,
                log: log.clone(),
            },
            log,
        )
    }
}

impl IdleTimer for RecordingTimer {
    fn arm(&mut self, delay_ms: i64) {
        let mut log = self.log.borrow_mut();
        log.fires_at = Some(self.clock.now_ms() + delay_ms);
        log.arms += 1;
    }

    fn cancel(&mut self) {
        let mut log = self.log.borrow_mut();
        if log.fires_at.take().is_some() {
            log.cancels += 1;
        }
    }
}

/// Counts sign-out calls
#[derive(Clone, Default)]
pub struct RecordingSignOut {
    pub calls: Rc<Cell<usize>>,
}

impl SignOut for RecordingSignOut {
    fn sign_out(&self) -> CoreResult<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }
}

/// Records every navigation
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    pub visits: Rc<RefCell<Vec<String>>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, location: &str) -> CoreResult<()> {
        self.visits.borrow_mut().push(location.to_string());
        Ok(())
    }
}

pub type TestCoordinator<S> = LogoutCoordinator<RecordingSignOut, S, RecordingNavigator>;
pub type TestMonitor<S> = ActivityMonitor<S, RecordingTimer, Rc<TestCoordinator<S>>>;

/// One simulated tab: a monitor plus handles on everything it touched
pub struct TestTab<S: ActivityStore + Clone> {
    pub monitor: Rc<RefCell<TestMonitor<S>>>,
    pub coordinator: Rc<TestCoordinator<S>>,
    pub timer: Rc<RefCell<TimerLog>>,
    pub sign_outs: Rc<Cell<usize>>,
    pub navigations: Rc<RefCell<Vec<String>>>,
    pub store: S,
    clock: ManualClock,
    _subscription: Option<Subscription>,
}

impl<S: ActivityStore + Clone + 'static> TestTab<S> {
    pub fn new(clock: &ManualClock, store: S) -> Self {
        let sign_out = RecordingSignOut::default();
        let navigator = RecordingNavigator::default();
        let sign_outs = sign_out.calls.clone();
        let navigations = navigator.visits.clone();
        let coordinator = Rc::new(LogoutCoordinator::new(
            sign_out,
            store.clone(),
            navigator,
            LAST_ACTIVITY_KEY,
        ));
        let (timer, timer_log) = RecordingTimer::new(clock.clone());
        let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
        let monitor = ActivityMonitor::new(
            IdlePolicy::default(),
            shared_clock,
            store.clone(),
            timer,
            coordinator.clone(),
        );

        Self {
            monitor: Rc::new(RefCell::new(monitor)),
            coordinator,
            timer: timer_log,
            sign_outs,
            navigations,
            store,
            clock: clock.clone(),
            _subscription: None,
        }
    }

    /// Deliver the timeout if the clock has reached it. Returns whether it fired.
    pub fn fire_if_due(&self) -> bool {
        let due = self
            .timer
            .borrow()
            .fires_at
            .is_some_and(|at| at <= self.clock.now_ms());
        if due {
            self.timer.borrow_mut().fires_at = None;
            self.monitor.borrow_mut().on_timer_fired();
        }
        due
    }

    pub fn is_logged_out(&self) -> bool {
        !self.navigations.borrow().is_empty()
    }
}

impl TestTab<TabStorage> {
    /// Wire this tab's monitor to storage changes made by sibling tabs
    pub fn listen_for_siblings(&mut self) {
        let sync = CrossTabSync::new(LAST_ACTIVITY_KEY);
        let monitor = Rc::downgrade(&self.monitor);
        self._subscription = Some(self.store.subscribe(move |change| {
            if let (Some(timestamp), Some(monitor)) = (sync.accept(change), monitor.upgrade()) {
                monitor.borrow_mut().on_remote_activity(timestamp);
            }
        }));
    }
}
