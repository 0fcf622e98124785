use super::TestTab;
use crate::clock::ManualClock;
use crate::monitor::MonitorState;
use crate::policy::{IDLE_BUDGET_MS, LAST_ACTIVITY_KEY};
use crate::store::ActivityStore;
use crate::sync::{OriginBus, TabStorage};

const T0: i64 = 1_700_000_000_000;

fn open_tab(bus: &OriginBus, clock: &ManualClock) -> TestTab<TabStorage> {
    let mut tab = TestTab::new(clock, bus.open_tab());
    tab.listen_for_siblings();
    tab
}

#[test]
fn test_activity_in_one_tab_extends_sibling() {
    let clock = ManualClock::new(T0);
    let bus = OriginBus::new();

    // B goes idle right after mounting
    let tab_b = open_tab(&bus, &clock);
    tab_b.monitor.borrow_mut().start();

    // A is opened a second later and the user works there
    let t = clock.advance(1_000);
    let tab_a = open_tab(&bus, &clock);
    tab_a.monitor.borrow_mut().start();
    tab_a.monitor.borrow_mut().record_interaction();

    assert_eq!(tab_b.monitor.borrow().deadline(), Some(t + IDLE_BUDGET_MS));

    // B's original deadline passes without B expiring
    clock.set(T0 + IDLE_BUDGET_MS);
    assert!(!tab_b.fire_if_due());
    clock.set(t + IDLE_BUDGET_MS - 1);
    assert!(!tab_b.fire_if_due());
    assert!(!tab_b.is_logged_out());

    clock.set(t + IDLE_BUDGET_MS);
    assert!(tab_b.fire_if_due());
    assert_eq!(tab_b.monitor.borrow().state(), MonitorState::Expired);
}

#[test]
fn test_sibling_does_not_echo_remote_activity() {
    let clock = ManualClock::new(T0);
    let bus = OriginBus::new();
    let tab_a = open_tab(&bus, &clock);
    let tab_b = open_tab(&bus, &clock);
    tab_a.monitor.borrow_mut().start();
    tab_b.monitor.borrow_mut().start();

    let t = clock.advance(60_000);
    let arms_a = tab_a.timer.borrow().arms;
    tab_a.monitor.borrow_mut().record_interaction();

    // B re-armed from A's write but wrote nothing back, so A saw no change
    assert_eq!(tab_b.monitor.borrow().last_activity(), t);
    assert_eq!(tab_a.timer.borrow().arms, arms_a + 1);
    assert_eq!(
        tab_b.store.read(LAST_ACTIVITY_KEY).unwrap(),
        Some(t.to_string())
    );
}

#[test]
fn test_older_remote_activity_is_ignored() {
    let clock = ManualClock::new(T0);
    let bus = OriginBus::new();
    let tab_a = open_tab(&bus, &clock);
    let tab_b = open_tab(&bus, &clock);
    tab_a.monitor.borrow_mut().start();

    clock.advance(60_000);
    tab_b.monitor.borrow_mut().start();
    tab_b.monitor.borrow_mut().record_interaction();
    let deadline = tab_b.monitor.borrow().deadline();

    // A replays a stale timestamp
    tab_a.store.write(LAST_ACTIVITY_KEY, &T0.to_string()).unwrap();
    assert_eq!(tab_b.monitor.borrow().deadline(), deadline);

    // Garbage and removals are dropped as well
    tab_a.store.write(LAST_ACTIVITY_KEY, "later").unwrap();
    tab_a.store.write(LAST_ACTIVITY_KEY, "0").unwrap();
    tab_a.store.remove(LAST_ACTIVITY_KEY).unwrap();
    assert_eq!(tab_b.monitor.borrow().deadline(), deadline);
    assert_eq!(tab_b.monitor.borrow().state(), MonitorState::Tracking);
}

#[test]
fn test_lost_notifications_fall_back_to_local_timer() {
    let clock = ManualClock::new(T0);
    let bus = OriginBus::new();
    let tab_a = open_tab(&bus, &clock);
    let tab_b = open_tab(&bus, &clock);
    tab_a.monitor.borrow_mut().start();
    tab_b.monitor.borrow_mut().start();

    bus.set_delivery_enabled(false);
    clock.advance(20 * 60 * 1000);
    tab_a.monitor.borrow_mut().record_interaction();

    // B never hears about it and logs out on its own schedule
    clock.set(T0 + IDLE_BUDGET_MS);
    assert!(tab_b.fire_if_due());
    assert_eq!(tab_b.monitor.borrow().state(), MonitorState::Expired);
    assert!(!tab_a.fire_if_due());
}

#[test]
fn test_expiry_in_one_tab_clears_shared_marker() {
    let clock = ManualClock::new(T0);
    let bus = OriginBus::new();
    let tab_a = open_tab(&bus, &clock);
    tab_a.monitor.borrow_mut().start();

    clock.advance(IDLE_BUDGET_MS);
    assert!(tab_a.fire_if_due());

    // A tab opened afterwards starts from scratch instead of a stale marker
    let tab_c = open_tab(&bus, &clock);
    assert_eq!(tab_c.store.read(LAST_ACTIVITY_KEY).unwrap(), None);
    assert_eq!(tab_c.monitor.borrow_mut().start(), MonitorState::Tracking);
}
