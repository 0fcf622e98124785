//! Core idle-timeout logic shared by the edge gate and the browser shell
//!
//! The edge gate (see `gnt-http`) and the client monitor enforce the same idle
//! budget from two independent markers: a cookie only the server reads and a
//! storage entry only page scripts read. This crate holds the pieces both
//! sides agree on (clock, policy, marker codec) and the platform-neutral
//! client machinery (monitor, cross-tab sync, logout coordinator).

pub mod clock;
pub mod error;
pub mod logout;
pub mod marker;
pub mod monitor;
pub mod policy;
pub mod store;
pub mod sync;
pub mod timer;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use logout::{
    LogoutCoordinator, LogoutOutcome, Navigator, SessionTerminator, SignInReason, SignOut,
    sign_in_location,
};
pub use monitor::{ActivityMonitor, MonitorState};
pub use policy::{IDLE_BUDGET_MS, IdlePolicy, LAST_ACTIVITY_KEY, SIGN_IN_PATH, WRITE_DEBOUNCE_MS};
pub use store::{ActivityStore, MemoryStore};
pub use sync::{CrossTabSync, OriginBus, StorageChange, Subscription, TabStorage};
pub use timer::IdleTimer;
