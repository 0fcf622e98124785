//! Browser adapters for the GNT idle-timeout monitor
//!
//! [`ActivityMonitorProvider`] wraps the authenticated shell: it mounts a
//! `gnt_core` [`ActivityMonitor`](gnt_core::ActivityMonitor) wired to
//! `localStorage`, a gloo timeout, the window `storage` event and the page's
//! interaction events, and tears all of it down on unmount.

pub mod activity;
pub mod clock;
pub mod config;
pub mod logging;
pub mod provider;

pub use activity::BrowserActivity;
pub use clock::BrowserClock;
pub use config::ActivityConfig;
pub use logging::init_browser_logging;
pub use provider::{ActivityMonitorProvider, LogoutContext, use_logout};
