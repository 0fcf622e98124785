//! Idle-timeout policy shared by the edge gate and the client monitor
//!
//! Both sides must agree on the idle budget or they will disagree about when
//! a session is stale, so the value lives here and nowhere else.

use serde::{Deserialize, Serialize};

/// Maximum gap between observed activity and "now" (30 minutes).
pub const IDLE_BUDGET_MS: i64 = 30 * 60 * 1000;

/// Minimum spacing between client-side marker writes.
pub const WRITE_DEBOUNCE_MS: i64 = 15_000;

/// Name of the activity cookie and of the local storage key.
pub const LAST_ACTIVITY_KEY: &str = "gnt_last_activity";

/// Where forced sign-outs land.
pub const SIGN_IN_PATH: &str = "/login";

/// Timing parameters of the idle-timeout mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdlePolicy {
    /// Idle budget in milliseconds
    pub idle_budget_ms: i64,
    /// Debounce window for persisting client activity
    pub write_debounce_ms: i64,
}

impl IdlePolicy {
    /// Idle budget in whole seconds, as used for cookie `Max-Age`
    #[must_use]
    pub const fn idle_budget_secs(&self) -> i64 {
        self.idle_budget_ms / 1000
    }

    /// Whether `elapsed_ms` strictly exceeds the budget.
    ///
    /// The edge gate uses this form: a marker exactly one budget old is still
    /// accepted.
    #[must_use]
    pub const fn is_exceeded(&self, elapsed_ms: i64) -> bool {
        elapsed_ms > self.idle_budget_ms
    }

    /// Whether `elapsed_ms` has used up the whole budget.
    ///
    /// The client monitor uses this form when it mounts.
    #[must_use]
    pub const fn is_exhausted(&self, elapsed_ms: i64) -> bool {
        elapsed_ms >= self.idle_budget_ms
    }
}

impl Default for IdlePolicy {
    fn default() -> Self {
        Self {
            idle_budget_ms: IDLE_BUDGET_MS,
            write_debounce_ms: WRITE_DEBOUNCE_MS,
        }
    }
}
