//! Single choke point for terminating a session on the client
//!
//! The coordinator revokes the credential through the token issuer, removes
//! the client-observable marker and navigates to the sign-in page. It is
//! idempotent: the idle timer and a manual "Logout" action may both fire, but
//! only the first call does any work.

use crate::error::CoreResult;
use crate::policy::SIGN_IN_PATH;
use crate::store::ActivityStore;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Why the user is being sent to the sign-in page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignInReason {
    /// The idle budget ran out
    Inactive,
    /// The user asked to log out
    Manual,
}

impl SignInReason {
    /// Value of the `reason` query parameter, if the reason is surfaced
    #[must_use]
    pub const fn query_value(self) -> Option<&'static str> {
        match self {
            Self::Inactive => Some("inactive"),
            Self::Manual => None,
        }
    }
}

impl fmt::Display for SignInReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => write!(f, "inactive"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Sign-in location for a forced or voluntary sign-out
#[must_use]
pub fn sign_in_location(reason: SignInReason) -> String {
    match reason.query_value() {
        Some(value) => format!("{SIGN_IN_PATH}?reason={value}"),
        None => SIGN_IN_PATH.to_string(),
    }
}

/// Revokes the session credential with the external token issuer
#[cfg_attr(test, mockall::automock)]
pub trait SignOut {
    fn sign_out(&self) -> CoreResult<()>;
}

/// Moves the page to another location
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    fn navigate(&self, location: &str) -> CoreResult<()>;
}

/// Result of a logout request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// This call performed the sign-out and navigation
    Performed,
    /// An earlier call already did; nothing happened
    AlreadyInProgress,
}

/// Anything that can end the current session
pub trait SessionTerminator {
    fn terminate(&self, reason: SignInReason) -> LogoutOutcome;

    /// Whether the session was already ended, by this caller or another
    fn is_terminated(&self) -> bool;
}

impl<T: SessionTerminator + ?Sized> SessionTerminator for Rc<T> {
    fn terminate(&self, reason: SignInReason) -> LogoutOutcome {
        (**self).terminate(reason)
    }

    fn is_terminated(&self) -> bool {
        (**self).is_terminated()
    }
}

/// Idempotent logout sequence
pub struct LogoutCoordinator<O, S, N> {
    sign_out: O,
    store: S,
    navigator: N,
    marker_key: String,
    started: AtomicBool,
}

impl<O, S, N> LogoutCoordinator<O, S, N>
where
    O: SignOut,
    S: ActivityStore,
    N: Navigator,
{
    pub fn new(sign_out: O, store: S, navigator: N, marker_key: impl Into<String>) -> Self {
        Self {
            sign_out,
            store,
            navigator,
            marker_key: marker_key.into(),
            started: AtomicBool::new(false),
        }
    }

    /// Whether a logout has already been performed
    pub fn is_logged_out(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Revoke the session, clear the marker and go to sign-in.
    ///
    /// Collaborator failures are logged and do not stop the sequence: the
    /// user always ends up on the sign-in page.
    pub fn logout(&self, reason: SignInReason) -> LogoutOutcome {
        if self.started.swap(true, Ordering::SeqCst) {
            tracing::debug!(%reason, "Logout already in progress, ignoring");
            return LogoutOutcome::AlreadyInProgress;
        }

        tracing::info!(%reason, "Signing out");

        if let Err(e) = self.sign_out.sign_out() {
            tracing::warn!("Failed to revoke session credential: {}", e);
        }

        if let Err(e) = self.store.remove(&self.marker_key) {
            tracing::warn!("Failed to clear activity marker: {}", e);
        }

        let location = sign_in_location(reason);
        if let Err(e) = self.navigator.navigate(&location) {
            tracing::error!("Failed to navigate to {}: {}", location, e);
        }

        LogoutOutcome::Performed
    }
}

impl<O, S, N> SessionTerminator for LogoutCoordinator<O, S, N>
where
    O: SignOut,
    S: ActivityStore,
    N: Navigator,
{
    fn terminate(&self, reason: SignInReason) -> LogoutOutcome {
        self.logout(reason)
    }

    fn is_terminated(&self) -> bool {
        self.is_logged_out()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::policy::LAST_ACTIVITY_KEY;
    use crate::store::MemoryStore;
    use mockall::predicate::eq;

    #[test]
    fn test_sign_in_location() {
        assert_eq!(
            sign_in_location(SignInReason::Inactive),
            "/login?reason=inactive"
        );
        assert_eq!(sign_in_location(SignInReason::Manual), "/login");
    }

    #[test]
    fn test_logout_runs_full_sequence() {
        let store = MemoryStore::new();
        store.write(LAST_ACTIVITY_KEY, "123").unwrap();

        let mut sign_out = MockSignOut::new();
        sign_out.expect_sign_out().times(1).returning(|| Ok(()));
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .with(eq("/login?reason=inactive"))
            .times(1)
            .returning(|_| Ok(()));

        let coordinator =
            LogoutCoordinator::new(sign_out, store.clone(), navigator, LAST_ACTIVITY_KEY);

        assert_eq!(
            coordinator.logout(SignInReason::Inactive),
            LogoutOutcome::Performed
        );
        assert!(coordinator.is_logged_out());
        assert_eq!(store.read(LAST_ACTIVITY_KEY).unwrap(), None);
    }

    #[test]
    fn test_logout_twice_navigates_once() {
        let mut sign_out = MockSignOut::new();
        sign_out.expect_sign_out().times(1).returning(|| Ok(()));
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().times(1).returning(|_| Ok(()));

        let coordinator =
            LogoutCoordinator::new(sign_out, MemoryStore::new(), navigator, LAST_ACTIVITY_KEY);

        assert_eq!(
            coordinator.logout(SignInReason::Inactive),
            LogoutOutcome::Performed
        );
        assert_eq!(
            coordinator.logout(SignInReason::Manual),
            LogoutOutcome::AlreadyInProgress
        );
    }

    #[test]
    fn test_sign_out_failure_still_navigates() {
        let store = MemoryStore::new();
        store.write(LAST_ACTIVITY_KEY, "123").unwrap();

        let mut sign_out = MockSignOut::new();
        sign_out
            .expect_sign_out()
            .times(1)
            .returning(|| Err(CoreError::sign_out("issuer unreachable")));
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .with(eq("/login"))
            .times(1)
            .returning(|_| Ok(()));

        let coordinator =
            LogoutCoordinator::new(sign_out, store.clone(), navigator, LAST_ACTIVITY_KEY);

        assert_eq!(
            coordinator.logout(SignInReason::Manual),
            LogoutOutcome::Performed
        );
        assert_eq!(store.read(LAST_ACTIVITY_KEY).unwrap(), None);
    }
}
