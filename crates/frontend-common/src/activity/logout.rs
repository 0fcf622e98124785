//! Browser collaborators of the logout coordinator

use crate::config::ActivityConfig;
use gnt_core::{CoreError, CoreResult, Navigator, SignOut};

/// Revokes the session through the server sign-out endpoint.
///
/// Uses `navigator.sendBeacon` so the request survives the navigation to the
/// sign-in page that immediately follows.
#[derive(Debug, Clone)]
pub struct BeaconSignOut {
    endpoint: String,
}

impl BeaconSignOut {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for BeaconSignOut {
    fn default() -> Self {
        Self::new(ActivityConfig::SIGN_OUT_ENDPOINT)
    }
}

impl SignOut for BeaconSignOut {
    fn sign_out(&self) -> CoreResult<()> {
        let window = web_sys::window().ok_or_else(|| CoreError::sign_out("no window"))?;
        let queued = window
            .navigator()
            .send_beacon(&self.endpoint)
            .map_err(|e| CoreError::sign_out(format!("{e:?}")))?;
        if queued {
            Ok(())
        } else {
            Err(CoreError::sign_out("beacon was not queued"))
        }
    }
}

/// Full-page navigation via `window.location`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    fn navigate(&self, location: &str) -> CoreResult<()> {
        web_sys::window()
            .ok_or_else(|| CoreError::navigation("no window"))?
            .location()
            .set_href(location)
            .map_err(|e| CoreError::navigation(format!("{e:?}")))
    }
}
