//! Frontend configuration

/// Idle-timeout wiring in the browser. Budget and debounce come from
/// `gnt_core::policy` so they always match the edge gate.
pub struct ActivityConfig;

impl ActivityConfig {
    /// Events counted as genuine user interaction
    pub const INTERACTION_EVENTS: &'static [&'static str] =
        &["pointermove", "pointerdown", "keydown", "touchstart", "scroll"];

    /// Server endpoint that expires the session cookies
    pub const SIGN_OUT_ENDPOINT: &'static str = "/api/auth/signout";
}
