//! Single pending `setTimeout`

use gloo::timers::callback::Timeout;
use gnt_core::IdleTimer;
use std::rc::Rc;

/// Largest delay `setTimeout` honours; longer ones fire immediately.
const MAX_TIMEOUT_MS: i64 = i32::MAX as i64;

/// Browser delay for a requested `delay_ms`
pub fn clamp_delay(delay_ms: i64) -> u32 {
    u32::try_from(delay_ms.clamp(0, MAX_TIMEOUT_MS)).unwrap_or(0)
}

/// [`IdleTimer`] over a gloo [`Timeout`]
pub struct GlooTimer {
    pending: Option<Timeout>,
    on_fire: Rc<dyn Fn()>,
}

impl GlooTimer {
    pub fn new(on_fire: impl Fn() + 'static) -> Self {
        Self {
            pending: None,
            on_fire: Rc::new(on_fire),
        }
    }
}

impl IdleTimer for GlooTimer {
    fn arm(&mut self, delay_ms: i64) {
        let on_fire = self.on_fire.clone();
        // The callback re-arms this timer; run it after the timeout closure
        // has returned.
        self.pending = Some(Timeout::new(clamp_delay(delay_ms), move || {
            wasm_bindgen_futures::spawn_local(async move { on_fire() });
        }));
    }

    fn cancel(&mut self) {
        // Dropping the handle clears the timeout
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::clamp_delay;

    #[test]
    fn test_clamp_delay() {
        assert_eq!(clamp_delay(-5), 0);
        assert_eq!(clamp_delay(0), 0);
        assert_eq!(clamp_delay(1_800_000), 1_800_000);
        assert_eq!(clamp_delay(i64::MAX), i32::MAX as u32);
    }
}
