//! Passive listeners for user interaction

use crate::config::ActivityConfig;
use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use std::rc::Rc;

/// Attach `on_interaction` to every interaction event on the window. Capture
/// phase so scrolls inside inner containers count too.
pub fn listen_for_interaction(on_interaction: impl Fn() + 'static) -> Vec<EventListener> {
    let Some(window) = web_sys::window() else {
        return Vec::new();
    };
    let on_interaction: Rc<dyn Fn()> = Rc::new(on_interaction);
    let options = EventListenerOptions {
        phase: EventListenerPhase::Capture,
        passive: true,
    };

    ActivityConfig::INTERACTION_EVENTS
        .iter()
        .map(|name| {
            let on_interaction = on_interaction.clone();
            EventListener::new_with_options(&window, *name, options, move |_| on_interaction())
        })
        .collect()
}
