//! Cross-tab notifications via the window `storage` event

use gloo::events::EventListener;
use gnt_core::StorageChange;
use wasm_bindgen::JsCast;
use web_sys::StorageEvent;

/// Listen for writes other tabs make to `localStorage`. The browser never
/// delivers these to the tab that wrote, so there is no echo. Dropping the
/// listener detaches it.
pub fn listen_for_storage_changes(
    on_change: impl Fn(StorageChange) + 'static,
) -> Option<EventListener> {
    let window = web_sys::window()?;
    Some(EventListener::new(&window, "storage", move |event| {
        let Some(event) = event.dyn_ref::<StorageEvent>() else {
            return;
        };
        // `clear()` reports a null key
        let Some(key) = event.key() else {
            return;
        };
        on_change(StorageChange {
            key,
            new_value: event.new_value(),
        });
    }))
}
