//! `localStorage`-backed activity store

use gnt_core::{ActivityStore, CoreError, CoreResult};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// The origin's `localStorage`. Private browsing modes may deny access; the
/// store then reports every operation as failed and the monitor falls back to
/// its in-memory schedule.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl LocalStorageStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable, activity will not be shared between tabs");
        }
        Self { storage }
    }

    fn storage(&self) -> CoreResult<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| CoreError::storage("localStorage unavailable"))
    }
}

fn js_error(e: &JsValue) -> CoreError {
    CoreError::storage(format!("{e:?}"))
}

impl ActivityStore for LocalStorageStore {
    fn read(&self, key: &str) -> CoreResult<Option<String>> {
        self.storage()?.get_item(key).map_err(|e| js_error(&e))
    }

    fn write(&self, key: &str, value: &str) -> CoreResult<()> {
        self.storage()?.set_item(key, value).map_err(|e| js_error(&e))
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.storage()?.remove_item(key).map_err(|e| js_error(&e))
    }
}
