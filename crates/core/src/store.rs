//! Per-origin key/value storage used for the client-observable marker

use crate::error::CoreResult;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// String key/value storage with the semantics of the browser's
/// `localStorage`: shared by every tab of one origin, not protected.
pub trait ActivityStore {
    /// Read a value, `None` when the key is absent
    fn read(&self, key: &str) -> CoreResult<Option<String>>;

    /// Overwrite a value
    fn write(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Delete a value; deleting an absent key is not an error
    fn remove(&self, key: &str) -> CoreResult<()>;
}

impl<S: ActivityStore + ?Sized> ActivityStore for Rc<S> {
    fn read(&self, key: &str) -> CoreResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> CoreResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        (**self).remove(key)
    }
}

/// Single-tab in-memory store. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActivityStore for MemoryStore {
    fn read(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
