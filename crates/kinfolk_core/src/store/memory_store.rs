//! In-process key-value slot.
//!
//! Keeps the encoded blob rather than the values, so the same codec runs as
//! with durable backends. Writes can be switched off to simulate an
//! unwritable store.

use super::{decode_members, encode_members, Store, StoreError, StoreResult};
use crate::model::member::Member;
use std::cell::{Cell, RefCell};

#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
    save_count: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with a raw blob, as if written by an earlier session.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let store = Self::default();
        store.blob.replace(Some(blob.into()));
        store
    }

    /// Makes subsequent saves fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Raw blob currently held.
    pub fn blob(&self) -> Option<String> {
        self.blob.borrow().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> StoreResult<Vec<Member>> {
        match self.blob.borrow().as_deref() {
            Some(blob) => decode_members(blob),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, members: &[Member]) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable(
                "memory store is read-only".to_string(),
            ));
        }
        let blob = encode_members(members)?;
        self.blob.replace(Some(blob));
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
