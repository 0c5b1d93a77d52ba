//! Typed session store adapter.
//!
//! Thin wrapper over the [`KeyValue`] boundary: namespaces keys as
//! `session:{id}` and (de)serializes [`SessionRecord`] as JSON. All
//! concurrency semantics come from the conditional put underneath.

use std::sync::Arc;

use coindrop_core::{SessionId, SessionRecord};

use crate::kv::{KeyValue, MemoryKv, Precondition, StoreError, Version};

/// Durable mapping from session id to [`SessionRecord`].
#[derive(Clone)]
pub struct SessionStore {
    kv: Arc<dyn KeyValue>,
}

impl SessionStore {
    /// Wrap an existing key-value backend.
    pub fn new(kv: Arc<dyn KeyValue>) -> Self {
        Self { kv }
    }

    /// Store backed by an in-process [`MemoryKv`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKv::new()))
    }

    fn key(id: &SessionId) -> String {
        format!("session:{id}")
    }

    /// Read the record for `id`, if one exists, with its version token.
    pub fn get(&self, id: &SessionId) -> Result<Option<(SessionRecord, Version)>, StoreError> {
        match self.kv.get(&Self::key(id))? {
            Some((version, raw)) => Ok(Some((serde_json::from_str(&raw)?, version))),
            None => Ok(None),
        }
    }

    /// Write the record for `id` under `precondition`.
    pub fn put(
        &self,
        id: &SessionId,
        record: &SessionRecord,
        precondition: Precondition,
    ) -> Result<Version, StoreError> {
        let raw = serde_json::to_string(record)?;
        self.kv.put(&Self::key(id), &raw, precondition)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
