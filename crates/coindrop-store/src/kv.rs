//! Versioned key-value boundary.
//!
//! Every stored value carries a per-key version token that increments on
//! each successful write. Writers pass the version they read back as a
//! [`Precondition`]; a concurrent writer that got there first makes the
//! put fail with [`StoreError::Conflict`] instead of clobbering.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

/// Opaque per-key version token.
///
/// Obtained from [`KeyValue::get`] or a successful [`KeyValue::put`] and
/// only meaningful when handed back as [`Precondition::Version`] for the
/// same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version(u64);

/// Condition a write must satisfy to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Unconditional write.
    Any,
    /// Write only if no value is stored under the key.
    Absent,
    /// Write only if the stored value still has this version.
    Version(Version),
}

/// Errors from the store boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A conditional write lost to a concurrent writer.
    #[error("conditional write conflict on key '{key}'")]
    Conflict {
        /// The key the write targeted.
        key: String,
    },

    /// A stored value could not be encoded or decoded.
    #[error("stored value could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),

    /// The backing store failed.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// The external-durable-map interface.
///
/// Object-safe and synchronous; implementations must not block for long
/// (the in-memory backend holds a `parking_lot` lock that is never held
/// across an `.await` point).
pub trait KeyValue: Send + Sync {
    /// Read the value and version stored under `key`.
    fn get(&self, key: &str) -> Result<Option<(Version, String)>, StoreError>;

    /// Write `value` under `key` if `precondition` holds, returning the
    /// new version. A failed precondition is [`StoreError::Conflict`].
    fn put(&self, key: &str, value: &str, precondition: Precondition)
        -> Result<Version, StoreError>;
}

/// In-process [`KeyValue`] backend.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: Arc<RwLock<HashMap<String, (u64, String)>>>,
}

impl MemoryKv {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValue for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<(Version, String)>, StoreError> {
        Ok(self
            .entries
            .read()
            .get(key)
            .map(|(version, value)| (Version(*version), value.clone())))
    }

    fn put(
        &self,
        key: &str,
        value: &str,
        precondition: Precondition,
    ) -> Result<Version, StoreError> {
        let mut entries = self.entries.write();
        let current = entries.get(key).map(|(version, _)| *version);

        let holds = match precondition {
            Precondition::Any => true,
            Precondition::Absent => current.is_none(),
            Precondition::Version(Version(expected)) => current == Some(expected),
        };
        if !holds {
            return Err(StoreError::Conflict {
                key: key.to_string(),
            });
        }

        let next = current.map_or(1, |version| version + 1);
        entries.insert(key.to_string(), (next, value.to_string()));
        Ok(Version(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_absent_key_returns_none() {
        let kv = MemoryKv::new();
        assert!(kv.get("session:missing").unwrap().is_none());
        assert!(kv.is_empty());
    }

    #[test]
    fn put_then_get_round_trips() {
        let kv = MemoryKv::new();
        let version = kv.put("k", "v1", Precondition::Any).unwrap();
        let (read_version, value) = kv.get("k").unwrap().unwrap();
        assert_eq!(read_version, version);
        assert_eq!(value, "v1");
        assert_eq!(kv.len(), 1);
    }

    #[test]
    fn version_increments_on_each_write() {
        let kv = MemoryKv::new();
        let first = kv.put("k", "v1", Precondition::Any).unwrap();
        let second = kv.put("k", "v2", Precondition::Any).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn absent_precondition_rejects_existing_key() {
        let kv = MemoryKv::new();
        kv.put("k", "v1", Precondition::Any).unwrap();
        let err = kv.put("k", "v2", Precondition::Absent).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { key } if key == "k"));
    }

    #[test]
    fn absent_precondition_accepts_fresh_key() {
        let kv = MemoryKv::new();
        kv.put("k", "v1", Precondition::Absent).unwrap();
        assert_eq!(kv.get("k").unwrap().unwrap().1, "v1");
    }

    #[test]
    fn version_precondition_accepts_unchanged_value() {
        let kv = MemoryKv::new();
        let version = kv.put("k", "v1", Precondition::Any).unwrap();
        kv.put("k", "v2", Precondition::Version(version)).unwrap();
        assert_eq!(kv.get("k").unwrap().unwrap().1, "v2");
    }

    #[test]
    fn version_precondition_rejects_stale_writer() {
        let kv = MemoryKv::new();
        let stale = kv.put("k", "v1", Precondition::Any).unwrap();
        // Another writer gets there first.
        kv.put("k", "v2", Precondition::Any).unwrap();

        let err = kv.put("k", "v3", Precondition::Version(stale)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
        assert_eq!(kv.get("k").unwrap().unwrap().1, "v2");
    }

    #[test]
    fn two_readers_one_version_only_one_writes() {
        // The interleaving behind a double redeem: both readers observe
        // the same version, both attempt a conditional write, exactly one
        // succeeds.
        let kv = MemoryKv::new();
        kv.put("k", "paid", Precondition::Any).unwrap();

        let (version_a, _) = kv.get("k").unwrap().unwrap();
        let (version_b, _) = kv.get("k").unwrap().unwrap();
        assert_eq!(version_a, version_b);

        kv.put("k", "redeemed-by-a", Precondition::Version(version_a))
            .unwrap();
        let err = kv
            .put("k", "redeemed-by-b", Precondition::Version(version_b))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
        assert_eq!(kv.get("k").unwrap().unwrap().1, "redeemed-by-a");
    }

    #[test]
    fn clones_share_the_same_map() {
        let kv = MemoryKv::new();
        let other = kv.clone();
        kv.put("k", "v", Precondition::Any).unwrap();
        assert_eq!(other.get("k").unwrap().unwrap().1, "v");
    }
}
