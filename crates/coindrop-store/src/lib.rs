//! # coindrop-store — Session Persistence Boundary
//!
//! The durable key-value map the gateway writes session records to is an
//! external collaborator; this crate pins its interface and nothing more.
//!
//! - [`KeyValue`] is that boundary: `get` returns the stored value with an
//!   opaque [`Version`] token, and `put` accepts a [`Precondition`] so a
//!   writer can demand "still the version I read" or "still absent". A
//!   failed precondition is [`StoreError::Conflict`], never a silent
//!   overwrite. The underlying map needs no transactions — one
//!   compare-and-put per write is the whole contract.
//! - [`MemoryKv`] is the in-process implementation used by tests and
//!   single-node deployments.
//! - [`SessionStore`] is the typed adapter: key namespacing and JSON
//!   (de)serialization of [`coindrop_core::SessionRecord`], nothing else.

pub mod kv;
pub mod sessions;

pub use kv::{KeyValue, MemoryKv, Precondition, StoreError, Version};
pub use sessions::SessionStore;
