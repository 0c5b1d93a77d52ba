#![deny(missing_docs)]

//! # coindrop-core — Domain Types for the Coindrop Gateway
//!
//! Foundational types shared by the store, provider, and API crates:
//! the checkout [`SessionRecord`] with its one-way `paid → redeemed`
//! state machine, the validated [`SessionId`] identifier, and the
//! [`Secret`] wrapper for credential material.
//!
//! This crate has no internal dependencies — only `serde`, `chrono`,
//! `thiserror`, and `zeroize` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Transitions are methods, not field pokes.** A record becomes
//!    redeemed through [`SessionRecord::redeemed`], which refuses every
//!    state except `paid`. There is no other transition.
//!
//! 2. **Identifiers validate at construction.** A [`SessionId`] cannot
//!    be empty; callers handle the rejection once, at the boundary.
//!
//! 3. **Secrets never appear in logs.** [`Secret`] redacts its `Debug`
//!    output and zeroizes on drop.

pub mod secret;
pub mod session;

pub use secret::Secret;
pub use session::{SessionError, SessionId, SessionRecord, SessionStatus};
