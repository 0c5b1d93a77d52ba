//! Secret material wrapper.
//!
//! Wraps the webhook shared secret and provider API key so they cannot
//! leak through `Debug` formatting and are wiped from memory on drop.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// An owned secret string with a redacted `Debug` representation.
///
/// The inner value is only reachable through [`Secret::expose`], keeping
/// accidental uses (logging, error messages) greppable.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the secret for use as key material or a credential header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
