//! # Checkout Session Records
//!
//! The durable record kept per provider checkout session, and the state
//! machine that governs it:
//!
//! ```text
//! absent ──(paid notification)──► paid ──(redeem)──► redeemed
//! ```
//!
//! Absence of a record is itself a valid, observable state ("not yet
//! paid" / "unknown session") and is distinct from both `paid` and
//! `redeemed`. `redeemed` is terminal; records are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider-issued checkout session identifier.
///
/// Opaque to this system — the provider mints it and clients echo it
/// back. The only validation is that it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a session identifier, rejecting empty or whitespace-only
    /// input.
    pub fn new(id: impl Into<String>) -> Result<Self, SessionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SessionError::EmptySessionId);
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a checkout session record.
///
/// No record exists before `paid`, so the enum carries no "pending"
/// variant — absence covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Payment confirmed by the provider; the grant is still claimable.
    Paid,
    /// The grant was issued. Terminal.
    Redeemed,
}

impl SessionStatus {
    /// Return the wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Redeemed => "redeemed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable record for one checkout session.
///
/// `coins` is fixed when the record is created and never changes;
/// `redeemed_at` is absent until the record reaches `redeemed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Reward quantity granted on redemption. Immutable after creation.
    pub coins: u32,
    /// When the paid notification was processed.
    pub paid_at: DateTime<Utc>,
    /// When the session was redeemed, once it has been.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Create a fresh `paid` record.
    pub fn paid(coins: u32, paid_at: DateTime<Utc>) -> Self {
        Self {
            status: SessionStatus::Paid,
            coins,
            paid_at,
            redeemed_at: None,
        }
    }

    /// Consume a `paid` record and return its terminal `redeemed` form,
    /// preserving `coins` and `paid_at`.
    ///
    /// This is the only transition out of `paid`. Calling it on a record
    /// that is already `redeemed` returns [`SessionError::NotRedeemable`].
    pub fn redeemed(self, at: DateTime<Utc>) -> Result<Self, SessionError> {
        match self.status {
            SessionStatus::Paid => Ok(Self {
                status: SessionStatus::Redeemed,
                redeemed_at: Some(at),
                ..self
            }),
            SessionStatus::Redeemed => Err(SessionError::NotRedeemable {
                status: self.status,
            }),
        }
    }

    /// Whether a redemption attempt against this record can succeed.
    pub fn is_redeemable(&self) -> bool {
        self.status == SessionStatus::Paid
    }
}

/// Errors from session identifier validation and state transitions.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// A session identifier was empty or whitespace-only.
    #[error("session identifier must not be empty")]
    EmptySessionId,

    /// The record is not in a state from which it can be redeemed.
    #[error("cannot redeem a session in status '{status}'")]
    NotRedeemable {
        /// The status the record was in when redemption was attempted.
        status: SessionStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn paid_record_starts_redeemable() {
        let record = SessionRecord::paid(5, ts("2026-03-01T10:00:00Z"));
        assert_eq!(record.status, SessionStatus::Paid);
        assert_eq!(record.coins, 5);
        assert!(record.redeemed_at.is_none());
        assert!(record.is_redeemable());
    }

    #[test]
    fn redeem_preserves_coins_and_paid_at() {
        let paid_at = ts("2026-03-01T10:00:00Z");
        let redeemed_at = ts("2026-03-01T10:05:00Z");
        let record = SessionRecord::paid(7, paid_at).redeemed(redeemed_at).unwrap();
        assert_eq!(record.status, SessionStatus::Redeemed);
        assert_eq!(record.coins, 7);
        assert_eq!(record.paid_at, paid_at);
        assert_eq!(record.redeemed_at, Some(redeemed_at));
        assert!(!record.is_redeemable());
    }

    #[test]
    fn redeem_twice_is_rejected() {
        let record = SessionRecord::paid(5, ts("2026-03-01T10:00:00Z"))
            .redeemed(ts("2026-03-01T10:05:00Z"))
            .unwrap();
        let err = record.redeemed(ts("2026-03-01T10:06:00Z")).unwrap_err();
        assert_eq!(
            err,
            SessionError::NotRedeemable {
                status: SessionStatus::Redeemed
            }
        );
    }

    #[test]
    fn session_id_rejects_empty_and_whitespace() {
        assert_eq!(SessionId::new("").unwrap_err(), SessionError::EmptySessionId);
        assert_eq!(
            SessionId::new("   ").unwrap_err(),
            SessionError::EmptySessionId
        );
    }

    #[test]
    fn session_id_round_trips() {
        let id = SessionId::new("cs_123").unwrap();
        assert_eq!(id.as_str(), "cs_123");
        assert_eq!(id.to_string(), "cs_123");
    }

    #[test]
    fn paid_record_serializes_without_redeemed_at() {
        let record = SessionRecord::paid(5, ts("2026-03-01T10:00:00Z"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "paid");
        assert_eq!(json["coins"], 5);
        assert!(json.get("redeemed_at").is_none());
    }

    #[test]
    fn redeemed_record_serializes_with_redeemed_at() {
        let record = SessionRecord::paid(5, ts("2026-03-01T10:00:00Z"))
            .redeemed(ts("2026-03-01T10:05:00Z"))
            .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "redeemed");
        assert!(json.get("redeemed_at").is_some());
    }

    #[test]
    fn stored_paid_json_deserializes() {
        let stored = r#"{"status":"paid","coins":5,"paid_at":"2026-03-01T10:00:00Z"}"#;
        let record: SessionRecord = serde_json::from_str(stored).unwrap();
        assert_eq!(record.status, SessionStatus::Paid);
        assert_eq!(record.coins, 5);
        assert!(record.redeemed_at.is_none());
    }
}
