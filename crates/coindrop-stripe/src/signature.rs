//! Webhook signature verification.
//!
//! Stripe signs each webhook delivery with a shared secret and sends the
//! result in the `Stripe-Signature` header as comma-separated `key=value`
//! pairs, of which `t` (timestamp) and `v1` (signature) are required:
//!
//! ```text
//! Stripe-Signature: t=1716470400,v1=5257a869e7...
//! ```
//!
//! The signed payload is `{t}.{raw_body}` — the timestamp, a literal
//! period, and the body bytes exactly as received. Verification runs on
//! those bytes *before* any JSON parsing, so canonicalization differences
//! can never produce a digest mismatch. The expected signature is the
//! lowercase-hex HMAC-SHA256 of that payload under the shared secret.
//!
//! Digest comparison is constant-time (`subtle`); only a length mismatch
//! may short-circuit.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Outcome of verifying one webhook delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// The body was signed by the holder of the shared secret.
    Valid,
    /// Verification failed; the body must not be trusted or parsed.
    Invalid(InvalidReason),
}

impl Verification {
    /// Whether the delivery verified successfully.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Why a delivery failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The header was absent, unparsable, or missing `t`/`v1`.
    MissingSignature,
    /// The provided `v1` digest does not match the expected one.
    SignatureMismatch,
}

impl InvalidReason {
    /// Stable label for log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingSignature => "missing_signature",
            Self::SignatureMismatch => "signature_mismatch",
        }
    }
}

struct SignatureHeader<'a> {
    timestamp: &'a str,
    signature: &'a str,
}

/// Parse `key=value` pairs, keeping the last `t` and `v1` seen.
///
/// Pairs without an `=` and unknown keys are ignored; only the absence of
/// `t` or `v1` makes the header unusable.
fn parse_header(header: &str) -> Option<SignatureHeader<'_>> {
    let mut timestamp = None;
    let mut signature = None;
    for pair in header.split(',') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key.trim() {
            "t" => timestamp = Some(value),
            "v1" => signature = Some(value),
            _ => {}
        }
    }
    Some(SignatureHeader {
        timestamp: timestamp?,
        signature: signature?,
    })
}

/// Lowercase-hex HMAC-SHA256 of `{timestamp}.{raw_body}` under `secret`.
///
/// Exposed so tests and header-producing callers can build valid
/// signatures.
pub fn expected_signature(secret: &str, timestamp: &str, raw_body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(raw_body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify one webhook delivery.
///
/// Total: malformed headers, wrong digests, and anything else all reduce
/// to [`Verification::Invalid`]; nothing panics and no error escapes.
pub fn verify(raw_body: &[u8], signature_header: &str, secret: &str) -> Verification {
    let Some(header) = parse_header(signature_header) else {
        return Verification::Invalid(InvalidReason::MissingSignature);
    };

    let expected = expected_signature(secret, header.timestamp, raw_body);
    if constant_time_eq(expected.as_bytes(), header.signature.as_bytes()) {
        Verification::Valid
    } else {
        Verification::Invalid(InvalidReason::SignatureMismatch)
    }
}

/// Constant-time byte comparison.
///
/// A length mismatch alone returns early — the length of a hex digest is
/// public. Equal-length inputs go through `subtle`, which examines every
/// byte regardless of where they first differ.
fn constant_time_eq(expected: &[u8], provided: &[u8]) -> bool {
    if expected.len() != provided.len() {
        return false;
    }
    expected.ct_eq(provided).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "whsec_test123secret456";

    fn header_for(body: &[u8], secret: &str, timestamp: &str) -> String {
        format!(
            "t={timestamp},v1={}",
            expected_signature(secret, timestamp, body)
        )
    }

    #[test]
    fn valid_header_verifies() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = header_for(body, SECRET, "1716470400");
        assert_eq!(verify(body, &header, SECRET), Verification::Valid);
    }

    #[test]
    fn modified_body_is_rejected() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = header_for(body, SECRET, "1716470400");
        let tampered = br#"{"type":"checkout.session.completed","x":1}"#;
        assert_eq!(
            verify(tampered, &header, SECRET),
            Verification::Invalid(InvalidReason::SignatureMismatch)
        );
    }

    #[test]
    fn altered_timestamp_is_rejected() {
        let body = br#"{"ok":true}"#;
        let signature = expected_signature(SECRET, "1716470400", body);
        let header = format!("t=1716470401,v1={signature}");
        assert_eq!(
            verify(body, &header, SECRET),
            Verification::Invalid(InvalidReason::SignatureMismatch)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let body = br#"{"ok":true}"#;
        let header = header_for(body, "whsec_other", "1716470400");
        assert_eq!(
            verify(body, &header, SECRET),
            Verification::Invalid(InvalidReason::SignatureMismatch)
        );
    }

    #[test]
    fn flipped_digest_byte_is_rejected() {
        let body = br#"{"ok":true}"#;
        let timestamp = "1716470400";
        let mut signature = expected_signature(SECRET, timestamp, body);
        // Flip the final hex character to a different valid one.
        let last = signature.pop().unwrap();
        signature.push(if last == '0' { '1' } else { '0' });
        let header = format!("t={timestamp},v1={signature}");
        assert_eq!(
            verify(body, &header, SECRET),
            Verification::Invalid(InvalidReason::SignatureMismatch)
        );
    }

    #[test]
    fn uppercase_digest_is_rejected() {
        // The scheme is lowercase hex; a case-folded digest is a
        // different byte string and must not verify.
        let body = br#"{"ok":true}"#;
        let timestamp = "1716470400";
        let signature = expected_signature(SECRET, timestamp, body).to_uppercase();
        let header = format!("t={timestamp},v1={signature}");
        assert!(!verify(body, &header, SECRET).is_valid());
    }

    #[test]
    fn missing_fields_reduce_to_missing_signature() {
        let body = b"{}";
        for header in ["", "garbage", "t=123", "v1=abcd", "t=,=v1"] {
            assert_eq!(
                verify(body, header, SECRET),
                Verification::Invalid(InvalidReason::MissingSignature),
                "header: {header:?}"
            );
        }
    }

    #[test]
    fn unknown_pairs_and_junk_segments_are_ignored() {
        let body = br#"{"ok":true}"#;
        let timestamp = "1716470400";
        let signature = expected_signature(SECRET, timestamp, body);
        let header = format!("t={timestamp},v0=legacy,junk,v1={signature}");
        assert_eq!(verify(body, &header, SECRET), Verification::Valid);
    }

    #[test]
    fn last_repeated_field_wins() {
        let body = br#"{"ok":true}"#;
        let timestamp = "1716470400";
        let signature = expected_signature(SECRET, timestamp, body);
        let header = format!("t=0,t={timestamp},v1=dead,v1={signature}");
        assert_eq!(verify(body, &header, SECRET), Verification::Valid);
    }

    #[test]
    fn binary_body_verifies() {
        let body = &[0x00, 0x01, 0x02, 0xFF, 0xFE, 0xFD];
        let header = header_for(body, SECRET, "1716470400");
        assert_eq!(verify(body, &header, SECRET), Verification::Valid);
    }

    #[test]
    fn truncated_digest_fails_on_length() {
        let body = br#"{"ok":true}"#;
        let timestamp = "1716470400";
        let mut signature = expected_signature(SECRET, timestamp, body);
        signature.truncate(10);
        let header = format!("t={timestamp},v1={signature}");
        assert!(!verify(body, &header, SECRET).is_valid());
    }

    #[test]
    fn constant_time_eq_rejects_difference_at_either_end() {
        // Equal-length inputs travel the same constant-time path whether
        // they diverge at the first byte or the last.
        assert!(!constant_time_eq(b"abcdef", b"xbcdef"));
        assert!(!constant_time_eq(b"abcdef", b"abcdex"));
        assert!(constant_time_eq(b"abcdef", b"abcdef"));
    }

    #[test]
    fn constant_time_eq_short_circuits_only_on_length() {
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(!constant_time_eq(b"", b"a"));
        assert!(constant_time_eq(b"", b""));
    }

    proptest! {
        #[test]
        fn any_signed_body_verifies(
            body in proptest::collection::vec(any::<u8>(), 0..512),
            secret in "[ -~]{1,64}",
            timestamp in "[0-9]{1,12}",
        ) {
            let header = header_for(&body, &secret, &timestamp);
            prop_assert_eq!(verify(&body, &header, &secret), Verification::Valid);
        }

        #[test]
        fn any_flipped_body_byte_fails(
            body in proptest::collection::vec(any::<u8>(), 1..512),
            index in any::<prop::sample::Index>(),
            timestamp in "[0-9]{1,12}",
        ) {
            let header = header_for(&body, SECRET, &timestamp);
            let mut tampered = body;
            let at = index.index(tampered.len());
            tampered[at] ^= 0x01;
            prop_assert_eq!(
                verify(&tampered, &header, SECRET),
                Verification::Invalid(InvalidReason::SignatureMismatch)
            );
        }
    }
}
