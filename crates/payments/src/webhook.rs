//! Webhook signature verification and the typed event envelope.
//!
//! The processor signs each webhook body with HMAC-SHA256 and sends the
//! result in a `t=<unix>,v1=<hex>` header; the signed message is
//! `"{t}.{raw body}"`. Verification must run against the raw bytes before
//! any JSON parsing.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a signed timestamp, in seconds.
///
/// Bounds the replay window for captured webhook requests.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for signature verification failures.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// The header is missing a `t=` or `v1=` component or is malformed.
    #[error("Malformed signature header")]
    Malformed,

    /// The signed timestamp is outside the accepted tolerance window.
    #[error("Signature timestamp outside tolerance")]
    Stale,

    /// The HMAC did not match the payload.
    #[error("Signature mismatch")]
    Mismatch,
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify a webhook signature header against the raw request body.
///
/// `now_unix` is passed in rather than read from the clock so the tolerance
/// check is testable.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now_unix: i64,
) -> Result<(), SignatureError> {
    let (timestamp, signature_hex) = parse_header(header)?;

    if (now_unix - timestamp).abs() > tolerance_secs {
        return Err(SignatureError::Stale);
    }

    let expected = decode_hex(signature_hex).ok_or(SignatureError::Malformed)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    // verify_slice is constant-time.
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// Compute a `t=<unix>,v1=<hex>` header for a payload.
///
/// Used by tests and local tooling to produce valid signed requests.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let signature = encode_hex(&mac.finalize().into_bytes());
    format!("t={timestamp},v1={signature}")
}

/// Split the header into its timestamp and hex-signature parts.
fn parse_header(header: &str) -> Result<(i64, &str), SignatureError> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signature = Some(value),
            _ => {}
        }
    }

    match (timestamp, signature) {
        (Some(t), Some(s)) if !s.is_empty() => Ok((t, s)),
        _ => Err(SignatureError::Malformed),
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn decode_hex(s: &str) -> Option<Vec<u8>> {
    // The header is attacker-controlled; reject non-ASCII input before
    // byte-indexed slicing, which would panic on a char boundary.
    if !s.is_ascii() || s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// Event envelope
// ---------------------------------------------------------------------------

/// A webhook event as delivered by the payment processor.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    /// Event type string, e.g. `checkout.session.completed`.
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

/// Wrapper around the event's primary object.
#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// The checkout session object embedded in `checkout.session.*` events.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    /// `payment` for one-off fees, `subscription` for recurring packages.
    pub mode: String,
    pub customer: Option<String>,
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// The customer object embedded in `customer.*` events.
#[derive(Debug, Deserialize)]
pub struct CustomerObject {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
