//! # Gateway signatures
//!
//! The payment gateway authenticates two kinds of messages with HMAC-SHA256, keyed by a shared secret, and hex-encoded:
//!
//! * Checkout proofs submitted by the customer's browser sign the string `{gateway_order_id}|{gateway_payment_id}`.
//! * Webhooks sign the raw request body, byte for byte. The body must not be re-serialized before checking.
//!
//! Comparison is constant-time. HMAC accepts keys of any length, so keying never fails in practice. Should it ever
//! fail, signing yields an empty string and verification yields `false`, so nothing is ever accepted unsigned.
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac_for(secret: &str, message: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(message);
    Some(mac)
}

pub fn sign(secret: &str, message: &[u8]) -> String {
    mac_for(secret, message).map(|mac| hex::encode(mac.finalize().into_bytes())).unwrap_or_default()
}

pub fn payment_signature(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> String {
    sign(secret, format!("{gateway_order_id}|{gateway_payment_id}").as_bytes())
}

fn verify(secret: &str, message: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    mac_for(secret, message).is_some_and(|mac| mac.verify_slice(&expected).is_ok())
}

/// Checks the signature the customer submits after completing checkout.
pub fn verify_payment_signature(
    secret: &str,
    gateway_order_id: &str,
    gateway_payment_id: &str,
    signature: &str,
) -> bool {
    verify(secret, format!("{gateway_order_id}|{gateway_payment_id}").as_bytes(), signature)
}

/// Checks a webhook signature over the entire request body.
pub fn verify_webhook_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    verify(secret, body, signature)
}
