//! Webhook signature verification

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Verify the webhook signature from LINE.
///
/// `signature` is the value of the `x-line-signature` header: the standard
/// Base64 encoding of HMAC-SHA256 over the raw request body, keyed with the
/// channel secret. Fails closed: a missing or empty header is `false`,
/// never an error. The digest comparison runs in constant time.
pub fn verify_signature(signature: Option<&str>, secret: &str, body: &[u8]) -> bool {
    let signature = match signature {
        Some(s) if !s.is_empty() => s,
        _ => return false,
    };

    let signature_bytes = match BASE64.decode(signature) {
        Ok(b) => b,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };

    mac.update(body);
    mac.verify_slice(&signature_bytes).is_ok()
}
