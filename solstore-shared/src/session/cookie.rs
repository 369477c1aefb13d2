/// Signed session cookie codec
///
/// Sessions are serialized to JSON, then carried in a cookie as
/// `hex(payload).hex(mac)` where the MAC is HMAC-SHA256 over the payload
/// bytes, keyed by the server's session secret. The server stores nothing;
/// all session state lives in the (tamper-evident) cookie.
///
/// Signature verification goes through the HMAC crate's `verify_slice`,
/// which compares in constant time.

use hmac::{Hmac, Mac};
use serde::{de::DeserializeOwned, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Error type for session cookie operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Cookie value is not in `payload.mac` form or not valid hex
    #[error("Malformed session cookie")]
    Malformed,

    /// MAC verification failed (tampered or signed with a different key)
    #[error("Session cookie signature mismatch")]
    BadSignature,

    /// Session carried an expiry in the past
    #[error("Session expired")]
    Expired,

    /// Payload failed to serialize or deserialize
    #[error("Session payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Serializes and signs a session payload into a cookie value
///
/// # Errors
///
/// Returns `SessionError::Payload` if the payload cannot be serialized
pub fn seal<T: Serialize>(secret: &str, payload: &T) -> Result<String, SessionError> {
    let json = serde_json::to_vec(payload)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SessionError::BadSignature)?;
    mac.update(&json);
    let tag = mac.finalize().into_bytes();

    Ok(format!("{}.{}", hex::encode(json), hex::encode(tag)))
}

/// Verifies and deserializes a session cookie value
///
/// # Errors
///
/// - `SessionError::Malformed` if the value is not `hex.hex`
/// - `SessionError::BadSignature` if the MAC doesn't verify
/// - `SessionError::Payload` if the verified payload isn't valid JSON
pub fn open<T: DeserializeOwned>(secret: &str, value: &str) -> Result<T, SessionError> {
    let (payload_hex, tag_hex) = value.split_once('.').ok_or(SessionError::Malformed)?;

    let json = hex::decode(payload_hex).map_err(|_| SessionError::Malformed)?;
    let tag = hex::decode(tag_hex).map_err(|_| SessionError::Malformed)?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| SessionError::BadSignature)?;
    mac.update(&json);
    // Constant-time comparison
    mac.verify_slice(&tag)
        .map_err(|_| SessionError::BadSignature)?;

    Ok(serde_json::from_slice(&json)?)
}
