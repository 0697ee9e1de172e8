//! Bearer token inspection.
//!
//! Tokens are opaque to the client except for one thing: when one is a
//! JWT with an `exp` claim, a token that has already expired is not worth
//! restoring.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

/// The `exp` claim (seconds since epoch), if the token is a JWT carrying one.
pub fn expiry(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let (_header, payload, _sig) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    claims.get("exp")?.as_i64()
}

/// True only for a JWT whose `exp` is at or before `now`. Opaque tokens
/// are never considered expired.
pub fn is_expired_at(token: &str, now: i64) -> bool {
    matches!(expiry(token), Some(exp) if exp <= now)
}

pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, chrono::Utc::now().timestamp())
}
