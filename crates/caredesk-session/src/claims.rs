//! Refresh-token claim decoding without signature verification.
//!
//! The gateway never holds the upstream's signing secret; it only reads
//! the expiry and session id embedded in the token payload to decide
//! whether a navigation is worth serving. Anything that cannot be
//! decoded counts as unauthenticated.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Claims carried in a refresh-token payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user id).
    #[serde(default)]
    pub sub: Option<Uuid>,
    /// Session id, stable across token rotations.
    #[serde(default)]
    pub sid: Option<Uuid>,
    /// Expiry as a Unix timestamp in seconds.
    pub exp: i64,
}

impl RefreshClaims {
    /// Expiry as a UTC timestamp, when it is representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Whether the token is expired at the given instant.
    ///
    /// An unrepresentable expiry counts as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(exp) => now >= exp,
            None => true,
        }
    }
}

/// Decode the payload section of a JWT without verifying its signature.
///
/// Returns `None` for anything that is not a three-segment token whose
/// payload is base64url JSON deserializing into [`RefreshClaims`].
pub fn decode_unverified(token: &str) -> Option<RefreshClaims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether a refresh-token value represents a live session at `now`.
///
/// Fails closed: a missing, malformed, or expired token is never live.
pub fn session_is_live(token: Option<&str>, now: DateTime<Utc>) -> bool {
    token
        .and_then(decode_unverified)
        .map(|claims| !claims.is_expired_at(now))
        .unwrap_or(false)
}
