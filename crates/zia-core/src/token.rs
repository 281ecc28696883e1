//! Bearer token freshness evaluation.
//!
//! Tokens are three dot-separated base64url segments whose middle segment
//! decodes to a JSON object with an `exp` claim in epoch seconds. Nothing here
//! verifies signatures; the server makes the trust decision when the token is
//! presented. Anything that cannot be decoded counts as expired.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// Seconds before `exp` at which a token is already reported expired.
pub const EXPIRY_MARGIN_SECS: i64 = 10;

/// URL-safe base64 that accepts payloads with or without `=` padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The only claim the evaluator reads.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Expiration instant, seconds since the Unix epoch.
    pub exp: f64,
}

/// Decode the claims of a token, or `None` if it is malformed.
#[must_use]
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return None;
    }

    let payload = URL_SAFE_LENIENT.decode(segments[1]).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&payload).ok()?;
    claims.exp.is_finite().then_some(claims)
}

/// The instant encoded in the token's `exp` claim.
#[must_use]
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let claims = decode_claims(token)?;
    // Fractional seconds are dropped; `exp` is whole seconds in practice.
    #[allow(clippy::cast_possible_truncation)]
    let secs = claims.exp.floor() as i64;
    Utc.timestamp_opt(secs, 0).single()
}

/// Returns true if the token is expired, about to expire, or unreadable.
#[must_use]
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}

/// [`is_expired`] against an explicit clock reading.
#[must_use]
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    let Some(claims) = decode_claims(token) else {
        return true;
    };

    #[allow(clippy::cast_precision_loss)]
    let deadline = claims.exp - EXPIRY_MARGIN_SECS as f64;
    #[allow(clippy::cast_precision_loss)]
    let now = now.timestamp() as f64 + f64::from(now.timestamp_subsec_millis()) / 1000.0;

    now > deadline
}
