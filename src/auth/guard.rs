//! Gate for screens that require a live session.
//!
//! The check is purely local: the auth context must hold a token and the
//! token's embedded expiry must be in the future. A token that cannot be
//! decoded counts as expired, forcing a fresh login instead of letting an
//! unreadable credential through.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::AuthContext;

#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
}

/// Extract the expiry timestamp from a JWT access token
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp, 0)
}

pub fn is_token_expired(token: &str) -> bool {
    match token_expiry(token) {
        Some(expiry) => Utc::now() > expiry,
        None => true,
    }
}

/// True when the guarded screens may render. Callers redirect to the login
/// screen (replacing the current screen, not stacking it) on a false result.
pub fn permits(ctx: &AuthContext) -> bool {
    match ctx.token() {
        Some(token) => !is_token_expired(&token),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// Build an unsigned JWT with the given expiry
    fn token_expiring_at(expiry: DateTime<Utc>) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{}}}"#, expiry.timestamp()));
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_future_expiry_is_not_expired() {
        let token = token_expiring_at(Utc::now() + Duration::hours(1));
        assert!(!is_token_expired(&token));
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let token = token_expiring_at(Utc::now() - Duration::hours(1));
        assert!(is_token_expired(&token));
    }

    #[test]
    fn test_malformed_token_counts_as_expired() {
        assert!(is_token_expired("not-a-jwt"));
        assert!(is_token_expired(""));
        assert!(is_token_expired("a.b.c"));

        // a valid payload without an exp claim is also rejected
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"1"}"#);
        assert!(is_token_expired(&format!("h.{}.s", payload)));
    }

    #[test]
    fn test_expiry_extraction() {
        let expiry = Utc::now() + Duration::minutes(30);
        let token = token_expiring_at(expiry);
        let parsed = token_expiry(&token).unwrap();
        assert_eq!(parsed.timestamp(), expiry.timestamp());
    }
}
