//! Bearer token decoding.
//!
//! Tokens are issued by the backend as JWTs. The console never verifies the
//! signature (it has no key); it only reads the payload to learn when the
//! session ends and which role it carries.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use super::SessionError;

/// The only role allowed into the console.
pub const ADMIN_ROLE: &str = "Admin";

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("token must have three dot-separated segments, found {0}")]
    Malformed(usize),

    #[error("token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token payload is not valid claims JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Claims carried inside a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Expiry, in seconds since the Unix epoch.
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// JWT NumericDate: seconds, possibly fractional. Fractions are floored.
fn numeric_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Ok(secs.floor() as i64)
}

impl Claims {
    /// Expiry in milliseconds. This is the single point where token seconds
    /// meet the millisecond clock.
    pub fn expires_at_ms(&self) -> i64 {
        self.exp.saturating_mul(1000)
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }

    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.expires_at_ms() <= now_ms
    }

    /// Milliseconds left before expiry, zero if already past.
    pub fn remaining_ms(&self, now_ms: i64) -> u64 {
        self.expires_at_ms().saturating_sub(now_ms).max(0) as u64
    }

    /// Check that these claims grant a console session at `now_ms`.
    pub fn validate(&self, now_ms: i64) -> Result<(), SessionError> {
        if self.is_expired_at(now_ms) {
            return Err(SessionError::Expired { exp: self.exp });
        }
        if !self.is_admin() {
            return Err(SessionError::Forbidden {
                role: self.role.clone(),
            });
        }
        Ok(())
    }
}

/// Decode the claims from a JWT without verifying its signature.
pub fn decode(token: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::Malformed(segments.len()));
    }

    // Some issuers pad the payload; the no-pad engine rejects '='.
    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Token decoding as an injectable dependency of the session manager.
pub trait TokenDecoder: Send + Sync {
    fn decode(&self, token: &str) -> Result<Claims, DecodeError>;
}

/// Decoder for the backend's JWTs.
#[derive(Debug, Default, Clone, Copy)]
pub struct JwtDecoder;

impl TokenDecoder for JwtDecoder {
    fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        decode(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_full_claims() {
        let token = encode(r#"{"exp":1700000000,"username":"alice","role":"Admin"}"#);
        let claims = decode(&token).expect("valid token");
        assert_eq!(claims.exp, 1_700_000_000);
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert!(claims.is_admin());
    }

    #[test]
    fn test_decode_optional_claims_missing() {
        let token = encode(r#"{"exp":10}"#);
        let claims = decode(&token).expect("valid token");
        assert_eq!(claims.username, None);
        assert_eq!(claims.role, None);
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_decode_accepts_padded_payload() {
        let header = URL_SAFE_NO_PAD.encode("{}");
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":1}"#);
        let token = format!("{}.{}.sig", header, payload);
        assert_eq!(decode(&token).expect("padded payload").exp, 1);
    }

    #[test]
    fn test_decode_rejects_wrong_segment_count() {
        assert!(matches!(decode("abc"), Err(DecodeError::Malformed(1))));
        assert!(matches!(decode("a.b.c.d"), Err(DecodeError::Malformed(4))));
        assert!(matches!(decode(""), Err(DecodeError::Malformed(1))));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(decode("a.@@@.c"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_fractional_exp() {
        let token = encode(r#"{"exp":4102444800.0,"role":"Admin"}"#);
        assert_eq!(decode(&token).expect("float exp").exp, 4_102_444_800);

        let token = encode(r#"{"exp":1700000000.9}"#);
        assert_eq!(decode(&token).expect("fraction").exp, 1_700_000_000);
    }

    #[test]
    fn test_decode_rejects_string_exp() {
        let token = encode(r#"{"exp":"1700000000"}"#);
        assert!(matches!(decode(&token), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_missing_exp() {
        let token = encode(r#"{"username":"bob","role":"Admin"}"#);
        assert!(matches!(decode(&token), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_validate() {
        let claims = Claims {
            exp: 100,
            username: None,
            role: Some("Admin".to_string()),
        };
        assert!(claims.validate(99_999).is_ok());
        // Expiry is exclusive: exp == now is already expired
        assert!(matches!(
            claims.validate(100_000),
            Err(SessionError::Expired { exp: 100 })
        ));

        let driver = Claims {
            role: Some("Driver".to_string()),
            ..claims
        };
        assert!(matches!(
            driver.validate(0),
            Err(SessionError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_role_is_case_sensitive() {
        let claims = Claims {
            exp: 100,
            username: None,
            role: Some("admin".to_string()),
        };
        assert!(!claims.is_admin());
    }

    #[test]
    fn test_remaining_ms() {
        let claims = Claims {
            exp: 10,
            username: None,
            role: None,
        };
        assert_eq!(claims.remaining_ms(8_000), 2_000);
        assert_eq!(claims.remaining_ms(12_000), 0);
    }
}
