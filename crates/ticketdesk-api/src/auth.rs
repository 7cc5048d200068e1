use std::sync::Mutex;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::Error;

/// Fixed storage key the bearer token lives under in every store.
pub const TOKEN_KEY: &str = "auth-token";

/// base64url, padding optional. Issuers disagree on whether JWT segments
/// keep their `=` suffix, so accept both.
const JWT_SEGMENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ── Token storage ────────────────────────────────────────────────────

/// Persistent home of the bearer token.
///
/// The token is populated by an external login flow. This crate only
/// reads it, and discards it when it turns out to be unusable.
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Current token, or `None` when nothing is stored.
    fn get(&self) -> Result<Option<SecretString>, Error>;

    /// Replace the stored token.
    fn set(&self, token: &SecretString) -> Result<(), Error>;

    /// Remove the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), Error>;
}

/// Process-local token store. Used by tests and one-shot invocations
/// that receive the token through a flag or environment variable.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(SecretString::from(token.into()))),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<SecretString>>, Error> {
        self.token
            .lock()
            .map_err(|_| Error::TokenStore("token lock poisoned".into()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<SecretString>, Error> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, token: &SecretString) -> Result<(), Error> {
        *self.lock()? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.lock()? = None;
        Ok(())
    }
}

// ── Token inspection ─────────────────────────────────────────────────

/// Claims read from the token payload. Only `exp` drives validation;
/// the identity claims are a fallback when no user is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

/// Check a bearer token's shape and expiry without contacting the server.
///
/// The token must have exactly three dot-separated segments and a
/// base64url JSON payload. A token whose `exp` is at or before `now` is
/// expired. A payload without `exp` never expires client-side.
pub fn inspect_token(token: &SecretString, now: DateTime<Utc>) -> Result<TokenClaims, Error> {
    let claims = decode_claims(token.expose_secret())?;

    if let Some(exp) = claims.exp {
        if exp <= now.timestamp() {
            let expired_at = DateTime::from_timestamp(exp, 0).unwrap_or(DateTime::UNIX_EPOCH);
            return Err(Error::TokenExpired { expired_at });
        }
    }

    Ok(claims)
}

/// Decode the payload segment without checking expiry.
pub fn decode_claims(raw: &str) -> Result<TokenClaims, Error> {
    let segments: Vec<&str> = raw.split('.').collect();
    let [_header, payload, _signature] = segments.as_slice() else {
        return Err(Error::MalformedToken {
            reason: format!("expected 3 segments, found {}", segments.len()),
        });
    };

    let bytes = JWT_SEGMENT
        .decode(payload)
        .map_err(|e| Error::MalformedToken {
            reason: format!("payload is not base64url: {e}"),
        })?;

    serde_json::from_slice(&bytes).map_err(|e| Error::MalformedToken {
        reason: format!("payload is not JSON: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    fn token_with(payload: &str) -> SecretString {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload);
        SecretString::from(format!("{header}.{body}.sig"))
    }

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(ts, 0).unwrap()
    }

    #[test]
    fn valid_token_returns_claims() {
        let token = token_with(r#"{"exp":2000,"username":"jdoe","role":"operator"}"#);
        let claims = inspect_token(&token, at(1000)).unwrap();
        assert_eq!(claims.exp, Some(2000));
        assert_eq!(claims.username.as_deref(), Some("jdoe"));
        assert_eq!(claims.role.as_deref(), Some("operator"));
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        for raw in ["", "abc", "a.b", "a.b.c.d"] {
            let result = inspect_token(&SecretString::from(raw.to_string()), at(0));
            assert!(
                matches!(result, Err(Error::MalformedToken { .. })),
                "{raw:?} should be malformed, got {result:?}"
            );
        }
    }

    #[test]
    fn undecodable_payload_is_malformed() {
        let token = SecretString::from("header.!!!.sig".to_string());
        assert!(matches!(
            inspect_token(&token, at(0)),
            Err(Error::MalformedToken { .. })
        ));

        let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode("not json"));
        assert!(matches!(
            inspect_token(&SecretString::from(not_json), at(0)),
            Err(Error::MalformedToken { .. })
        ));
    }

    #[test]
    fn expiry_at_or_before_now_is_expired() {
        let token = token_with(r#"{"exp":1000}"#);
        assert!(matches!(
            inspect_token(&token, at(1000)),
            Err(Error::TokenExpired { .. })
        ));
        assert!(matches!(
            inspect_token(&token, at(5000)),
            Err(Error::TokenExpired { .. })
        ));
        assert!(inspect_token(&token, at(999)).is_ok());
    }

    #[test]
    fn padded_payload_is_accepted() {
        let header = URL_SAFE_NO_PAD.encode("{}");
        let body = base64::engine::general_purpose::URL_SAFE.encode(r#"{"exp":99}"#);
        let token = SecretString::from(format!("{header}.{body}.sig"));
        assert_eq!(inspect_token(&token, at(1)).unwrap().exp, Some(99));
    }

    #[test]
    fn missing_exp_never_expires() {
        let token = token_with(r#"{"username":"jdoe"}"#);
        assert!(inspect_token(&token, at(i64::from(i32::MAX))).is_ok());
    }

    #[test]
    fn memory_store_round_trips_and_clears() {
        let store = MemoryTokenStore::new();
        assert!(store.get().unwrap().is_none());

        store.set(&SecretString::from("abc".to_string())).unwrap();
        assert_eq!(store.get().unwrap().unwrap().expose_secret(), "abc");

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }
}
