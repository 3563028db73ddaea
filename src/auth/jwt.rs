use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::config::JwtConfig;
use crate::error::AuthError;
use crate::state::AppState;

/// JWT payload used for authentication. The subject is the user's email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user email
    pub exp: usize,  // expires at (unix timestamp)
    pub iat: usize,  // issued at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            access_ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    /// Signs a token for `subject` expiring `ttl` after `now`. The clock is
    /// caller-supplied so expiry behavior can be tested without sleeping.
    pub fn sign(
        &self,
        subject: &str,
        now: OffsetDateTime,
        ttl: Duration,
    ) -> anyhow::Result<String> {
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(subject = %subject, "jwt signed");
        Ok(token)
    }

    /// Signs a token with the configured default TTL.
    pub fn sign_access(&self, subject: &str, now: OffsetDateTime) -> anyhow::Result<String> {
        self.sign(subject, now, self.access_ttl)
    }

    /// Verifies signature, issuer, audience and expiry, returning the claims.
    /// Expiry is checked against the caller-supplied `now`, not the wall clock.
    pub fn verify(&self, token: &str, now: OffsetDateTime) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        // exp presence is still required; its value is checked below.
        validation.validate_exp = false;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        if data.claims.exp as i64 <= now.unix_timestamp() {
            return Err(AuthError::Expired);
        }
        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::EmptySubject);
        }
        debug!(subject = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    fn keys_with(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            audience: audience.into(),
            access_ttl: Duration::from_secs(300),
        }
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc();
        let token = keys.sign_access("a@example.com", now).expect("sign");
        let claims = keys.verify(&token, now).expect("verify");
        assert_eq!(claims.sub, "a@example.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.exp, claims.iat + 5 * 60);
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc();
        let ttl = Duration::from_secs(60);
        let token = keys.sign("a@example.com", now, ttl).expect("sign");

        // still valid one second before the boundary
        keys.verify(&token, now + TimeDuration::seconds(59))
            .expect("not yet expired");
        // exp is "at or before now" at the boundary itself
        let err = keys
            .verify(&token, now + TimeDuration::seconds(60))
            .unwrap_err();
        assert!(matches!(err, AuthError::Expired));
        let err = keys
            .verify(&token, now + TimeDuration::seconds(61))
            .unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[tokio::test]
    async fn verify_rejects_tampered_token() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc();
        let token = keys.sign_access("a@example.com", now).expect("sign");

        // flip one character in the payload segment
        let mut bytes = token.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(keys.verify(&tampered, now).is_err());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let good = keys_with("secret-one", "iss", "aud");
        let bad = keys_with("secret-two", "iss", "aud");
        let now = OffsetDateTime::now_utc();
        let token = good.sign_access("a@example.com", now).expect("sign");
        let err = bad.verify(&token, now).unwrap_err();
        assert!(matches!(err, AuthError::BadSignature));
    }

    #[tokio::test]
    async fn verify_rejects_empty_subject() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc();
        let token = keys.sign_access("", now).expect("sign");
        let err = keys.verify(&token, now).unwrap_err();
        assert!(matches!(err, AuthError::EmptySubject));
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let good = keys_with("same-secret", "good-iss", "good-aud");
        let bad = keys_with("same-secret", "bad-iss", "bad-aud");
        let now = OffsetDateTime::now_utc();
        let token = good.sign_access("a@example.com", now).expect("sign");
        assert!(bad.verify(&token, now).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_garbage() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc();
        assert!(keys.verify("not-a-jwt", now).is_err());
        assert!(keys.verify("", now).is_err());
    }
}
