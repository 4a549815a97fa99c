//! Signed access tokens.
//!
//! A token is an HS256 JWT whose `sid` names the `operator_sessions` row it
//! was issued for, and whose `exp` equals that row's `expires_at`. The
//! signature only proves the token was minted here; whether it still grants
//! access is decided by the session row.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocketlab_core::types::{DbId, SessionId};
use rocketlab_db::models::session::OperatorSession;
use serde::{Deserialize, Serialize};

const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret shared by signing and verification.
    pub secret: String,
    /// How long a sign-in lasts.
    pub session_ttl_hours: i64,
}

impl TokenConfig {
    /// `JWT_SECRET` is required; `SESSION_TTL_HOURS` defaults to 12.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or the TTL is not a
    /// positive integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set to a non-empty value");

        let session_ttl_hours = match std::env::var("SESSION_TTL_HOURS") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0)
                .expect("SESSION_TTL_HOURS must be a positive integer"),
            Err(_) => DEFAULT_SESSION_TTL_HOURS,
        };

        Self {
            secret,
            session_ttl_hours,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Operator id.
    pub sub: DbId,
    pub sid: SessionId,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn for_session(session: &OperatorSession) -> Self {
        Self {
            sub: session.operator_id,
            sid: session.id,
            iat: session.created_at.timestamp(),
            exp: session.expires_at.timestamp(),
        }
    }
}

pub fn sign(claims: &SessionClaims, config: &TokenConfig) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry.
pub fn verify(token: &str, config: &TokenConfig) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}
