//! HS256 token issuing/verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use crate::claims::{validate_claims, AccessClaims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, expired, or badly signed. All verification failures
    /// collapse here; the boundary reports a single unauthorized outcome.
    #[error("invalid token")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Token signing capability.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, subject: Uuid) -> Result<String, TokenError>;
    fn verify(&self, token: &str) -> Result<Uuid, TokenError>;
}

/// HMAC-SHA256 issuer over a shared secret.
pub struct Hs256TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }
}

impl TokenIssuer for Hs256TokenIssuer {
    fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        let claims = AccessClaims::new(subject, Utc::now(), self.ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;

        // Library validation applies leeway; re-check deterministically.
        validate_claims(&data.claims, Utc::now()).map_err(|_| TokenError::Invalid)?;

        Ok(data.claims.sub)
    }
}
