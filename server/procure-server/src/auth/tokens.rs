//! HS256 bearer tokens.
//!
//! Minting and verification are pure computation; whether the subject still
//! exists and is active is the authentication gate's business, checked
//! against the user store on every request.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Issuer baked into every token this server mints.
pub const TOKEN_ISSUER: &str = "openprocure";

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

/// Verification failures, collapsed to the three cases the gate cares
/// about. Clients only ever see the invalid vs expired wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    SignatureInvalid,
}

/// Signs and verifies access tokens with the configured server secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_hours: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_hours,
        }
    }

    /// Mint a token for `subject`, expiring `ttl_hours` from now.
    pub fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + self.ttl_hours * 3600,
            iss: TOKEN_ISSUER.to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Malformed)
    }

    /// Decode and validate, returning the subject id.
    ///
    /// Idempotent: the same valid token resolves to the same subject on
    /// every call.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|error| {
            match error.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            }
        })?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Malformed)
    }

    /// Token lifetime in seconds, for login responses.
    pub fn expires_in_seconds(&self) -> i64 {
        self.ttl_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", 12)
    }

    #[test]
    fn issued_tokens_verify_to_their_subject() {
        let tokens = service();
        let subject = Uuid::new_v4();
        let token = tokens.issue(subject).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), subject);
    }

    #[test]
    fn verification_is_idempotent() {
        let tokens = service();
        let subject = Uuid::new_v4();
        let token = tokens.issue(subject).unwrap();
        let first = tokens.verify(&token).unwrap();
        let second = tokens.verify(&token).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(service().verify("garbage"), Err(TokenError::Malformed));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = TokenService::new("other-secret", 12)
            .issue(Uuid::new_v4())
            .unwrap();
        assert_eq!(service().verify(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn expired_tokens_are_reported_as_expired() {
        // Signed with the right secret so expiry is the failure that
        // surfaces, well past the validator's default leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
            iss: TOKEN_ISSUER.to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert_eq!(service().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn foreign_issuer_is_malformed() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + 3600,
            iss: "someone-else".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert_eq!(service().verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn non_uuid_subject_is_malformed() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            iat: now,
            exp: now + 3600,
            iss: TOKEN_ISSUER.to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        assert_eq!(service().verify(&token), Err(TokenError::Malformed));
    }
}
