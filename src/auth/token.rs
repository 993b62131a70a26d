use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::User;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i64,
    /// The user's email at issuance, informational only.
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    InvalidSignature,
    Malformed(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::Expired => write!(f, "Token has expired"),
            TokenError::InvalidSignature => write!(f, "Token signature is invalid"),
            TokenError::Malformed(msg) => write!(f, "Malformed token: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(error.to_string()),
        }
    }
}

/// Issues and validates stateless HS256 identity tokens.
///
/// The signing secret is injected at construction; nothing is read from the
/// environment here.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Generates a token for `user` that expires `lifetime` from now.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.lifetime).ok_or_else(|| {
            AppError::InternalServerError("Token expiry is out of range".into())
        })?;
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies the signature and expiry of `token` and returns its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(id: i64) -> User {
        User {
            id,
            email: format!("user{}@example.com", id),
            password_hash: String::new(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_generation_and_verification() {
        let service = TokenService::new("test_secret_for_gen_verify", Duration::hours(24));
        let token = service.issue(&user(1)).unwrap();
        let claims = service.validate(&token).unwrap();

        assert_eq!(claims.sub, 1);
        assert_eq!(claims.email, "user1@example.com");
        assert_eq!(claims.exp - claims.iat, Duration::hours(24).num_seconds());
    }

    #[test]
    fn test_token_expiration() {
        let service = TokenService::new("test_secret_for_expiration", Duration::seconds(-5));
        let expired_token = service.issue(&user(2)).unwrap();

        assert_eq!(service.validate(&expired_token), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_valid_before_expiry() {
        let service = TokenService::new("test_secret_for_expiration", Duration::seconds(30));
        let token = service.issue(&user(3)).unwrap();

        assert!(service.validate(&token).is_ok());
    }

    #[test]
    fn test_invalid_token_signature() {
        let issuer = TokenService::new("the_original_secret", Duration::hours(1));
        let verifier = TokenService::new("a_completely_different_secret", Duration::hours(1));
        let token = issuer.issue(&user(4)).unwrap();

        assert_eq!(verifier.validate(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = TokenService::new("secret", Duration::hours(1));
        let token = service.issue(&user(5)).unwrap();
        let other = service.issue(&user(6)).unwrap();

        // Header and payload of one token with the signature of another.
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert_eq!(service.validate(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_issue_with_unrepresentable_expiry_fails() {
        let lifetime = Duration::try_hours(3_000_000_000).unwrap();
        let service = TokenService::new("secret", lifetime);

        assert!(matches!(
            service.issue(&user(7)),
            Err(AppError::InternalServerError(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let service = TokenService::new("secret", Duration::hours(1));
        assert!(matches!(
            service.validate("not-a-jwt"),
            Err(TokenError::Malformed(_))
        ));
    }
}
