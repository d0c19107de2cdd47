//! JWT issuing and verification.
//!
//! Access and refresh tokens are both HS256 JWTs signed with the same secret.
//! They differ only in lifetime and in that refresh tokens are also stored
//! (as a SHA-256 digest) so they can be revoked and used exactly once.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use bazaar_core::{UserId, UserRole};

use crate::config::JwtConfig;
use crate::models::{CurrentUser, User};

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
    /// Random per token, so two tokens minted in the same second differ.
    pub jti: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// A freshly signed access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Signs and verifies tokens with the configured secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("keys", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenIssuer {
    /// Build an issuer from configuration.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        Self::from_secret(
            config.secret.expose_secret().as_bytes(),
            Duration::minutes(config.access_token_ttl_minutes),
            Duration::days(config.refresh_token_ttl_days),
        )
    }

    /// Build an issuer from a raw secret and lifetimes.
    #[must_use]
    pub fn from_secret(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Sign an access token and a refresh token for `user`.
    ///
    /// # Errors
    ///
    /// Returns the `jsonwebtoken` error if signing fails.
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let access_token = self.sign(user, now, self.access_ttl)?;
        let refresh_token = self.sign(user, now, self.refresh_ttl)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_expires_at: now + self.refresh_ttl,
        })
    }

    /// Verify the signature and expiry of a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns the `jsonwebtoken` error if the token is malformed, signed
    /// with another key, or expired.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }

    fn sign(
        &self,
        user: &User,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            user_id: user.id,
            email: user.email.as_str().to_owned(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }
}

/// Digest of a refresh token as stored in the database.
#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Email;

    use super::*;

    const SECRET: &[u8] = b"q7!Rz2@Lm9#Vx4$Kp8%Tn3^Wb6&Hc1*F";

    fn issuer() -> TokenIssuer {
        TokenIssuer::from_secret(SECRET, Duration::minutes(15), Duration::days(7))
    }

    fn user(role: UserRole) -> User {
        User {
            id: UserId::new(42),
            email: Email::parse("shopper@example.com").unwrap(),
            first_name: "Sam".to_string(),
            last_name: "Shopper".to_string(),
            phone: None,
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let issuer = issuer();
        let pair = issuer.issue_pair(&user(UserRole::Admin)).unwrap();

        let claims = issuer.verify(&pair.access_token).unwrap();
        assert_eq!(claims.user_id, UserId::new(42));
        assert_eq!(claims.email, "shopper@example.com");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, 15 * 60);

        let refresh = issuer.verify(&pair.refresh_token).unwrap();
        assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_tokens_are_unique_within_a_second() {
        let issuer = issuer();
        let u = user(UserRole::Customer);
        let a = issuer.issue_pair(&u).unwrap();
        let b = issuer.issue_pair(&u).unwrap();
        assert_ne!(a.refresh_token, b.refresh_token);
        assert_ne!(a.access_token, a.refresh_token);
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let other = TokenIssuer::from_secret(
            b"a-completely-different-key-0123456789",
            Duration::minutes(15),
            Duration::days(7),
        );
        let pair = other.issue_pair(&user(UserRole::Customer)).unwrap();
        assert!(issuer().verify(&pair.access_token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let issuer = TokenIssuer::from_secret(SECRET, Duration::hours(-1), Duration::days(7));
        let pair = issuer.issue_pair(&user(UserRole::Customer)).unwrap();
        assert!(issuer.verify(&pair.access_token).is_err());
        assert!(issuer.verify(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(issuer().verify("not.a.jwt").is_err());
        assert!(issuer().verify("").is_err());
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let digest = hash_token("abc");
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(digest, hash_token("abc"));
        assert_ne!(digest, hash_token("abd"));
    }
}
