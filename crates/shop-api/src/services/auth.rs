//! # Authentication Service
//!
//! Password hashing (bcrypt) and signed session tokens (HS256 JWT).
//!
//! Tokens carry the user id, email, and admin flag, and expire 7 days after
//! issuance. Verification fails closed: missing, malformed, or expired
//! tokens all reject. Login never reveals whether the email or the password
//! was wrong.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shop_core::{ShopError, ShopResult, User};

/// Token lifetime: 7 days
const TOKEN_TTL_DAYS: i64 = 7;

/// JWT claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i32,
    /// User email
    pub email: String,
    /// Admin flag
    pub is_admin: bool,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Issues and verifies session tokens, hashes and checks passwords.
///
/// Constructed once at startup from config and shared via `AppState`.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(jwt_secret: &str) -> Self {
        Self::with_cost(jwt_secret, bcrypt::DEFAULT_COST)
    }

    /// Lower cost factors are only for tests; DEFAULT_COST keeps hashing in
    /// the ~100ms range on commodity hardware.
    pub fn with_cost(jwt_secret: &str, bcrypt_cost: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            bcrypt_cost,
        }
    }

    /// Hash a password. Runs on the blocking pool; bcrypt is deliberately slow.
    pub async fn hash_password(&self, password: String) -> ShopResult<String> {
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| ShopError::Internal(format!("hash task failed: {e}")))?
            .map_err(|e| ShopError::Internal(format!("bcrypt failure: {e}")))
    }

    /// Check a password against a stored hash.
    ///
    /// Any failure (bad hash format included) maps to `InvalidCredentials`.
    pub async fn verify_password(&self, password: String, hash: String) -> ShopResult<()> {
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| ShopError::Internal(format!("verify task failed: {e}")))?
            .unwrap_or(false);

        if matched {
            Ok(())
        } else {
            Err(ShopError::InvalidCredentials)
        }
    }

    /// Issue a signed 7-day token for a user
    pub fn issue_token(&self, user: &User) -> ShopResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ShopError::Internal(format!("token encoding failed: {e}")))
    }

    /// Verify a token and return its claims. Fails closed.
    pub fn verify_token(&self, token: &str) -> ShopResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| ShopError::Unauthorized(format!("invalid token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // MIN_COST keeps the bcrypt tests fast (bcrypt's minimum cost; the crate
    // does not export its `MIN_COST` constant)
    const MIN_COST: u32 = 4;

    fn service() -> AuthService {
        AuthService::with_cost("test-secret", MIN_COST)
    }

    fn user(is_admin: bool) -> User {
        User {
            id: 42,
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            full_name: "Ada".to_string(),
            is_admin,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let auth = service();
        let hash = auth.hash_password("hunter22".to_string()).await.unwrap();

        assert!(auth
            .verify_password("hunter22".to_string(), hash.clone())
            .await
            .is_ok());
        assert!(matches!(
            auth.verify_password("wrong".to_string(), hash)
                .await
                .unwrap_err(),
            ShopError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_garbage_hash_is_invalid_credentials() {
        let auth = service();
        let err = auth
            .verify_password("pw".to_string(), "not-a-bcrypt-hash".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::InvalidCredentials));
    }

    #[test]
    fn test_token_round_trip() {
        let auth = service();
        let token = auth.issue_token(&user(true)).unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 3600);
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = service().issue_token(&user(false)).unwrap();
        let other = AuthService::with_cost("different-secret", MIN_COST);
        assert!(matches!(
            other.verify_token(&token).unwrap_err(),
            ShopError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let auth = service();
        let mut token = auth.issue_token(&user(false)).unwrap();
        token.push('x');
        assert!(auth.verify_token(&token).is_err());
    }
}
