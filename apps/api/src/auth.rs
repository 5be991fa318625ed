//! Authentication module.
//!
//! Handles JWT issuing and validation, the bearer-token middleware, and
//! password hashing.
//!
//! ```text
//! Authorization: Bearer <jwt>
//!        │
//!        ▼
//! require_auth ── missing/empty ──► 401 "insert token please"
//!        │     ── bad/expired  ──► 401 "invalid token"
//!        ▼
//! request.extensions: CustomerContext { id, username, email }
//!        │
//!        ▼
//! handler: Extension(ctx): Extension<CustomerContext>
//! ```

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::{ServiceError, ServiceResult};
use shelf_core::Customer;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Customer ID
    pub id: i64,

    pub username: String,
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// Authenticated caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContext {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<Claims> for CustomerContext {
    fn from(claims: Claims) -> Self {
        CustomerContext {
            id: claims.id,
            username: claims.username,
            email: claims.email,
        }
    }
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Generate a token for `customer`.
    pub fn generate_token(&self, customer: &Customer) -> ServiceResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            id: customer.id,
            username: customer.username.clone(),
            email: customer.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token (HS256, expiry checked).
    pub fn validate_token(&self, token: &str) -> ServiceResult<Claims> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ServiceError::Auth(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Middleware guarding customer-only routes.
///
/// Mounted with `axum::middleware::from_fn_with_state(jwt, require_auth)`.
pub async fn require_auth(
    State(jwt): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .trim();

    if header.is_empty() || header == "Bearer" {
        return Err(ApiError::unauthorized("insert token please"));
    }

    let token = extract_bearer_token(header)
        .map(str::trim)
        .ok_or_else(|| ApiError::unauthorized("invalid token"))?;

    let claims = jwt.validate_token(token)?;
    request
        .extensions_mut()
        .insert(CustomerContext::from(claims));

    Ok(next.run(request).await)
}

// =============================================================================
// Password Hashing
// =============================================================================

/// Hash a password for storage (argon2id, random salt, PHC string).
pub fn hash_password(password: &str) -> ServiceResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against its stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            id: 42,
            email: "reader@example.com".to_string(),
            password_hash: String::new(),
            username: "reader".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager.generate_token(&customer()).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.id, 42);
        assert_eq!(claims.username, "reader");
        assert_eq!(claims.email, "reader@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtManager::new("secret-a".to_string(), 3600);
        let verifier = JwtManager::new("secret-b".to_string(), 3600);

        let token = issuer.generate_token(&customer()).unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(ServiceError::Auth(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let manager = JwtManager::new("test-secret".to_string(), -120);

        let token = manager.generate_token(&customer()).unwrap();
        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("abc"), None);
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("Secr3t!pass").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Secr3t!pass", &hash));
        assert!(!verify_password("Wrong!pass1", &hash));
        assert!(!verify_password("Secr3t!pass", "not-a-phc-string"));
    }
}
