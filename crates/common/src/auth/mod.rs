//! Authentication and authorization utilities
//!
//! Provides:
//! - Password hashing and generation
//! - JWT token generation and validation
//! - Caller context extraction and role checks

use crate::db::{models::Role, Store};
use crate::errors::{AppError, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Alphabet for generated passwords (no 0/O, 1/l/I lookalikes)
const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789!@#$%";

/// Length of generated temporary passwords
pub const GENERATED_PASSWORD_LEN: usize = 12;

/// Authenticated caller, available to handlers
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
    pub email: String,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn can_review(&self) -> bool {
        self.role.can_review()
    }

    /// Require admin or misAdmin
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden {
                message: "admin role required".to_string(),
            })
        }
    }

    /// Require hod, admin or misAdmin
    pub fn require_reviewer(&self) -> Result<()> {
        if self.can_review() {
            Ok(())
        } else {
            Err(AppError::Forbidden {
                message: "reviewer role required".to_string(),
            })
        }
    }

    /// The caller owns `owner_id`, or may review anyone's records
    pub fn can_access(&self, owner_id: Uuid) -> bool {
        self.user_id == owner_id || self.can_review()
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,

    pub role: Role,

    pub email: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT token manager
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret
    pub fn new(secret: &str, expiration_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_secs: expiration_secs as i64,
        }
    }

    /// Generate a new JWT token
    pub fn generate_token(&self, user_id: Uuid, role: Role, email: &str) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expiration_secs);

        let claims = JwtClaims {
            sub: user_id.to_string(),
            role,
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| AppError::Internal {
            message: format!("Failed to generate token: {}", e),
        })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::InvalidToken,
            })
    }

    /// Validate a token and build the caller context from its claims
    pub fn authenticate(&self, token: &str) -> Result<AuthContext> {
        let claims = self.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        Ok(AuthContext {
            user_id,
            role: claims.role,
            email: claims.email,
        })
    }
}

/// Hash a password with Argon2id and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AppError::Internal {
        message: format!("Failed to encode salt: {}", e),
    })?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
}

/// Check a plaintext password against a stored PHC hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Generate a random temporary password
pub fn generate_password() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_PASSWORD_LEN)
        .map(|_| PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}

/// Extract the token from a `Bearer` authorization header
pub fn extract_bearer(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Axum extractor for AuthContext.
///
/// The token only names the caller. The account is loaded from the store on
/// every request, so changes to it apply to tokens already issued.
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<JwtManager>: FromRef<S>,
    Arc<dyn Store>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer)
            .ok_or(AppError::Unauthorized)?;

        let claims = Arc::<JwtManager>::from_ref(state).authenticate(token)?;
        let store = Arc::<dyn Store>::from_ref(state);
        resolve_caller(store.as_ref(), claims.user_id).await
    }
}

/// Build the caller context from the stored account
pub async fn resolve_caller(store: &dyn Store, user_id: Uuid) -> Result<AuthContext> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !user.is_active {
        return Err(AppError::Forbidden {
            message: "account is disabled".to_string(),
        });
    }

    Ok(AuthContext {
        user_id: user.id,
        role: user.user_role(),
        email: user.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{models::User, MemoryStore};

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret-pass", "not-a-phc-string"));
    }

    #[test]
    fn test_generated_password_alphabet() {
        let password = generate_password();
        assert_eq!(password.len(), GENERATED_PASSWORD_LEN);
        assert!(password.bytes().all(|b| PASSWORD_CHARSET.contains(&b)));
        assert!(!password.contains('0') && !password.contains('O'));
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(extract_bearer("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer("Bearer "), None);
        assert_eq!(extract_bearer("Basic abc"), None);
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test_secret", 3600);
        let user_id = Uuid::new_v4();

        let token = manager
            .generate_token(user_id, Role::Hod, "hod@college.edu")
            .unwrap();
        let ctx = manager.authenticate(&token).unwrap();

        assert_eq!(ctx.user_id, user_id);
        assert_eq!(ctx.role, Role::Hod);
        assert!(ctx.can_review());
        assert!(ctx.require_admin().is_err());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let issuer = JwtManager::new("secret-a", 3600);
        let verifier = JwtManager::new("secret-b", 3600);
        let token = issuer
            .generate_token(Uuid::new_v4(), Role::Faculty, "f@college.edu")
            .unwrap();

        assert!(matches!(
            verifier.authenticate(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_caller_role_comes_from_store() {
        let store = MemoryStore::new();
        let mut user = User::new_account("ex-admin@college.edu", "Ex", Role::Admin, "CSE");
        user.role = Role::Faculty.as_str().to_string();
        let user = store.insert_user(user).await.unwrap();

        let ctx = resolve_caller(&store, user.id).await.unwrap();
        assert_eq!(ctx.role, Role::Faculty);
        assert!(ctx.require_admin().is_err());
    }

    #[tokio::test]
    async fn test_deleted_or_disabled_caller_rejected() {
        let store = MemoryStore::new();
        let mut user = User::new_account("f@college.edu", "F", Role::Faculty, "CSE");
        user.is_active = false;
        let user = store.insert_user(user).await.unwrap();

        assert!(matches!(
            resolve_caller(&store, user.id).await,
            Err(AppError::Forbidden { .. })
        ));

        store.delete_user(user.id).await.unwrap();
        assert!(matches!(
            resolve_caller(&store, user.id).await,
            Err(AppError::Unauthorized)
        ));
    }
}
