use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::AppConfig;
use crate::dto::{LoginRequest, LoginResponse};
use crate::entities::UserStatus;
use crate::errors::ServiceError;
use crate::repositories::UserRepository;

const TOKEN_ISSUER: &str = "task-manager-api";

/// JWT claims issued on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Expiry instant for a token issued at `now`.
fn token_expiry(now: DateTime<Utc>, lifetime_secs: u64) -> Result<DateTime<Utc>, ServiceError> {
    i64::try_from(lifetime_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            ServiceError::JwtError(format!("token lifetime of {}s is out of range", lifetime_secs))
        })
}

/// Credential check and token issuance. Tokens are not enforced on other routes.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt_secret: String,
    jwt_expiration_secs: u64,
}

impl AuthService {
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        Self {
            users: UserRepository::new(db),
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiration_secs: config.jwt_expiration_secs,
        }
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: LoginRequest) -> Result<LoginResponse, ServiceError> {
        let user = self
            .users
            .find_by_username(credentials.username.trim())
            .await?
            .filter(|user| verify_password(&credentials.password, &user.password_hash))
            .ok_or_else(|| {
                warn!("Rejected login with bad credentials");
                ServiceError::Unauthorized("Invalid username or password".to_string())
            })?;

        if user.status == UserStatus::Inactive {
            warn!(user_id = user.id, "Rejected login for inactive user");
            return Err(ServiceError::Unauthorized("User is inactive".to_string()));
        }

        let now = Utc::now();
        let expires_at = token_expiry(now, self.jwt_expiration_secs)?;
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        info!(user_id = user.id, "User logged in");
        Ok(LoginResponse {
            token,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            email: user.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_with_the_original_password() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert_ne!(hash, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("other", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("repeat").unwrap();
        let b = hash_password("repeat").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn token_expiry_rejects_unrepresentable_lifetimes() {
        let now = Utc::now();
        assert_eq!(token_expiry(now, 3600).unwrap(), now + Duration::hours(1));
        assert!(matches!(
            token_expiry(now, u64::MAX),
            Err(ServiceError::JwtError(_))
        ));
        assert!(token_expiry(now, (i64::MAX / 1000) as u64 + 1).is_err());
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
