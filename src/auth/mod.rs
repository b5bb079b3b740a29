/**
 * Authentication
 * JWT access tokens, rotating refresh tokens and bcrypt password checks
 */
pub mod rate_limit;
pub mod session;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{AdminPassword, AppConfig};
use crate::db::models::{Role, UserProfile};
use crate::db::{repo, DataClient, DataError};
use crate::error::AppError;

pub use session::{PageSession, Session, SessionStore, Tokens};

// ============================================================================
// Configuration
// ============================================================================

/// Access token expiry in minutes
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60;

/// Refresh token expiry in days
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Cookie carrying the access token for the HTML admin pages
pub const ACCESS_COOKIE: &str = "access_token";

/// Cookie carrying the refresh token for the HTML admin pages
pub const REFRESH_COOKIE: &str = "refresh_token";

// ============================================================================
// Tokens
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // User ID
    pub sid: String, // Session ID
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: i64, // Expiry timestamp
    pub iat: i64, // Issued at timestamp
}

pub fn create_access_token(
    secret: &str,
    session: &Session,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES);

    let claims = Claims {
        sub: session.user_id.to_string(),
        sid: session.session_id.to_string(),
        email: session.email.clone(),
        name: session.name.clone(),
        role: session.role,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify signature and expiry, then decode the claims
pub fn decode_access_token(
    secret: &str,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

pub fn generate_refresh_token() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 64)
}

/// Refresh tokens are only ever kept as their SHA-256 digest.
pub fn hash_refresh_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// Passwords
// ============================================================================

pub async fn hash_password(plain: String) -> Result<String, AppError> {
    match tokio::task::spawn_blocking(move || hash(plain, DEFAULT_COST)).await {
        Ok(Ok(h)) => Ok(h),
        Ok(Err(e)) => Err(AppError::Internal(format!("Failed to hash password: {}", e))),
        Err(e) => Err(AppError::Internal(format!(
            "spawn_blocking panic during hash: {}",
            e
        ))),
    }
}

/// bcrypt is CPU-bound, so the check runs on the blocking pool.
pub async fn verify_password(plain: String, password_hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify(&plain, &password_hash).unwrap_or(false))
        .await
        .unwrap_or(false)
}

/// Look up the profile by email and check its password.
///
/// Unknown email and wrong password produce the same error.
pub async fn authenticate(
    data: &dyn DataClient,
    email: &str,
    password: &str,
) -> Result<UserProfile, AppError> {
    let Some(profile) = repo::find_profile_by_email(data, email).await? else {
        tracing::warn!("Login attempt for unknown user: {}", email);
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password.to_string(), profile.password_hash.clone()).await {
        tracing::warn!("Failed login attempt for: {}", profile.email);
        return Err(AppError::InvalidCredentials);
    }

    Ok(profile)
}

/// Create the configured admin profile unless one with that email exists.
pub async fn seed_admin(data: &dyn DataClient, config: &AppConfig) -> Result<(), AppError> {
    if repo::find_profile_by_email(data, &config.admin_email)
        .await?
        .is_some()
    {
        return Ok(());
    }

    let password_hash = match &config.admin_password {
        AdminPassword::Hashed(h) => h.clone(),
        AdminPassword::Plain(plain) => hash_password(plain.clone()).await?,
    };

    let profile = UserProfile {
        id: Uuid::new_v4(),
        name: config.admin_name.clone(),
        email: config.admin_email.clone(),
        role: Role::Admin,
        password_hash,
        created_at: Utc::now(),
    };

    match repo::insert_profile(data, &profile).await {
        Ok(_) => {
            tracing::info!(email = %profile.email, "Seeded admin profile");
            Ok(())
        }
        // A concurrent instance seeded it first
        Err(DataError::Duplicate { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::memory::MemoryDataClient;

    pub(crate) fn test_config(password: &str) -> AppConfig {
        AppConfig {
            admin_password: AdminPassword::Hashed(bcrypt::hash(password, 4).unwrap()),
            ..AppConfig::default()
        }
    }

    fn session() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            email: "admin@akacorptech.com".to_string(),
            name: "Site Admin".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let session = session();
        let token = create_access_token("secret", &session).unwrap();
        let claims = decode_access_token("secret", &token).unwrap();
        assert_eq!(claims.sub, session.user_id.to_string());
        assert_eq!(claims.sid, session.session_id.to_string());
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);

        assert!(decode_access_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_refresh_token_shape_and_hash() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));

        let digest = hash_refresh_token(&token);
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_refresh_token(&token));
        assert_ne!(digest, hash_refresh_token("something-else"));
    }

    #[tokio::test]
    async fn test_seed_admin_then_authenticate() {
        let data = MemoryDataClient::new();
        let config = test_config("s3cret-pass");

        seed_admin(&data, &config).await.unwrap();
        // Seeding twice keeps a single profile
        seed_admin(&data, &config).await.unwrap();
        let rows = data
            .select(
                crate::db::Table::Profiles,
                crate::db::SelectQuery::all(),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);

        let profile = authenticate(&data, "ADMIN@akacorptech.com", "s3cret-pass")
            .await
            .unwrap();
        assert_eq!(profile.role, Role::Admin);

        assert!(matches!(
            authenticate(&data, "admin@akacorptech.com", "wrong").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            authenticate(&data, "nobody@akacorptech.com", "s3cret-pass").await,
            Err(AppError::InvalidCredentials)
        ));
    }
}
