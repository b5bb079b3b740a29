//! Signed-in sessions: the request extractors and the in-memory session store.
//!
//! A session is opened at login, renewed by refresh-token rotation and torn
//! down at logout. Access tokens carry the session id, so revoking the session
//! invalidates every token issued for it.

use std::{collections::HashMap, convert::Infallible, sync::Arc};

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{request::Parts, HeaderMap},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    create_access_token, decode_access_token, generate_refresh_token, hash_refresh_token,
    ACCESS_COOKIE, REFRESH_TOKEN_EXPIRY_DAYS,
};
use crate::db::models::{Role, UserProfile};
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated user behind a request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Uuid,
    #[serde(skip)]
    pub session_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

/// Tokens handed out at login and on every refresh
#[derive(Debug, Clone)]
pub struct Tokens {
    pub session: Session,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
struct SessionRecord {
    session: Session,
    refresh_hash: String,
    expires_at: i64,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionRecord>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session for a verified profile.
    pub async fn open(&self, secret: &str, profile: &UserProfile) -> Result<Tokens, AppError> {
        let session = Session {
            user_id: profile.id,
            session_id: Uuid::new_v4(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            role: profile.role,
        };
        let access_token = create_access_token(secret, &session).map_err(|e| {
            tracing::error!("Failed to create access token: {}", e);
            AppError::Internal("Failed to create token".to_string())
        })?;
        let refresh_token = generate_refresh_token();
        let now = Utc::now().timestamp();

        let mut sessions = self.sessions.write().await;
        // Drop expired sessions so the map tracks active logins only
        sessions.retain(|_, record| record.expires_at > now);
        sessions.insert(
            session.session_id,
            SessionRecord {
                session: session.clone(),
                refresh_hash: hash_refresh_token(&refresh_token),
                expires_at: refresh_expiry(),
            },
        );

        Ok(Tokens {
            session,
            access_token,
            refresh_token,
        })
    }

    /// Resolve an access token to its live session.
    pub async fn authenticate(&self, secret: &str, access_token: &str) -> Result<Session, AppError> {
        let claims =
            decode_access_token(secret, access_token).map_err(|_| AppError::InvalidToken)?;
        let session_id = Uuid::parse_str(&claims.sid).map_err(|_| AppError::InvalidToken)?;

        let sessions = self.sessions.read().await;
        match sessions.get(&session_id) {
            Some(record) if record.expires_at > Utc::now().timestamp() => {
                Ok(record.session.clone())
            }
            _ => Err(AppError::InvalidToken),
        }
    }

    /// Exchange a refresh token for a new token pair; the old refresh token
    /// stops working.
    pub async fn refresh(&self, secret: &str, refresh_token: &str) -> Result<Tokens, AppError> {
        let presented = hash_refresh_token(refresh_token);
        let now = Utc::now().timestamp();

        let mut sessions = self.sessions.write().await;
        let record = sessions
            .values_mut()
            .find(|record| record.refresh_hash == presented)
            .ok_or(AppError::InvalidToken)?;
        if record.expires_at <= now {
            return Err(AppError::InvalidToken);
        }

        let access_token = create_access_token(secret, &record.session).map_err(|e| {
            tracing::error!("Failed to create access token: {}", e);
            AppError::Internal("Failed to create token".to_string())
        })?;
        let refresh_token = generate_refresh_token();
        record.refresh_hash = hash_refresh_token(&refresh_token);
        record.expires_at = refresh_expiry();

        Ok(Tokens {
            session: record.session.clone(),
            access_token,
            refresh_token,
        })
    }

    /// End a session. Returns whether it was still open.
    pub async fn revoke(&self, session_id: Uuid) -> bool {
        self.sessions.write().await.remove(&session_id).is_some()
    }

    /// End whichever session the refresh token belongs to.
    pub async fn revoke_refresh(&self, refresh_token: &str) -> bool {
        let presented = hash_refresh_token(refresh_token);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| record.refresh_hash != presented);
        sessions.len() != before
    }

    pub async fn active_count(&self) -> usize {
        let now = Utc::now().timestamp();
        self.sessions
            .read()
            .await
            .values()
            .filter(|record| record.expires_at > now)
            .count()
    }
}

fn refresh_expiry() -> i64 {
    (Utc::now() + Duration::days(REFRESH_TOKEN_EXPIRY_DAYS)).timestamp()
}

// ============================================================================
// Extractors
// ============================================================================

/// Extract bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Bearer header first, then the session cookie set by the login form.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    extract_bearer_token(headers).or_else(|| {
        CookieJar::from_headers(headers)
            .get(ACCESS_COOKIE)
            .map(|cookie| cookie.value().to_string())
    })
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_access_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        state
            .sessions
            .authenticate(&state.config.jwt_secret, &token)
            .await
    }
}

impl OptionalFromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(
            <Session as FromRequestParts<AppState>>::from_request_parts(parts, state)
                .await
                .ok(),
        )
    }
}

/// Session for the HTML admin pages; anonymous visitors go to the login page.
#[derive(Debug, Clone)]
pub struct PageSession(pub Session);

impl FromRequestParts<AppState> for PageSession {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        <Session as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(PageSession)
            .map_err(|_| Redirect::to("/login"))
    }
}
