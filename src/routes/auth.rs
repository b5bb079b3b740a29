/**
 * Authentication Routes
 * JSON login/verify/refresh/logout plus the cookie-based HTML login form
 */
use axum::{
    extract::{ConnectInfo, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::admin::{NoticeQuery, Notification};
use crate::auth::{self, Session, Tokens, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::error::AppError;
use crate::state::AppState;
use crate::templates::{render, LoginTemplate};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub user: Session,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: Session,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub success: bool,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

impl From<Tokens> for LoginResponse {
    fn from(tokens: Tokens) -> Self {
        Self {
            success: true,
            user: tokens.session,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

// ============================================================================
// Sign-in
// ============================================================================

/// Rate limit, validate and check credentials, then open a session.
async fn sign_in(
    state: &AppState,
    addr: SocketAddr,
    email: &str,
    password: &str,
) -> Result<Tokens, AppError> {
    let ip = addr.ip().to_string();

    if !state.login_limiter.check(&ip).await {
        tracing::warn!(ip = %ip, "Login rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    let profile = auth::authenticate(state.data.as_ref(), email, password).await?;
    let tokens = state
        .sessions
        .open(&state.config.jwt_secret, &profile)
        .await?;
    state.login_limiter.reset(&ip).await;

    tracing::info!("Successful login for user: {}", profile.email);
    Ok(tokens)
}

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

fn with_session_cookies(jar: CookieJar, tokens: Tokens, secure: bool) -> CookieJar {
    jar.add(session_cookie(ACCESS_COOKIE, tokens.access_token, secure))
        .add(session_cookie(REFRESH_COOKIE, tokens.refresh_token, secure))
}

fn without_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(ACCESS_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_COOKIE).path("/"))
}

// ============================================================================
// JSON Handlers
// ============================================================================

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let tokens = sign_in(&state, addr, &payload.email, &payload.password).await?;
    Ok(Json(tokens.into()))
}

/// POST /api/auth/verify - Echo the session behind the presented token
pub async fn verify_token(session: Session) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        user: session,
    })
}

/// POST /api/auth/refresh - Rotate the refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let tokens = state
        .sessions
        .refresh(&state.config.jwt_secret, &payload.refresh_token)
        .await?;
    Ok(Json(RefreshResponse {
        success: true,
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    }))
}

/// POST /api/auth/logout
///
/// Ends the session of the access token and, when given, the one owning the
/// refresh token. Logging out twice is not an error.
pub async fn logout(
    State(state): State<AppState>,
    session: Option<Session>,
    Json(payload): Json<LogoutRequest>,
) -> Json<LogoutResponse> {
    if let Some(session) = session {
        state.sessions.revoke(session.session_id).await;
        tracing::info!("User logged out: {}", session.email);
    }
    if let Some(token) = payload.refresh_token {
        state.sessions.revoke_refresh(&token).await;
    }
    Json(LogoutResponse { success: true })
}

// ============================================================================
// HTML Handlers
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET /login
///
/// Signed-in users go straight to the dashboard. An expired access cookie
/// with a live refresh cookie is renewed silently.
pub async fn login_page(
    State(state): State<AppState>,
    session: Option<Session>,
    jar: CookieJar,
    Query(query): Query<NoticeQuery>,
) -> Result<Response, AppError> {
    if session.is_some() {
        return Ok(Redirect::to("/admin").into_response());
    }

    if let Some(refresh_token) = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string()) {
        if let Ok(tokens) = state
            .sessions
            .refresh(&state.config.jwt_secret, &refresh_token)
            .await
        {
            let jar = with_session_cookies(jar, tokens, state.config.is_production());
            return Ok((jar, Redirect::to("/admin")).into_response());
        }
    }

    let page = LoginTemplate {
        notice: query.notification(),
        email: String::new(),
    };
    Ok(render(&page)?.into_response())
}

/// POST /login
pub async fn login_submit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match sign_in(&state, addr, &form.email, &form.password).await {
        Ok(tokens) => {
            let jar = with_session_cookies(jar, tokens, state.config.is_production());
            Ok((jar, Redirect::to("/admin")).into_response())
        }
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                tracing::error!("Login failed: {}", e);
            }
            let page = LoginTemplate {
                notice: Some(Notification::error("Login Failed", e.public_message())),
                email: form.email,
            };
            Ok((status, render(&page)?).into_response())
        }
    }
}

/// POST /logout
pub async fn logout_submit(
    State(state): State<AppState>,
    session: Option<Session>,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(session) = session {
        state.sessions.revoke(session.session_id).await;
        tracing::info!("User logged out: {}", session.email);
    }
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        state.sessions.revoke_refresh(cookie.value()).await;
    }

    let notice = Notification::success("Signed Out", "You have been signed out.");
    (
        without_session_cookies(jar),
        Redirect::to(&notice.redirect_target("/login")),
    )
}
