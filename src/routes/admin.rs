/**
 * Admin API Routes
 * Dashboard summary and the contact-message inbox as JSON
 */
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::admin::dashboard::{Dashboard, StatCard};
use crate::admin::messages::ContactInbox;
use crate::auth::Session;
use crate::db::models::ContactMessage;
use crate::db::repo;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub cards: Vec<StatCard>,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<ContactMessage>,
    pub total: usize,
    pub unread: usize,
}

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<DashboardResponse>, AppError> {
    let dashboard = Dashboard::load(state.data.as_ref(), &session).await?;
    Ok(Json(DashboardResponse {
        cards: dashboard.stat_cards(),
        dashboard,
    }))
}

/// GET /api/admin/messages - 403 for non-admins
pub async fn list_messages(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<MessagesResponse>, AppError> {
    let inbox = ContactInbox::load(state.data.as_ref(), &session).await?;
    Ok(Json(MessagesResponse {
        total: inbox.messages().len(),
        unread: inbox.unread_count(),
        messages: inbox.messages().to_vec(),
    }))
}

/// POST /api/admin/messages/{id}/read
pub async fn mark_message_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<ContactMessage>, AppError> {
    session.require_admin()?;
    let message = repo::mark_message_read(state.data.as_ref(), id).await?;
    Ok(Json(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::models::{NewContactMessage, Role, UserProfile};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;
    use chrono::Utc;
    use tower::ServiceExt;

    async fn setup(role: Role) -> (Router, AppState, String) {
        let state = AppState::in_memory(AppConfig::default());
        let profile = UserProfile {
            id: Uuid::new_v4(),
            name: "Someone".to_string(),
            email: "someone@akacorptech.com".to_string(),
            role,
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        let tokens = state
            .sessions
            .open(&state.config.jwt_secret, &profile)
            .await
            .unwrap();
        let app = Router::new()
            .route("/api/admin/dashboard", get(dashboard))
            .route("/api/admin/messages", get(list_messages))
            .route("/api/admin/messages/{id}/read", post(mark_message_read))
            .with_state(state.clone());
        (app, state, tokens.access_token)
    }

    async fn seed_message(state: &AppState) -> Uuid {
        let message = NewContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            service: "ai-solutions".to_string(),
            message: "Hello".to_string(),
        }
        .into_message();
        repo::insert_message(state.data.as_ref(), &message)
            .await
            .unwrap()
            .id
    }

    fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_editor_cannot_read_messages() {
        let (app, state, token) = setup(Role::Editor).await;
        let id = seed_message(&state).await;

        let res = app
            .clone()
            .oneshot(authed("GET", "/api/admin/messages", &token))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app
            .oneshot(authed("POST", &format!("/api/admin/messages/{}/read", id), &token))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_marks_message_read() {
        let (app, state, token) = setup(Role::Admin).await;
        let id = seed_message(&state).await;

        let res = app
            .clone()
            .oneshot(authed("POST", &format!("/api/admin/messages/{}/read", id), &token))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .oneshot(authed("GET", "/api/admin/messages", &token))
            .await
            .unwrap();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["unread"], 0);
        assert_eq!(value["messages"][0]["status"], "read");
    }

    #[tokio::test]
    async fn test_dashboard_counts() {
        let (app, state, token) = setup(Role::Admin).await;
        seed_message(&state).await;

        let res = app
            .oneshot(authed("GET", "/api/admin/dashboard", &token))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["messages_unread"], 1);
        assert_eq!(value["cards"].as_array().unwrap().len(), 4);
    }
}
