/**
 * Contact Routes
 * Contact form submissions and the footer newsletter signup
 */
use axum::{
    extract::State,
    http::StatusCode,
    response::Redirect,
    Form, Json,
};
use serde::Deserialize;

use crate::admin::Notification;
use crate::db::models::{ContactMessage, NewContactMessage};
use crate::db::repo;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewsletterForm {
    #[serde(default)]
    pub email: String,
}

fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.contains('@')
}

/// Name, email and message are required; the service is optional.
pub fn validate_contact(form: &NewContactMessage) -> Result<(), AppError> {
    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return Err(AppError::Validation(
            "Name, email and message are required".to_string(),
        ));
    }
    if !is_plausible_email(&form.email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}

async fn store_contact(state: &AppState, form: NewContactMessage) -> Result<ContactMessage, AppError> {
    validate_contact(&form)?;
    let message = repo::insert_message(state.data.as_ref(), &form.into_message())
        .await
        .map_err(|e| {
            tracing::error!("Error saving contact message: {}", e);
            e
        })?;
    tracing::info!(id = %message.id, service = %message.service, "Contact message received");
    Ok(message)
}

/// POST /api/contact
pub async fn submit_contact_api(
    State(state): State<AppState>,
    Json(payload): Json<NewContactMessage>,
) -> Result<(StatusCode, Json<ContactMessage>), AppError> {
    let message = store_contact(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /contact - The landing page form; always lands back on `/` with a notice
pub async fn submit_contact(
    State(state): State<AppState>,
    Form(form): Form<NewContactMessage>,
) -> Redirect {
    let notice = match store_contact(&state, form).await {
        Ok(_) => Notification::success("Message Sent!", "We'll get back to you within 24 hours."),
        Err(AppError::Validation(msg)) => Notification::error("Error", msg),
        Err(_) => Notification::error("Error", "Failed to send your message. Please try again."),
    };
    Redirect::to(&notice.redirect_target("/"))
}

/// POST /newsletter - Acknowledged only; addresses are not stored
pub async fn subscribe_newsletter(Form(form): Form<NewsletterForm>) -> Redirect {
    let notice = if is_plausible_email(&form.email) {
        Notification::success("Subscribed!", "Thanks for subscribing to our newsletter.")
    } else {
        Notification::error("Error", "Please enter a valid email address.")
    };
    Redirect::to(&notice.redirect_target("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    fn form(name: &str, email: &str, message: &str) -> NewContactMessage {
        NewContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            service: String::new(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_validate_contact() {
        assert!(validate_contact(&form("Ada", "ada@example.com", "Hi")).is_ok());
        assert!(validate_contact(&form("", "ada@example.com", "Hi")).is_err());
        assert!(validate_contact(&form("Ada", "ada.example.com", "Hi")).is_err());
        assert!(validate_contact(&form("Ada", "ada@example.com", "   ")).is_err());
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_contact_form_stores_unread_message() {
        let state = AppState::in_memory(AppConfig::default());
        let app = Router::new()
            .route("/contact", post(submit_contact))
            .with_state(state.clone());

        let res = app
            .oneshot(form_post(
                "/contact",
                "name=Ada&email=ada%40example.com&service=web-development&message=Need+a+site",
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/?notice=success"));

        let messages = repo::list_messages(state.data.as_ref()).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].service, "web-development");
        assert_eq!(messages[0].status, crate::db::models::MessageStatus::Unread);
    }

    #[tokio::test]
    async fn test_contact_api_rejects_invalid_email() {
        let state = AppState::in_memory(AppConfig::default());
        let app = Router::new()
            .route("/api/contact", post(submit_contact_api))
            .with_state(state.clone());

        let req = Request::post("/api/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({"name": "Ada", "email": "nope", "message": "Hi"}).to_string(),
            ))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(repo::list_messages(state.data.as_ref())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_newsletter_acknowledges() {
        let app = Router::new().route("/newsletter", post(subscribe_newsletter));
        let res = app
            .oneshot(form_post("/newsletter", "email=reader%40example.com"))
            .await
            .unwrap();
        let location = res.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.contains("title=Subscribed%21"));
    }
}
