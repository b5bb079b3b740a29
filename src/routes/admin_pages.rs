/**
 * Admin Page Routes
 * Server-rendered admin panel. Every action is a form post that redirects
 * back with a notice in the query string.
 */
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::admin::blogs::BlogManagement;
use crate::admin::dashboard::Dashboard;
use crate::admin::messages::ContactInbox;
use crate::admin::{NoticeQuery, Notification};
use crate::auth::{PageSession, Session};
use crate::blog::editor::{BlogEditor, BlogInput, EditorError, SaveAction};
use crate::blog::filter::BlogFilter;
use crate::db::repo;
use crate::error::AppError;
use crate::routes::upload::read_image;
use crate::state::AppState;
use crate::storage::StorageError;
use crate::templates::{
    render, status_options, BlogListTemplate, DashboardTemplate, EditorTemplate, MessageRow,
    MessagesTemplate, PostRow,
};

// ============================================================================
// Form Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct BlogListParams {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: String,
}

/// The editor form as posted by the browser. Tags and keywords arrive as
/// comma separated text.
#[derive(Debug, Default, Deserialize)]
pub struct EditorForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub featured_image: String,
    #[serde(default)]
    pub seo_title: String,
    #[serde(default)]
    pub seo_description: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub action: String,
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl EditorForm {
    pub fn into_input(self) -> BlogInput {
        BlogInput {
            title: Some(self.title),
            slug: Some(self.slug),
            content: Some(self.content),
            excerpt: Some(self.excerpt),
            featured_image: Some(self.featured_image.trim().to_string()),
            seo_title: Some(self.seo_title),
            seo_description: Some(self.seo_description),
            tags: Some(split_list(&self.tags)),
            keywords: Some(split_list(&self.keywords)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagesParams {
    pub selected: Option<String>,
}

fn redirect_with(notice: &Notification, path: &str) -> Response {
    Redirect::to(&notice.redirect_target(path)).into_response()
}

// ============================================================================
// Dashboard
// ============================================================================

/// GET /admin
pub async fn dashboard(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let mut notice = query.notification();
    let dashboard = match Dashboard::load(state.data.as_ref(), &session).await {
        Ok(dashboard) => dashboard,
        Err(_) => {
            notice = Some(Notification::error("Error", "Failed to load dashboard"));
            Dashboard::empty()
        }
    };

    render(&DashboardTemplate {
        notice,
        user_name: session.name.clone(),
        is_admin: session.is_admin(),
        cards: dashboard.stat_cards(),
        quick_actions: dashboard.quick_actions,
        recent_posts: dashboard.recent_posts.iter().map(PostRow::from).collect(),
        recent_messages: dashboard
            .recent_messages
            .iter()
            .map(MessageRow::from)
            .collect(),
    })
}

// ============================================================================
// Blog management
// ============================================================================

/// GET /admin/blogs
pub async fn blogs_page(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Query(params): Query<BlogListParams>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let mut notice = query.notification();
    let management = match BlogManagement::load(state.data.as_ref()).await {
        Ok(management) => management,
        Err(_) => {
            notice = Some(Notification::error("Error", "Failed to fetch blogs"));
            BlogManagement::default()
        }
    };

    let filter = BlogFilter::new(Some(params.search.as_str()), Some(params.status.as_str()));
    render(&BlogListTemplate {
        notice,
        user_name: session.name.clone(),
        is_admin: session.is_admin(),
        stats: management.stats(),
        rows: management
            .filtered(&filter)
            .into_iter()
            .map(PostRow::from)
            .collect(),
        search: params.search,
        status_options: status_options(filter.status.as_str()),
    })
}

/// POST /admin/blogs/{id}/delete
pub async fn delete_blog_submit(
    State(state): State<AppState>,
    PageSession(_session): PageSession,
    Path(id): Path<Uuid>,
) -> Response {
    let mut management = BlogManagement::default();
    let notice = management.delete(state.data.as_ref(), id).await;
    redirect_with(&notice, "/admin/blogs")
}

// ============================================================================
// Editor
// ============================================================================

fn editor_page(
    editor: &BlogEditor,
    session: &Session,
    notice: Option<Notification>,
) -> Result<Html<String>, AppError> {
    render(&EditorTemplate::new(
        editor,
        session.name.clone(),
        session.is_admin(),
        notice,
    ))
}

/// GET /admin/blogs/new
pub async fn new_post_page(
    PageSession(session): PageSession,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    editor_page(&BlogEditor::new(), &session, query.notification())
}

/// GET /admin/blogs/edit/{id}
pub async fn edit_post_page(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Path(id): Path<Uuid>,
    Query(query): Query<NoticeQuery>,
) -> Result<Response, AppError> {
    match repo::get_blog(state.data.as_ref(), id).await {
        Ok(post) => {
            let editor = BlogEditor::from_post(&post);
            Ok(editor_page(&editor, &session, query.notification())?.into_response())
        }
        Err(e) => {
            tracing::error!("Error fetching blog: {}", e);
            let notice = Notification::error("Error", "Failed to fetch blog post");
            Ok(redirect_with(&notice, "/admin/blogs"))
        }
    }
}

/// Apply the posted form and save. Success goes back to the blog list;
/// failures re-render the editor with what the author typed.
async fn save_post(
    state: &AppState,
    session: &Session,
    mut editor: BlogEditor,
    form: EditorForm,
) -> Result<Response, AppError> {
    let is_new = editor.id().is_none();
    let action = SaveAction::parse(&form.action).unwrap_or(SaveAction::Draft);
    editor.apply(form.into_input());

    match editor.save(state.data.as_ref(), session, action).await {
        Ok(_) => {
            let notice = Notification::success(
                "Success",
                if is_new {
                    "Blog post created successfully"
                } else {
                    "Blog post updated successfully"
                },
            );
            Ok(redirect_with(&notice, "/admin/blogs"))
        }
        Err(EditorError::Validation(msg)) => {
            let notice = Notification::error("Error", msg);
            Ok((
                StatusCode::BAD_REQUEST,
                editor_page(&editor, session, Some(notice))?,
            )
                .into_response())
        }
        Err(e) => {
            let status = AppError::from(e).status();
            let notice = Notification::error(
                "Error",
                if is_new {
                    "Failed to create blog post"
                } else {
                    "Failed to update blog post"
                },
            );
            Ok((status, editor_page(&editor, session, Some(notice))?).into_response())
        }
    }
}

/// POST /admin/blogs/new
pub async fn create_post_submit(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Form(form): Form<EditorForm>,
) -> Result<Response, AppError> {
    save_post(&state, &session, BlogEditor::new(), form).await
}

/// POST /admin/blogs/edit/{id}
pub async fn update_post_submit(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Path(id): Path<Uuid>,
    Form(form): Form<EditorForm>,
) -> Result<Response, AppError> {
    match repo::get_blog(state.data.as_ref(), id).await {
        Ok(post) => save_post(&state, &session, BlogEditor::from_post(&post), form).await,
        Err(e) => {
            tracing::error!("Error fetching blog: {}", e);
            let notice = Notification::error("Error", "Failed to fetch blog post");
            Ok(redirect_with(&notice, "/admin/blogs"))
        }
    }
}

/// POST /admin/blogs/edit/{id}/image
///
/// Stores the image and points the post at it. The rest of the post is
/// left as stored.
pub async fn upload_image_submit(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Response {
    let edit_path = format!("/admin/blogs/edit/{}", id);

    let mut post = match repo::get_blog(state.data.as_ref(), id).await {
        Ok(post) => post,
        Err(e) => {
            tracing::error!("Error fetching blog: {}", e);
            let notice = Notification::error("Error", "Failed to fetch blog post");
            return redirect_with(&notice, "/admin/blogs");
        }
    };

    let file = match read_image(&mut multipart).await {
        Ok(file) => file,
        Err(e) => {
            let notice = Notification::error("Upload Error", e.public_message());
            return redirect_with(&notice, &edit_path);
        }
    };

    let mut editor = BlogEditor::from_post(&post);
    let notice = match editor
        .upload_image(state.storage.as_ref(), &session, &file)
        .await
    {
        Ok(url) => {
            post.featured_image = url;
            match repo::update_blog(state.data.as_ref(), id, &post).await {
                Ok(_) => Notification::success(
                    "Image Uploaded",
                    "Featured image uploaded successfully",
                ),
                Err(e) => {
                    tracing::error!("Error saving featured image: {}", e);
                    Notification::error("Upload Error", "Failed to upload image")
                }
            }
        }
        Err(EditorError::Storage(StorageError::Rejected(msg))) => {
            Notification::error("Upload Error", msg)
        }
        Err(_) => Notification::error("Upload Error", "Failed to upload image"),
    };
    redirect_with(&notice, &edit_path)
}

// ============================================================================
// Contact messages
// ============================================================================

/// GET /admin/messages - Admin role only; editors are sent back to the dashboard
pub async fn messages_page(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Query(params): Query<MessagesParams>,
    Query(query): Query<NoticeQuery>,
) -> Result<Response, AppError> {
    let mut notice = query.notification();
    let inbox = match ContactInbox::load(state.data.as_ref(), &session).await {
        Ok(inbox) => inbox,
        Err(AppError::Forbidden) => {
            tracing::warn!(user = %session.email, "Non-admin attempted to view messages");
            let notice = Notification::error(
                "Access Denied",
                "Only administrators can view contact messages.",
            );
            return Ok(redirect_with(&notice, "/admin"));
        }
        Err(_) => {
            notice = Some(Notification::error(
                "Error",
                "Failed to fetch contact messages.",
            ));
            ContactInbox::default()
        }
    };

    let selected = params
        .selected
        .as_deref()
        .and_then(|id| Uuid::parse_str(id).ok())
        .and_then(|id| inbox.get(id))
        .map(MessageRow::from);

    let page = MessagesTemplate {
        notice,
        user_name: session.name.clone(),
        is_admin: true,
        total: inbox.messages().len(),
        unread: inbox.unread_count(),
        rows: inbox.messages().iter().map(MessageRow::from).collect(),
        selected,
    };
    Ok(render(&page)?.into_response())
}

/// POST /admin/messages/{id}/read
pub async fn mark_read_submit(
    State(state): State<AppState>,
    PageSession(session): PageSession,
    Path(id): Path<Uuid>,
) -> Response {
    if session.require_admin().is_err() {
        return StatusCode::FORBIDDEN.into_response();
    }
    let mut inbox = ContactInbox::default();
    let notice = inbox.mark_as_read(state.data.as_ref(), id).await;
    redirect_with(&notice, &format!("/admin/messages?selected={}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::models::{Role, UserProfile};
    use crate::db::{DataClient, DataError, Row, SelectQuery, Table};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::routing::get;
    use axum::Router;
    use chrono::Utc;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Every call fails as if the database were down.
    struct UnreachableStore;

    #[async_trait]
    impl DataClient for UnreachableStore {
        fn backend(&self) -> &'static str {
            "unreachable"
        }

        async fn ping(&self) -> Result<(), DataError> {
            Err(DataError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn select(&self, _table: Table, _query: SelectQuery) -> Result<Vec<Row>, DataError> {
            Err(DataError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn insert(&self, _table: Table, _record: Row) -> Result<Row, DataError> {
            Err(DataError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn update(&self, _table: Table, _id: Uuid, _patch: Row) -> Result<Row, DataError> {
            Err(DataError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn delete(&self, _table: Table, _id: Uuid) -> Result<(), DataError> {
            Err(DataError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_dashboard_renders_notice_when_data_is_unreachable() {
        let config = AppConfig::default();
        let storage = Arc::new(crate::state::local_storage(&config));
        let state = AppState::new(config, Arc::new(UnreachableStore), storage);
        let profile = UserProfile {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: "admin@akacorptech.com".to_string(),
            role: Role::Admin,
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        let tokens = state
            .sessions
            .open(&state.config.jwt_secret, &profile)
            .await
            .unwrap();

        let app = Router::new()
            .route("/admin", get(dashboard))
            .with_state(state);
        let req = Request::get("/admin")
            .header(header::COOKIE, format!("access_token={}", tokens.access_token))
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Failed to load dashboard"));
        assert!(html.contains("Welcome back, Admin"));
    }

    #[test]
    fn test_editor_form_splits_lists() {
        let form = EditorForm {
            title: "Hello".to_string(),
            tags: "Rust, , Web ,rust".to_string(),
            keywords: "".to_string(),
            ..EditorForm::default()
        };
        let input = form.into_input();
        assert_eq!(
            input.tags,
            Some(vec!["Rust".to_string(), "Web".to_string(), "rust".to_string()])
        );
        assert_eq!(input.keywords, Some(vec![]));
    }
}
