/**
 * Blog Routes
 * Public read endpoints and the guarded editor API
 */
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Session;
use crate::blog::derive::{read_time, slugify, word_count};
use crate::blog::editor::{BlogEditor, BlogInput, SaveAction};
use crate::blog::filter::{BlogFilter, BlogStats};
use crate::db::models::{BlogPost, BlogStatus};
use crate::db::repo;
use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for GET /api/admin/blogs
#[derive(Debug, Default, Deserialize)]
pub struct BlogListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

/// Response for GET /api/admin/blogs
#[derive(Debug, Serialize)]
pub struct BlogListResponse {
    pub items: Vec<BlogPost>,
    pub stats: BlogStats,
}

/// Body for create and update: the editable fields plus the button pressed.
#[derive(Debug, Default, Deserialize)]
pub struct SaveBlogRequest {
    #[serde(flatten)]
    pub input: BlogInput,
    pub action: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeriveRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeriveResponse {
    pub slug: String,
    pub read_time: i32,
    pub word_count: usize,
}

/// Success response (for delete)
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

fn parse_action(action: Option<&str>, fallback: SaveAction) -> Result<SaveAction, AppError> {
    match action {
        None => Ok(fallback),
        Some(value) => SaveAction::parse(value).ok_or_else(|| {
            AppError::Validation("Action must be draft, publish or archive".to_string())
        }),
    }
}

// ============================================================================
// Public Handlers
// ============================================================================

/// GET /api/blog - Published posts, newest first
pub async fn list_published(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, AppError> {
    let posts = repo::list_published_blogs(state.data.as_ref()).await?;
    Ok(Json(posts))
}

/// GET /api/blog/{slug} - A published post; drafts and archived posts are 404
pub async fn get_published(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    match repo::find_blog_by_slug(state.data.as_ref(), &slug).await? {
        Some(post) if post.status == BlogStatus::Published => Ok(Json(post)),
        _ => Err(AppError::NotFound),
    }
}

// ============================================================================
// Editor Handlers
// ============================================================================

/// GET /api/admin/blogs - Every post, filtered in memory
pub async fn list_blogs(
    State(state): State<AppState>,
    _session: Session,
    Query(query): Query<BlogListQuery>,
) -> Result<Json<BlogListResponse>, AppError> {
    let posts = repo::list_blogs(state.data.as_ref()).await?;
    let filter = BlogFilter::new(query.search.as_deref(), query.status.as_deref());

    Ok(Json(BlogListResponse {
        stats: BlogStats::count(&posts),
        items: filter.apply(&posts).into_iter().cloned().collect(),
    }))
}

/// GET /api/admin/blogs/{id}
pub async fn get_blog(
    State(state): State<AppState>,
    _session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<BlogPost>, AppError> {
    let post = repo::get_blog(state.data.as_ref(), id).await?;
    Ok(Json(post))
}

/// POST /api/admin/blogs - Create a post (draft unless an action says otherwise)
pub async fn create_blog(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SaveBlogRequest>,
) -> Result<(StatusCode, Json<BlogPost>), AppError> {
    let action = parse_action(payload.action.as_deref(), SaveAction::Draft)?;

    let mut editor = BlogEditor::new();
    editor.apply(payload.input);
    let post = editor.save(state.data.as_ref(), &session, action).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// PATCH /api/admin/blogs/{id} - Apply a partial edit and save
pub async fn update_blog(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveBlogRequest>,
) -> Result<Json<BlogPost>, AppError> {
    let existing = repo::get_blog(state.data.as_ref(), id).await?;
    let action = parse_action(payload.action.as_deref(), SaveAction::Keep)?;

    let mut editor = BlogEditor::from_post(&existing);
    editor.apply(payload.input);
    let post = editor.save(state.data.as_ref(), &session, action).await?;

    Ok(Json(post))
}

/// DELETE /api/admin/blogs/{id}
pub async fn delete_blog(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    repo::delete_blog(state.data.as_ref(), id).await?;
    tracing::info!(id = %id, by = %session.email, "Blog post deleted");
    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/admin/blogs/derive - Slug and read time for a draft in progress
pub async fn derive(_session: Session, Json(payload): Json<DeriveRequest>) -> Json<DeriveResponse> {
    Json(DeriveResponse {
        slug: slugify(&payload.title),
        read_time: read_time(&payload.content),
        word_count: word_count(&payload.content),
    })
}
