/**
 * Page Routes
 * Server-rendered public pages: landing page, blog and the 404 fallback
 */
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use crate::admin::NoticeQuery;
use crate::db::models::BlogStatus;
use crate::db::repo;
use crate::error::AppError;
use crate::site::content::{whatsapp_link, WHATSAPP_GREETING, WHATSAPP_PHONE};
use crate::state::AppState;
use crate::templates::{
    render, BlogIndexTemplate, BlogPostTemplate, IndexTemplate, NotFoundTemplate, PostRow,
};

/// GET /
pub async fn index(Query(query): Query<NoticeQuery>) -> Result<Html<String>, AppError> {
    let whatsapp_url = whatsapp_link(WHATSAPP_PHONE, WHATSAPP_GREETING)
        .map_err(|e| AppError::Internal(format!("Invalid WhatsApp link: {}", e)))?;
    render(&IndexTemplate::new(query.notification(), whatsapp_url.to_string()))
}

/// GET /blog
pub async fn blog_index(
    State(state): State<AppState>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let posts = repo::list_published_blogs(state.data.as_ref()).await?;
    render(&BlogIndexTemplate {
        notice: query.notification(),
        posts: posts.iter().map(PostRow::from).collect(),
    })
}

/// GET /blog/{slug} - Only published posts are visible
pub async fn blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    uri: Uri,
) -> Result<Response, AppError> {
    match repo::find_blog_by_slug(state.data.as_ref(), &slug).await? {
        Some(post) if post.status == BlogStatus::Published => {
            Ok(render(&BlogPostTemplate::new(&post))?.into_response())
        }
        _ => not_found_page(uri.path()),
    }
}

fn not_found_page(path: &str) -> Result<Response, AppError> {
    tracing::warn!("404 Error: User attempted to access non-existent route: {}", path);
    let page = NotFoundTemplate {
        notice: None,
        path: path.to_string(),
    };
    Ok((StatusCode::NOT_FOUND, render(&page)?).into_response())
}

/// Router fallback
pub async fn not_found(uri: Uri) -> Result<Response, AppError> {
    not_found_page(uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::filter::tests::post;
    use crate::config::AppConfig;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn get_html(app: Router, uri: &str) -> (StatusCode, String) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn test_router() -> Router {
        let state = AppState::in_memory(AppConfig::default());
        for (title, status) in [
            ("Shipping Rust", BlogStatus::Published),
            ("Secret Plans", BlogStatus::Draft),
        ] {
            repo::insert_blog(state.data.as_ref(), &post(title, status, &["rust"]))
                .await
                .unwrap();
        }
        Router::new()
            .route("/", get(index))
            .route("/blog", get(blog_index))
            .route("/blog/{slug}", get(blog_post))
            .fallback(not_found)
            .with_state(state)
    }

    #[tokio::test]
    async fn test_index_shows_notice() {
        let (status, html) =
            get_html(test_router().await, "/?notice=success&title=Message+Sent%21").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Message Sent!"));
    }

    #[tokio::test]
    async fn test_blog_lists_only_published() {
        let (status, html) = get_html(test_router().await, "/blog").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Shipping Rust"));
        assert!(!html.contains("Secret Plans"));
    }

    #[tokio::test]
    async fn test_draft_post_is_not_found() {
        let app = test_router().await;
        let (status, _) = get_html(app.clone(), "/blog/shipping-rust").await;
        assert_eq!(status, StatusCode::OK);
        let (status, html) = get_html(app, "/blog/secret-plans").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("Oops! Page not found"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, html) = get_html(test_router().await, "/no/such/page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("Return to Home"));
    }
}
