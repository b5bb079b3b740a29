//! AKACorpTech site - library for app logic and testing

pub mod admin;
pub mod auth;
pub mod blog;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod routes;
pub mod site;
pub mod state;
pub mod storage;
pub mod templates;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::storage::PUBLIC_PREFIX;

/// Upload cap is 5 MB; the extra megabyte leaves room for multipart framing.
const BODY_LIMIT_BYTES: usize = 6 * 1024 * 1024;

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN, falling back
/// to the site's own public URL.
pub fn configure_cors(config: &AppConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .map(|s| {
            s.split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect::<Vec<HeaderValue>>()
        })
        .filter(|origins| !origins.is_empty())
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            config
                .public_base_url
                .trim_end_matches('/')
                .parse()
                .map(|origin| vec![origin])
                .unwrap_or_default()
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors(&state.config);
    tracing::info!("CORS configured");

    let storage_dir = ServeDir::new(&state.config.storage_dir);

    Router::new()
        // Public pages
        .route("/", get(routes::pages::index))
        .route("/blog", get(routes::pages::blog_index))
        .route("/blog/{slug}", get(routes::pages::blog_post))
        .route("/contact", post(routes::contact::submit_contact))
        .route("/newsletter", post(routes::contact::subscribe_newsletter))
        // Admin pages
        .route(
            "/login",
            get(routes::auth::login_page).post(routes::auth::login_submit),
        )
        .route("/logout", post(routes::auth::logout_submit))
        .route("/admin", get(routes::admin_pages::dashboard))
        .route("/admin/blogs", get(routes::admin_pages::blogs_page))
        .route(
            "/admin/blogs/new",
            get(routes::admin_pages::new_post_page).post(routes::admin_pages::create_post_submit),
        )
        .route(
            "/admin/blogs/edit/{id}",
            get(routes::admin_pages::edit_post_page).post(routes::admin_pages::update_post_submit),
        )
        .route(
            "/admin/blogs/edit/{id}/image",
            post(routes::admin_pages::upload_image_submit),
        )
        .route(
            "/admin/blogs/{id}/delete",
            post(routes::admin_pages::delete_blog_submit),
        )
        .route("/admin/messages", get(routes::admin_pages::messages_page))
        .route(
            "/admin/messages/{id}/read",
            post(routes::admin_pages::mark_read_submit),
        )
        // Auth API
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/verify", post(routes::auth::verify_token))
        .route("/api/auth/refresh", post(routes::auth::refresh))
        .route("/api/auth/logout", post(routes::auth::logout))
        // Public API
        .route("/api/contact", post(routes::contact::submit_contact_api))
        .route("/api/blog", get(routes::blog::list_published))
        .route("/api/blog/{slug}", get(routes::blog::get_published))
        // Admin API
        .route(
            "/api/admin/blogs",
            get(routes::blog::list_blogs).post(routes::blog::create_blog),
        )
        .route("/api/admin/blogs/derive", post(routes::blog::derive))
        .route(
            "/api/admin/blogs/{id}",
            get(routes::blog::get_blog)
                .patch(routes::blog::update_blog)
                .delete(routes::blog::delete_blog),
        )
        .route("/api/admin/uploads", post(routes::upload::upload_image))
        .route("/api/admin/dashboard", get(routes::admin::dashboard))
        .route("/api/admin/messages", get(routes::admin::list_messages))
        .route(
            "/api/admin/messages/{id}/read",
            post(routes::admin::mark_message_read),
        )
        // Health
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .route("/health/ready", get(routes::health::health_ready))
        // Files
        .nest_service(PUBLIC_PREFIX, storage_dir)
        .nest_service("/static", ServeDir::new("static"))
        .fallback(routes::pages::not_found)
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init(&config.environment);

    // Refuse to start in production with the insecure default JWT secret.
    config.validate()?;
    if config.is_production() && std::env::var("ADMIN_HASH_PASSWORD").is_err() {
        tracing::warn!(
            "SECURITY: ADMIN_HASH_PASSWORD is not set. \
             Set it to a bcrypt hash of a strong password (see the hash-password binary)."
        );
    }

    let data = db::connect().await;
    let storage = Arc::new(state::local_storage(&config));
    let state = AppState::new(config, data, storage);

    if let Err(e) = auth::seed_admin(state.data.as_ref(), &state.config).await {
        tracing::error!("Failed to seed admin profile: {}", e);
    }

    let addr: SocketAddr = state.config.bind_addr().parse()?;
    let app = create_app(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
