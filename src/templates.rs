//! askama page templates and the row types they render.

use askama::Template;
use axum::response::Html;
use chrono::{DateTime, Datelike, Utc};

use crate::admin::dashboard::{QuickAction, StatCard};
use crate::admin::messages::{format_date, service_name};
use crate::admin::Notification;
use crate::blog::editor::BlogEditor;
use crate::blog::filter::BlogStats;
use crate::db::models::{BlogPost, BlogStatus, ContactMessage, MessageStatus};
use crate::error::AppError;
use crate::site::content::{
    AwardEntry, ContactInfo, Hero, NavLink, Project, Service, ServiceOption, Stat,
};

pub fn render<T: Template>(template: &T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

fn short_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

// ============================================================================
// Row view models
// ============================================================================

pub struct PostRow {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub status: String,
    pub status_label: String,
    pub tags: Vec<String>,
    pub read_time: i32,
    pub featured_image: String,
    pub publish_date: String,
    pub created: String,
}

impl From<&BlogPost> for PostRow {
    fn from(post: &BlogPost) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            status: post.status.as_str().to_string(),
            status_label: post.status.label().to_string(),
            tags: post.tags.clone(),
            read_time: post.read_time,
            featured_image: post.featured_image.clone(),
            publish_date: post.publish_date.as_ref().map(short_date).unwrap_or_default(),
            created: short_date(&post.created_at),
        }
    }
}

pub struct MessageRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub unread: bool,
    pub date: String,
}

impl From<&ContactMessage> for MessageRow {
    fn from(message: &ContactMessage) -> Self {
        Self {
            id: message.id.to_string(),
            name: message.name.clone(),
            email: message.email.clone(),
            service: service_name(&message.service).to_string(),
            message: message.message.clone(),
            unread: message.status == MessageStatus::Unread,
            date: format_date(&message.created_at),
        }
    }
}

/// Blank-line separated blocks of a post body.
pub fn paragraphs(content: &str) -> Vec<String> {
    content
        .replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Public pages
// ============================================================================

#[derive(Template)]
#[template(path = "site/index.html")]
pub struct IndexTemplate {
    pub notice: Option<Notification>,
    pub nav_links: &'static [NavLink],
    pub nav_services: &'static [&'static str],
    pub hero: &'static Hero,
    pub about_stats: &'static [Stat],
    pub about_quote: &'static str,
    pub about_paragraphs: &'static [&'static str],
    pub services: &'static [Service],
    pub projects: &'static [Project],
    pub clients: Vec<&'static str>,
    pub awards: &'static [AwardEntry],
    pub contact: &'static ContactInfo,
    pub service_options: &'static [ServiceOption],
    pub footer_tagline: &'static str,
    pub footer_links: &'static [NavLink],
    pub footer_services: &'static [&'static str],
    pub social_links: &'static [NavLink],
    pub legal_links: &'static [NavLink],
    pub whatsapp_url: String,
    pub year: i32,
}

impl IndexTemplate {
    pub fn new(notice: Option<Notification>, whatsapp_url: String) -> Self {
        use crate::site::content as c;
        Self {
            notice,
            nav_links: &c::NAV_LINKS,
            nav_services: &c::NAV_SERVICES,
            hero: &c::HERO,
            about_stats: &c::ABOUT_STATS,
            about_quote: c::ABOUT_QUOTE,
            about_paragraphs: &c::ABOUT_PARAGRAPHS,
            services: &c::SERVICES,
            projects: &c::PROJECTS,
            clients: c::client_strip().collect(),
            awards: &c::AWARDS,
            contact: &c::CONTACT,
            service_options: &c::SERVICE_OPTIONS,
            footer_tagline: c::FOOTER_TAGLINE,
            footer_links: &c::FOOTER_QUICK_LINKS,
            footer_services: &c::FOOTER_SERVICES,
            social_links: &c::SOCIAL_LINKS,
            legal_links: &c::LEGAL_LINKS,
            whatsapp_url,
            year: Utc::now().year(),
        }
    }
}

#[derive(Template)]
#[template(path = "site/blog_index.html")]
pub struct BlogIndexTemplate {
    pub notice: Option<Notification>,
    pub posts: Vec<PostRow>,
}

#[derive(Template)]
#[template(path = "site/blog_post.html")]
pub struct BlogPostTemplate {
    pub notice: Option<Notification>,
    pub post: PostRow,
    pub seo_title: String,
    pub seo_description: String,
    pub keywords: String,
    pub paragraphs: Vec<String>,
}

impl BlogPostTemplate {
    pub fn new(post: &BlogPost) -> Self {
        Self {
            notice: None,
            seo_title: if post.seo_title.is_empty() {
                post.title.clone()
            } else {
                post.seo_title.clone()
            },
            seo_description: post.seo_description.clone(),
            keywords: post.keywords.join(", "),
            paragraphs: paragraphs(&post.content),
            post: PostRow::from(post),
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub notice: Option<Notification>,
    pub email: String,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub notice: Option<Notification>,
    pub path: String,
}

// ============================================================================
// Admin pages
// ============================================================================

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub notice: Option<Notification>,
    pub user_name: String,
    pub is_admin: bool,
    pub cards: Vec<StatCard>,
    pub quick_actions: &'static [QuickAction],
    pub recent_posts: Vec<PostRow>,
    pub recent_messages: Vec<MessageRow>,
}

pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub fn status_options(selected: &str) -> Vec<StatusOption> {
    std::iter::once(("all", "All Status"))
        .chain(BlogStatus::ALL.iter().map(|s| (s.as_str(), s.label())))
        .map(|(value, label)| StatusOption {
            value,
            label,
            selected: value == selected,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "admin/blogs.html")]
pub struct BlogListTemplate {
    pub notice: Option<Notification>,
    pub user_name: String,
    pub is_admin: bool,
    pub stats: BlogStats,
    pub rows: Vec<PostRow>,
    pub search: String,
    pub status_options: Vec<StatusOption>,
}

#[derive(Template)]
#[template(path = "admin/editor.html")]
pub struct EditorTemplate {
    pub notice: Option<Notification>,
    pub user_name: String,
    pub is_admin: bool,
    /// Empty for a post that has not been saved yet
    pub id: String,
    pub title: String,
    pub slug: String,
    pub slug_locked: bool,
    pub content: String,
    pub excerpt: String,
    pub featured_image: String,
    pub status_label: String,
    pub seo_title: String,
    pub seo_description: String,
    pub tags: String,
    pub keywords: String,
    pub read_time: i32,
    pub publish_date: String,
}

impl EditorTemplate {
    pub fn new(
        editor: &BlogEditor,
        user_name: String,
        is_admin: bool,
        notice: Option<Notification>,
    ) -> Self {
        let form = editor.form();
        Self {
            notice,
            user_name,
            is_admin,
            id: editor.id().map(|id| id.to_string()).unwrap_or_default(),
            title: form.title.clone(),
            slug: form.slug.clone(),
            slug_locked: editor.slug_locked(),
            content: form.content.clone(),
            excerpt: form.excerpt.clone(),
            featured_image: form.featured_image.clone(),
            status_label: form.status.label().to_string(),
            seo_title: form.seo_title.clone(),
            seo_description: form.seo_description.clone(),
            tags: form.tags.join(", "),
            keywords: form.keywords.join(", "),
            read_time: form.read_time,
            publish_date: editor
                .publish_date()
                .as_ref()
                .map(short_date)
                .unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/messages.html")]
pub struct MessagesTemplate {
    pub notice: Option<Notification>,
    pub user_name: String,
    pub is_admin: bool,
    pub total: usize,
    pub unread: usize,
    pub rows: Vec<MessageRow>,
    pub selected: Option<MessageRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::filter::tests::post;

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        assert_eq!(
            paragraphs("First line\nstill first\r\n\r\nSecond\n\n\n\n  "),
            vec!["First line\nstill first".to_string(), "Second".to_string()]
        );
        assert!(paragraphs("").is_empty());
    }

    #[test]
    fn test_index_renders_sections() {
        let html = IndexTemplate::new(None, "https://wa.me/917678245132".to_string())
            .render()
            .unwrap();
        for needle in [
            "id=\"about\"",
            "id=\"services\"",
            "id=\"portfolio\"",
            "id=\"contact\"",
            "Stock Strategix",
            "Tech Innovation Award 2024",
            "hello@akacorptech.com",
            "wa.me",
        ] {
            assert!(html.contains(needle), "missing {}", needle);
        }
    }

    #[test]
    fn test_post_content_is_escaped() {
        let mut blog = post("Safe", BlogStatus::Published, &[]);
        blog.content = "<script>alert(1)</script>".to_string();
        let html = BlogPostTemplate::new(&blog).render().unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_status_options_mark_selection() {
        let options = status_options("draft");
        assert_eq!(options.len(), 4);
        assert!(options.iter().any(|o| o.value == "draft" && o.selected));
        assert_eq!(options.iter().filter(|o| o.selected).count(), 1);
    }
}
