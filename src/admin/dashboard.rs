//! Admin landing page: summary counts and the latest activity.

use serde::Serialize;

use crate::auth::Session;
use crate::blog::filter::BlogStats;
use crate::db::models::{BlogPost, ContactMessage, MessageStatus};
use crate::db::{repo, DataClient, DataError};

/// Number of rows shown in each "recent" list.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub title: &'static str,
    pub description: &'static str,
    pub href: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 3] = [
    QuickAction {
        title: "Write New Blog",
        description: "Create and publish a new blog post",
        href: "/admin/blogs/new",
    },
    QuickAction {
        title: "Manage Blogs",
        description: "Edit, update, or delete existing blogs",
        href: "/admin/blogs",
    },
    QuickAction {
        title: "Contact Messages",
        description: "Read enquiries sent through the contact form",
        href: "/admin/messages",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub blogs: BlogStats,
    pub messages_total: usize,
    pub messages_unread: usize,
    pub recent_posts: Vec<BlogPost>,
    /// Empty for non-admin sessions, which may not read messages.
    pub recent_messages: Vec<ContactMessage>,
    pub quick_actions: &'static [QuickAction],
}

impl Dashboard {
    /// Zero counts and no recent items, shown when loading fails.
    pub fn empty() -> Self {
        Self {
            blogs: BlogStats::default(),
            messages_total: 0,
            messages_unread: 0,
            recent_posts: Vec::new(),
            recent_messages: Vec::new(),
            quick_actions: &QUICK_ACTIONS,
        }
    }

    pub async fn load(data: &dyn DataClient, session: &Session) -> Result<Self, DataError> {
        let posts = repo::list_blogs(data).await.map_err(|e| {
            tracing::error!("Error fetching blogs: {}", e);
            e
        })?;

        let messages = if session.is_admin() {
            repo::list_messages(data).await.map_err(|e| {
                tracing::error!("Error fetching messages: {}", e);
                e
            })?
        } else {
            Vec::new()
        };

        Ok(Self {
            blogs: BlogStats::count(&posts),
            messages_total: messages.len(),
            messages_unread: messages
                .iter()
                .filter(|m| m.status == MessageStatus::Unread)
                .count(),
            recent_posts: posts.into_iter().take(RECENT_LIMIT).collect(),
            recent_messages: messages.into_iter().take(RECENT_LIMIT).collect(),
            quick_actions: &QUICK_ACTIONS,
        })
    }

    pub fn stat_cards(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                title: "Total Blogs",
                value: self.blogs.total,
            },
            StatCard {
                title: "Published",
                value: self.blogs.published,
            },
            StatCard {
                title: "Drafts",
                value: self.blogs.drafts,
            },
            StatCard {
                title: "Unread Messages",
                value: self.messages_unread,
            },
        ]
    }
}
