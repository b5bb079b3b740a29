//! In-memory search and status filtering for the blog list.

use serde::{Deserialize, Serialize};

use crate::db::models::{BlogPost, BlogStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BlogStatus),
}

impl StatusFilter {
    /// `"all"`, empty and unknown values mean no status filter.
    pub fn parse(value: &str) -> Self {
        match BlogStatus::parse(value) {
            Some(status) => StatusFilter::Only(status),
            None => StatusFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn admits(&self, status: BlogStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    pub search: String,
    pub status: StatusFilter,
}

impl BlogFilter {
    pub fn new(search: Option<&str>, status: Option<&str>) -> Self {
        Self {
            search: search.unwrap_or_default().trim().to_string(),
            status: status.map(StatusFilter::parse).unwrap_or_default(),
        }
    }

    /// Title or any tag contains the search text, ignoring case.
    pub fn matches(&self, post: &BlogPost) -> bool {
        if !self.status.admits(post.status) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        post.title.to_lowercase().contains(&needle)
            || post.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
    }

    pub fn apply<'a>(&self, posts: &'a [BlogPost]) -> Vec<&'a BlogPost> {
        posts.iter().filter(|post| self.matches(post)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogStats {
    pub total: usize,
    pub published: usize,
    pub drafts: usize,
    pub archived: usize,
}

impl BlogStats {
    pub fn count<'a>(posts: impl IntoIterator<Item = &'a BlogPost>) -> Self {
        posts.into_iter().fold(Self::default(), |mut stats, post| {
            stats.total += 1;
            match post.status {
                BlogStatus::Published => stats.published += 1,
                BlogStatus::Draft => stats.drafts += 1,
                BlogStatus::Archived => stats.archived += 1,
            }
            stats
        })
    }
}
