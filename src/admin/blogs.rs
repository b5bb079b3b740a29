//! Blog list of the admin panel.

use uuid::Uuid;

use super::notify::Notification;
use crate::blog::filter::{BlogFilter, BlogStats};
use crate::db::models::BlogPost;
use crate::db::{repo, DataClient, DataError};

/// Every post, newest first. There is no pagination: the whole table is
/// fetched and filtered in memory.
#[derive(Debug, Clone, Default)]
pub struct BlogManagement {
    rows: Vec<BlogPost>,
}

impl BlogManagement {
    pub async fn load(data: &dyn DataClient) -> Result<Self, DataError> {
        let rows = repo::list_blogs(data).await.map_err(|e| {
            tracing::error!("Error fetching blogs: {}", e);
            e
        })?;
        Ok(Self { rows })
    }

    pub fn from_rows(rows: Vec<BlogPost>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[BlogPost] {
        &self.rows
    }

    pub fn filtered(&self, filter: &BlogFilter) -> Vec<&BlogPost> {
        filter.apply(&self.rows)
    }

    pub fn stats(&self) -> BlogStats {
        BlogStats::count(&self.rows)
    }

    /// One delete attempt. The row leaves the list only if the store
    /// confirmed the delete.
    pub async fn delete(&mut self, data: &dyn DataClient, id: Uuid) -> Notification {
        match repo::delete_blog(data, id).await {
            Ok(()) => {
                self.rows.retain(|post| post.id != id);
                tracing::info!(id = %id, "Blog post deleted");
                Notification::success(
                    "Blog Deleted",
                    "The blog post has been deleted successfully.",
                )
            }
            Err(e) => {
                tracing::error!("Error deleting blog: {}", e);
                Notification::error("Error", "Failed to delete blog post")
            }
        }
    }
}
