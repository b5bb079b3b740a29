//! Typed access to the tables on top of any [`DataClient`].

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::client::{DataClient, DataError, Row, SelectQuery, Table};
use super::models::{BlogPost, BlogStatus, ContactMessage, MessageStatus, UserProfile};

fn to_row<T: Serialize>(value: &T) -> Result<Row, DataError> {
    match serde_json::to_value(value)? {
        Value::Object(row) => Ok(row),
        _ => Err(DataError::NotAnObject),
    }
}

fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, DataError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, DataError> {
    rows.into_iter().map(from_row).collect()
}

async fn find_by_id<T: DeserializeOwned>(
    client: &dyn DataClient,
    table: Table,
    id: Uuid,
) -> Result<T, DataError> {
    let rows = client
        .select(table, SelectQuery::all().eq("id", id.to_string()).limit(1))
        .await?;
    match rows.into_iter().next() {
        Some(row) => from_row(row),
        None => Err(DataError::NotFound { table, id }),
    }
}

// ============================================================================
// Blogs
// ============================================================================

pub async fn list_blogs(client: &dyn DataClient) -> Result<Vec<BlogPost>, DataError> {
    let rows = client
        .select(Table::Blogs, SelectQuery::all().newest_first())
        .await?;
    from_rows(rows)
}

pub async fn get_blog(client: &dyn DataClient, id: Uuid) -> Result<BlogPost, DataError> {
    find_by_id(client, Table::Blogs, id).await
}

pub async fn find_blog_by_slug(
    client: &dyn DataClient,
    slug: &str,
) -> Result<Option<BlogPost>, DataError> {
    let rows = client
        .select(Table::Blogs, SelectQuery::all().eq("slug", slug).limit(1))
        .await?;
    rows.into_iter().next().map(from_row).transpose()
}

/// Published posts only, newest first.
pub async fn list_published_blogs(client: &dyn DataClient) -> Result<Vec<BlogPost>, DataError> {
    let rows = client
        .select(
            Table::Blogs,
            SelectQuery::all()
                .eq("status", BlogStatus::Published.as_str())
                .newest_first(),
        )
        .await?;
    from_rows(rows)
}

pub async fn insert_blog(client: &dyn DataClient, post: &BlogPost) -> Result<BlogPost, DataError> {
    let row = client.insert(Table::Blogs, to_row(post)?).await?;
    from_row(row)
}

/// Overwrite every editable column of the post with `id`. Last write wins.
pub async fn update_blog(
    client: &dyn DataClient,
    id: Uuid,
    post: &BlogPost,
) -> Result<BlogPost, DataError> {
    let mut patch = to_row(post)?;
    for column in ["id", "created_at", "updated_at"] {
        patch.remove(column);
    }
    let row = client.update(Table::Blogs, id, patch).await?;
    from_row(row)
}

pub async fn delete_blog(client: &dyn DataClient, id: Uuid) -> Result<(), DataError> {
    client.delete(Table::Blogs, id).await
}

// ============================================================================
// Contact messages
// ============================================================================

pub async fn list_messages(client: &dyn DataClient) -> Result<Vec<ContactMessage>, DataError> {
    let rows = client
        .select(Table::ContactMessages, SelectQuery::all().newest_first())
        .await?;
    from_rows(rows)
}

pub async fn insert_message(
    client: &dyn DataClient,
    message: &ContactMessage,
) -> Result<ContactMessage, DataError> {
    let row = client
        .insert(Table::ContactMessages, to_row(message)?)
        .await?;
    from_row(row)
}

pub async fn mark_message_read(
    client: &dyn DataClient,
    id: Uuid,
) -> Result<ContactMessage, DataError> {
    let mut patch = Row::new();
    patch.insert(
        "status".to_string(),
        serde_json::to_value(MessageStatus::Read)?,
    );
    let row = client.update(Table::ContactMessages, id, patch).await?;
    from_row(row)
}

// ============================================================================
// Profiles
// ============================================================================

/// Emails are stored lowercased, so the lookup lowercases too.
pub async fn find_profile_by_email(
    client: &dyn DataClient,
    email: &str,
) -> Result<Option<UserProfile>, DataError> {
    let rows = client
        .select(
            Table::Profiles,
            SelectQuery::all()
                .eq("email", email.trim().to_lowercase())
                .limit(1),
        )
        .await?;
    rows.into_iter().next().map(from_row).transpose()
}

pub async fn get_profile(client: &dyn DataClient, id: Uuid) -> Result<UserProfile, DataError> {
    find_by_id(client, Table::Profiles, id).await
}

pub async fn insert_profile(
    client: &dyn DataClient,
    profile: &UserProfile,
) -> Result<UserProfile, DataError> {
    let mut profile = profile.clone();
    profile.email = profile.email.trim().to_lowercase();
    let row = client.insert(Table::Profiles, to_row(&profile)?).await?;
    from_row(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryDataClient;
    use crate::db::models::{NewContactMessage, Role};
    use chrono::Utc;

    fn sample_post(title: &str) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: "sample".to_string(),
            content: "body".to_string(),
            excerpt: String::new(),
            featured_image: String::new(),
            status: BlogStatus::Draft,
            seo_title: String::new(),
            seo_description: String::new(),
            keywords: vec![],
            tags: vec!["Rust".to_string()],
            read_time: 1,
            author_id: Uuid::new_v4(),
            publish_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_blog_crud_round_trip() {
        let client = MemoryDataClient::new();
        let post = insert_blog(&client, &sample_post("First")).await.unwrap();
        assert_eq!(get_blog(&client, post.id).await.unwrap(), post);

        let mut edited = post.clone();
        edited.title = "Second".to_string();
        edited.status = BlogStatus::Published;
        let updated = update_blog(&client, post.id, &edited).await.unwrap();
        assert_eq!(updated.title, "Second");
        assert_eq!(updated.created_at, post.created_at);
        assert!(updated.updated_at >= post.updated_at);

        delete_blog(&client, post.id).await.unwrap();
        assert!(matches!(
            get_blog(&client, post.id).await,
            Err(DataError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_published_listing_and_slug_lookup() {
        let client = MemoryDataClient::new();
        let draft = insert_blog(&client, &sample_post("Draft")).await.unwrap();
        let mut live = sample_post("Live");
        live.slug = "live".to_string();
        live.status = BlogStatus::Published;
        let live = insert_blog(&client, &live).await.unwrap();

        assert_eq!(list_published_blogs(&client).await.unwrap(), vec![live.clone()]);
        assert_eq!(
            find_blog_by_slug(&client, "sample").await.unwrap().map(|p| p.id),
            Some(draft.id)
        );
        assert!(find_blog_by_slug(&client, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_refused_by_the_store() {
        let client = MemoryDataClient::new();
        let first = insert_blog(&client, &sample_post("First")).await.unwrap();
        assert!(matches!(
            insert_blog(&client, &sample_post("Second")).await,
            Err(DataError::Duplicate { column, .. }) if column == "slug"
        ));

        let mut other = sample_post("Other");
        other.slug = "other".to_string();
        let other = insert_blog(&client, &other).await.unwrap();
        let mut clash = other.clone();
        clash.slug = first.slug.clone();
        assert!(matches!(
            update_blog(&client, other.id, &clash).await,
            Err(DataError::Duplicate { .. })
        ));
        // Rewriting a row with its own slug is not a clash
        update_blog(&client, first.id, &first).await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_message_read() {
        let client = MemoryDataClient::new();
        let message = NewContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            service: "consultation".to_string(),
            message: "Hello".to_string(),
        }
        .into_message();
        insert_message(&client, &message).await.unwrap();

        let read = mark_message_read(&client, message.id).await.unwrap();
        assert_eq!(read.status, MessageStatus::Read);
        assert_eq!(list_messages(&client).await.unwrap(), vec![read]);
    }

    #[tokio::test]
    async fn test_find_profile_by_email_is_case_insensitive() {
        let client = MemoryDataClient::new();
        let profile = UserProfile {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: "Admin@Example.com".to_string(),
            role: Role::Admin,
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };
        insert_profile(&client, &profile).await.unwrap();

        let found = find_profile_by_email(&client, "ADMIN@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, profile.id);
        assert_eq!(found.email, "admin@example.com");
        assert!(find_profile_by_email(&client, "nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }
}
