//! Form state of the blog editor and the save workflow.
//!
//! The editor owns a [`BlogForm`] plus the bits of the stored row the form
//! does not show (id, publish date, creation time). Derived fields are kept in
//! step as the author types: the slug follows the title until it is edited by
//! hand, and the read time follows the content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::derive::{is_valid_slug, read_time, slugify};
use crate::auth::Session;
use crate::db::models::{BlogPost, BlogStatus};
use crate::db::{repo, DataClient, DataError};
use crate::storage::{image, image::ImageFile, StorageClient, StorageError, BLOG_IMAGES_BUCKET};

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Which button the author pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveAction {
    Draft,
    Publish,
    Archive,
    /// Save the edits and leave status and publish date as stored.
    #[serde(skip)]
    Keep,
}

impl SaveAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "draft" => Some(SaveAction::Draft),
            "publish" | "published" => Some(SaveAction::Publish),
            "archive" | "archived" => Some(SaveAction::Archive),
            _ => None,
        }
    }

    pub fn status(self, current: BlogStatus) -> BlogStatus {
        match self {
            SaveAction::Draft => BlogStatus::Draft,
            SaveAction::Publish => BlogStatus::Published,
            SaveAction::Archive => BlogStatus::Archived,
            SaveAction::Keep => current,
        }
    }
}

/// The editable fields of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogForm {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub featured_image: String,
    pub status: BlogStatus,
    pub seo_title: String,
    pub seo_description: String,
    pub keywords: Vec<String>,
    pub tags: Vec<String>,
    pub read_time: i32,
}

impl Default for BlogForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            content: String::new(),
            excerpt: String::new(),
            featured_image: String::new(),
            status: BlogStatus::Draft,
            seo_title: String::new(),
            seo_description: String::new(),
            keywords: Vec::new(),
            tags: Vec::new(),
            read_time: read_time(""),
        }
    }
}

/// Partial edit submitted by a client; absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct BlogEditor {
    id: Option<Uuid>,
    form: BlogForm,
    slug_locked: bool,
    publish_date: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
}

impl BlogEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a stored post. A slug that is not the one its title would
    /// produce was set by hand, so it starts locked.
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            id: Some(post.id),
            form: BlogForm {
                title: post.title.clone(),
                slug: post.slug.clone(),
                content: post.content.clone(),
                excerpt: post.excerpt.clone(),
                featured_image: post.featured_image.clone(),
                status: post.status,
                seo_title: post.seo_title.clone(),
                seo_description: post.seo_description.clone(),
                keywords: post.keywords.clone(),
                tags: post.tags.clone(),
                read_time: read_time(&post.content),
            },
            slug_locked: post.slug != slugify(&post.title),
            publish_date: post.publish_date,
            created_at: Some(post.created_at),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn form(&self) -> &BlogForm {
        &self.form
    }

    pub fn slug_locked(&self) -> bool {
        self.slug_locked
    }

    pub fn publish_date(&self) -> Option<DateTime<Utc>> {
        self.publish_date
    }

    pub fn set_title(&mut self, title: &str) {
        self.form.title = title.to_string();
        if !self.slug_locked {
            self.form.slug = slugify(title);
        }
        if self.form.seo_title.is_empty() {
            self.form.seo_title = title.to_string();
        }
    }

    /// Manual slug edit. Clearing the slug hands it back to the title.
    pub fn set_slug(&mut self, slug: &str) {
        let slug = slugify(slug);
        if slug.is_empty() {
            self.slug_locked = false;
            self.form.slug = slugify(&self.form.title);
        } else {
            self.slug_locked = true;
            self.form.slug = slug;
        }
    }

    pub fn set_content(&mut self, content: &str) {
        self.form.content = content.to_string();
        self.form.read_time = read_time(content);
    }

    pub fn set_excerpt(&mut self, excerpt: &str) {
        self.form.excerpt = excerpt.to_string();
    }

    pub fn set_seo_title(&mut self, seo_title: &str) {
        self.form.seo_title = seo_title.to_string();
    }

    pub fn set_seo_description(&mut self, seo_description: &str) {
        self.form.seo_description = seo_description.to_string();
    }

    pub fn add_tag(&mut self, tag: &str) -> bool {
        insert_unique(&mut self.form.tags, tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        remove_matching(&mut self.form.tags, tag)
    }

    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        insert_unique(&mut self.form.keywords, keyword)
    }

    pub fn remove_keyword(&mut self, keyword: &str) -> bool {
        remove_matching(&mut self.form.keywords, keyword)
    }

    pub fn set_featured_image(&mut self, url: &str) {
        self.form.featured_image = url.trim().to_string();
    }

    pub fn clear_featured_image(&mut self) {
        self.form.featured_image.clear();
    }

    /// Upload `file` and point the featured image at it. On any failure the
    /// current image is kept.
    pub async fn upload_image(
        &mut self,
        storage: &dyn StorageClient,
        session: &Session,
        file: &ImageFile,
    ) -> Result<String, EditorError> {
        let url = upload_featured_image(storage, session, file).await?;
        self.form.featured_image = url.clone();
        Ok(url)
    }

    /// Apply a partial edit through the same setters the form uses.
    ///
    /// Clients send the whole form back, slug included. A slug is only taken
    /// as a manual edit when it differs from both the slug before this edit
    /// and the one the new title produced.
    pub fn apply(&mut self, input: BlogInput) {
        let previous_slug = self.form.slug.clone();

        if let Some(seo_title) = input.seo_title {
            self.set_seo_title(seo_title.trim());
        }
        if let Some(title) = input.title {
            let title = title.trim();
            if title != self.form.title {
                self.set_title(title);
            }
        }
        if let Some(slug) = input.slug {
            let slug = slug.trim();
            if slug != previous_slug && slug != self.form.slug {
                self.set_slug(slug);
            }
        }
        if let Some(content) = input.content {
            self.set_content(&content);
        }
        if let Some(excerpt) = input.excerpt {
            self.set_excerpt(excerpt.trim());
        }
        if let Some(seo_description) = input.seo_description {
            self.set_seo_description(seo_description.trim());
        }
        if let Some(url) = input.featured_image {
            if url.trim().is_empty() {
                self.clear_featured_image();
            } else {
                self.set_featured_image(&url);
            }
        }
        if let Some(tags) = input.tags {
            self.form.tags.clear();
            for tag in &tags {
                self.add_tag(tag);
            }
        }
        if let Some(keywords) = input.keywords {
            self.form.keywords.clear();
            for keyword in &keywords {
                self.add_keyword(keyword);
            }
        }
    }

    /// Build the row that `save` would write.
    pub fn prepare(
        &self,
        author_id: Uuid,
        action: SaveAction,
        now: DateTime<Utc>,
    ) -> Result<BlogPost, EditorError> {
        let title = self.form.title.trim();
        if title.is_empty() {
            return Err(EditorError::Validation("Title is required".to_string()));
        }

        let slug = if self.form.slug.is_empty() {
            slugify(title)
        } else {
            self.form.slug.clone()
        };
        if !is_valid_slug(&slug) {
            return Err(EditorError::Validation(
                "Slug must contain letters or numbers".to_string(),
            ));
        }

        let publish_date = match action {
            SaveAction::Publish => Some(now),
            SaveAction::Draft | SaveAction::Archive | SaveAction::Keep => self.publish_date,
        };

        Ok(BlogPost {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            title: title.to_string(),
            slug,
            content: self.form.content.clone(),
            excerpt: self.form.excerpt.clone(),
            featured_image: self.form.featured_image.clone(),
            status: action.status(self.form.status),
            seo_title: self.form.seo_title.clone(),
            seo_description: self.form.seo_description.clone(),
            keywords: self.form.keywords.clone(),
            tags: self.form.tags.clone(),
            read_time: read_time(&self.form.content),
            author_id,
            publish_date,
            created_at: self.created_at.unwrap_or(now),
            updated_at: now,
        })
    }

    /// Insert a new post or overwrite the existing one. Last write wins.
    pub async fn save(
        &mut self,
        data: &dyn DataClient,
        session: &Session,
        action: SaveAction,
    ) -> Result<BlogPost, EditorError> {
        let post = self.prepare(session.user_id, action, Utc::now())?;

        if let Some(existing) = repo::find_blog_by_slug(data, &post.slug).await? {
            if Some(existing.id) != self.id {
                return Err(duplicate_slug());
            }
        }

        // The store's unique index catches a concurrent save of the same slug
        let saved = match self.id {
            None => repo::insert_blog(data, &post).await,
            Some(id) => repo::update_blog(data, id, &post).await,
        }
        .map_err(|e| match e {
            DataError::Duplicate { .. } => duplicate_slug(),
            e => {
                tracing::error!("Error saving blog: {}", e);
                EditorError::Data(e)
            }
        })?;

        tracing::info!(
            id = %saved.id,
            slug = %saved.slug,
            status = %saved.status,
            author = %session.email,
            "Blog post saved"
        );

        self.id = Some(saved.id);
        self.publish_date = saved.publish_date;
        self.created_at = Some(saved.created_at);
        self.form.slug = saved.slug.clone();
        self.form.status = saved.status;
        self.form.read_time = saved.read_time;
        Ok(saved)
    }
}

fn duplicate_slug() -> EditorError {
    EditorError::Validation("A post with this slug already exists".to_string())
}

/// Validate and store a featured image, returning its public URL.
pub async fn upload_featured_image(
    storage: &dyn StorageClient,
    session: &Session,
    file: &ImageFile,
) -> Result<String, EditorError> {
    let mime = image::validate(file)?;
    let path = image::object_path(session.user_id, Utc::now().timestamp_millis(), mime);

    storage
        .upload(BLOG_IMAGES_BUCKET, &path, &file.bytes, mime)
        .await
        .map_err(|e| {
            tracing::error!("Error uploading image: {}", e);
            e
        })?;

    Ok(storage.public_url(BLOG_IMAGES_BUCKET, &path))
}

/// Append unless an entry equal ignoring case is already there.
fn insert_unique(values: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    let lower = value.to_lowercase();
    if values.iter().any(|v| v.to_lowercase() == lower) {
        return false;
    }
    values.push(value.to_string());
    true
}

fn remove_matching(values: &mut Vec<String>, value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    let before = values.len();
    values.retain(|v| v.to_lowercase() != lower);
    values.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryDataClient;
    use crate::db::models::Role;
    use crate::db::{Row, SelectQuery, Table};
    use async_trait::async_trait;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn session() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            email: "editor@akacorptech.com".to_string(),
            name: "Editor".to_string(),
            role: Role::Editor,
        }
    }

    struct BrokenStorage;

    #[async_trait]
    impl StorageClient for BrokenStorage {
        async fn upload(
            &self,
            _bucket: &str,
            _path: &str,
            _bytes: &[u8],
            _content_type: &str,
        ) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("bucket unavailable")))
        }

        fn public_url(&self, bucket: &str, path: &str) -> String {
            format!("https://cdn.test/{}/{}", bucket, path)
        }
    }

    #[test]
    fn test_new_editor_defaults() {
        let editor = BlogEditor::new();
        assert_eq!(editor.form().status, BlogStatus::Draft);
        assert_eq!(editor.form().read_time, 1);
        assert!(editor.id().is_none());
        assert!(!editor.slug_locked());
    }

    #[test]
    fn test_title_drives_slug_and_fills_seo_title_once() {
        let mut editor = BlogEditor::new();
        editor.set_title("AI Trends in 2024!!");
        assert_eq!(editor.form().slug, "ai-trends-in-2024");
        assert_eq!(editor.form().seo_title, "AI Trends in 2024!!");

        editor.set_title("AI Trends in 2025");
        assert_eq!(editor.form().slug, "ai-trends-in-2025");
        // Already filled, so it keeps the first title
        assert_eq!(editor.form().seo_title, "AI Trends in 2024!!");
    }

    #[test]
    fn test_manual_slug_stops_derivation() {
        let mut editor = BlogEditor::new();
        editor.set_title("First Title");
        editor.set_slug("My Custom Slug");
        assert!(editor.slug_locked());
        assert_eq!(editor.form().slug, "my-custom-slug");

        editor.set_title("Second Title");
        assert_eq!(editor.form().slug, "my-custom-slug");

        editor.set_slug("");
        assert!(!editor.slug_locked());
        assert_eq!(editor.form().slug, "second-title");
    }

    #[test]
    fn test_content_updates_read_time() {
        let mut editor = BlogEditor::new();
        editor.set_content(&vec!["word"; 400].join(" "));
        assert_eq!(editor.form().read_time, 2);
        editor.set_content("");
        assert_eq!(editor.form().read_time, 1);
    }

    #[test]
    fn test_tags_are_case_insensitive_sets() {
        let mut editor = BlogEditor::new();
        assert!(editor.add_tag("Rust"));
        assert!(!editor.add_tag("Rust"));
        assert!(!editor.add_tag("  rust "));
        assert!(!editor.add_tag("   "));
        assert!(editor.add_tag("AI"));
        assert_eq!(editor.form().tags, vec!["Rust", "AI"]);

        assert!(!editor.remove_tag("Blockchain"));
        assert_eq!(editor.form().tags, vec!["Rust", "AI"]);
        assert!(editor.remove_tag("ai"));
        assert_eq!(editor.form().tags, vec!["Rust"]);

        assert!(editor.add_keyword("Cloud"));
        assert!(!editor.add_keyword("CLOUD"));
        assert!(editor.remove_keyword("cloud"));
        assert!(editor.form().keywords.is_empty());
    }

    #[test]
    fn test_apply_ignores_echoed_slug() {
        let mut editor = BlogEditor::new();
        editor.set_title("Old Title");

        // A form post resubmits the slug it was rendered with
        editor.apply(BlogInput {
            title: Some("New Title".to_string()),
            slug: Some("old-title".to_string()),
            ..BlogInput::default()
        });
        assert_eq!(editor.form().slug, "new-title");
        assert!(!editor.slug_locked());

        editor.apply(BlogInput {
            slug: Some("hand-picked".to_string()),
            tags: Some(vec!["AI".into(), "ai".into(), "Cloud".into()]),
            ..BlogInput::default()
        });
        assert_eq!(editor.form().slug, "hand-picked");
        assert!(editor.slug_locked());
        assert_eq!(editor.form().tags, vec!["AI", "Cloud"]);
    }

    #[test]
    fn test_from_post_locks_hand_edited_slug() {
        let mut post = crate::blog::filter::tests::post("Hello World", BlogStatus::Draft, &[]);
        assert!(!BlogEditor::from_post(&post).slug_locked());

        post.slug = "custom".to_string();
        assert!(BlogEditor::from_post(&post).slug_locked());
    }

    #[test]
    fn test_prepare_requires_title() {
        let editor = BlogEditor::new();
        assert!(matches!(
            editor.prepare(Uuid::nil(), SaveAction::Draft, Utc::now()),
            Err(EditorError::Validation(_))
        ));

        let mut editor = BlogEditor::new();
        editor.set_title("!!!");
        assert!(matches!(
            editor.prepare(Uuid::nil(), SaveAction::Draft, Utc::now()),
            Err(EditorError::Validation(_))
        ));
    }

    /// Sees no existing slug on lookup, then loses the insert to another writer.
    struct RacedStore;

    #[async_trait]
    impl DataClient for RacedStore {
        fn backend(&self) -> &'static str {
            "raced"
        }

        async fn ping(&self) -> Result<(), DataError> {
            Ok(())
        }

        async fn select(&self, _table: Table, _query: SelectQuery) -> Result<Vec<Row>, DataError> {
            Ok(vec![])
        }

        async fn insert(&self, table: Table, _record: Row) -> Result<Row, DataError> {
            Err(DataError::Duplicate {
                table,
                column: "slug".to_string(),
            })
        }

        async fn update(&self, table: Table, id: Uuid, _patch: Row) -> Result<Row, DataError> {
            Err(DataError::NotFound { table, id })
        }

        async fn delete(&self, table: Table, id: Uuid) -> Result<(), DataError> {
            Err(DataError::NotFound { table, id })
        }
    }

    #[test]
    fn test_resaving_same_title_keeps_cleared_seo_title() {
        let mut editor = BlogEditor::new();
        editor.set_title("Hello");
        assert_eq!(editor.form().seo_title, "Hello");

        // The form echoes the unchanged title alongside the cleared SEO title
        editor.apply(BlogInput {
            title: Some("Hello".to_string()),
            seo_title: Some(String::new()),
            ..BlogInput::default()
        });
        assert_eq!(editor.form().seo_title, "");

        editor.apply(BlogInput {
            title: Some("Hello again".to_string()),
            ..BlogInput::default()
        });
        assert_eq!(editor.form().seo_title, "Hello again");
    }

    #[test]
    fn test_blank_featured_image_clears_it() {
        let mut editor = BlogEditor::new();
        editor.set_featured_image("https://cdn.test/cover.png");
        editor.apply(BlogInput {
            featured_image: Some("  ".to_string()),
            ..BlogInput::default()
        });
        assert_eq!(editor.form().featured_image, "");
    }

    #[test]
    fn test_keep_leaves_status_and_publish_date() {
        let mut post = crate::blog::filter::tests::post("Live", BlogStatus::Published, &[]);
        let stamped = Utc::now() - chrono::Duration::days(3);
        post.publish_date = Some(stamped);

        let editor = BlogEditor::from_post(&post);
        let kept = editor
            .prepare(post.author_id, SaveAction::Keep, Utc::now())
            .unwrap();
        assert_eq!(kept.status, BlogStatus::Published);
        assert_eq!(kept.publish_date, Some(stamped));

        let republished = editor
            .prepare(post.author_id, SaveAction::Publish, Utc::now())
            .unwrap();
        assert!(republished.publish_date > Some(stamped));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_slug_is_a_validation_error() {
        let mut editor = BlogEditor::new();
        editor.set_title("Same Title");
        match editor.save(&RacedStore, &session(), SaveAction::Draft).await {
            Err(EditorError::Validation(msg)) => {
                assert_eq!(msg, "A post with this slug already exists")
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
        assert!(editor.id().is_none());
    }

    #[tokio::test]
    async fn test_publish_stamps_date_and_draft_never_does() {
        let data = MemoryDataClient::new();
        let session = session();

        let mut editor = BlogEditor::new();
        editor.set_title("Cloud Computing Best Practices");
        editor.set_content("Short post");

        let draft = editor.save(&data, &session, SaveAction::Draft).await.unwrap();
        assert_eq!(draft.status, BlogStatus::Draft);
        assert!(draft.publish_date.is_none());
        assert_eq!(draft.author_id, session.user_id);
        assert_eq!(editor.id(), Some(draft.id));

        let published = editor
            .save(&data, &session, SaveAction::Publish)
            .await
            .unwrap();
        assert_eq!(published.id, draft.id);
        assert_eq!(published.status, BlogStatus::Published);
        assert!(published.publish_date.is_some());

        // Back to draft keeps the stamp
        let redrafted = editor.save(&data, &session, SaveAction::Draft).await.unwrap();
        assert_eq!(redrafted.status, BlogStatus::Draft);
        assert_eq!(redrafted.publish_date, published.publish_date);

        let archived = editor
            .save(&data, &session, SaveAction::Archive)
            .await
            .unwrap();
        assert_eq!(archived.status, BlogStatus::Archived);
        assert_eq!(archived.publish_date, published.publish_date);

        assert_eq!(repo::list_blogs(&data).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let data = MemoryDataClient::new();
        let session = session();

        let mut first = BlogEditor::new();
        first.set_title("Same Title");
        first.save(&data, &session, SaveAction::Draft).await.unwrap();
        // Saving the same post again is fine
        first.save(&data, &session, SaveAction::Draft).await.unwrap();

        let mut second = BlogEditor::new();
        second.set_title("Same Title");
        assert!(matches!(
            second.save(&data, &session, SaveAction::Draft).await,
            Err(EditorError::Validation(_))
        ));
        assert!(second.id().is_none());
    }

    #[tokio::test]
    async fn test_upload_sets_featured_image() {
        let dir = tempfile::tempdir().unwrap();
        let storage = crate::storage::LocalStorage::new(dir.path(), "/storage");
        let session = session();
        let mut editor = BlogEditor::new();

        let url = editor
            .upload_image(
                &storage,
                &session,
                &ImageFile {
                    file_name: "cover.png".to_string(),
                    bytes: PNG.to_vec(),
                },
            )
            .await
            .unwrap();

        assert!(url.starts_with(&format!("/storage/blog-images/{}/", session.user_id)));
        assert!(url.ends_with(".png"));
        assert_eq!(editor.form().featured_image, url);
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_featured_image() {
        let session = session();
        let mut editor = BlogEditor::new();
        editor.set_featured_image("https://cdn.test/old.png");

        let file = ImageFile {
            file_name: "cover.png".to_string(),
            bytes: PNG.to_vec(),
        };
        assert!(matches!(
            editor.upload_image(&BrokenStorage, &session, &file).await,
            Err(EditorError::Storage(StorageError::Io(_)))
        ));
        assert_eq!(editor.form().featured_image, "https://cdn.test/old.png");

        let not_an_image = ImageFile {
            file_name: "notes.txt".to_string(),
            bytes: b"hello".to_vec(),
        };
        assert!(editor
            .upload_image(&BrokenStorage, &session, &not_an_image)
            .await
            .is_err());
        assert_eq!(editor.form().featured_image, "https://cdn.test/old.png");
    }
}
