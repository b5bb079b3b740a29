//! Transient success/error messages shown after an admin action.
//!
//! HTML forms follow the post/redirect/get pattern, so a notification rides
//! along on the redirect as query parameters and is rendered once by the next
//! page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    /// `path?notice=..&title=..&description=..`, appended to any query `path`
    /// already has.
    pub fn redirect_target(&self, path: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("notice", self.kind.as_str())
            .append_pair("title", &self.title)
            .append_pair("description", &self.description)
            .finish();
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{}{}", path, separator, query)
    }
}

/// Query parameters written by [`Notification::redirect_target`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl NoticeQuery {
    pub fn notification(&self) -> Option<Notification> {
        let kind = match self.notice.as_deref()? {
            "success" => NoticeKind::Success,
            "error" => NoticeKind::Error,
            _ => return None,
        };
        Some(Notification {
            kind,
            title: self.title.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
        })
    }
}
