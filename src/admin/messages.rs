//! Contact-form inbox. Admin role only.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::notify::Notification;
use crate::auth::Session;
use crate::db::models::{ContactMessage, MessageStatus};
use crate::db::{repo, DataClient};
use crate::error::AppError;

#[derive(Debug, Clone, Default)]
pub struct ContactInbox {
    messages: Vec<ContactMessage>,
}

impl ContactInbox {
    /// The role check happens before anything is read from the store.
    pub async fn load(data: &dyn DataClient, session: &Session) -> Result<Self, AppError> {
        session.require_admin()?;

        let messages = repo::list_messages(data).await.map_err(|e| {
            tracing::error!("Error fetching messages: {}", e);
            e
        })?;
        Ok(Self { messages })
    }

    pub fn messages(&self) -> &[ContactMessage] {
        &self.messages
    }

    pub fn get(&self, id: Uuid) -> Option<&ContactMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn unread_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.status == MessageStatus::Unread)
            .count()
    }

    pub async fn mark_as_read(&mut self, data: &dyn DataClient, id: Uuid) -> Notification {
        match repo::mark_message_read(data, id).await {
            Ok(updated) => {
                if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
                    *message = updated;
                }
                Notification::success("Success", "Message marked as read.")
            }
            Err(e) => {
                tracing::error!("Error updating message: {}", e);
                Notification::error("Error", "Failed to update message status.")
            }
        }
    }
}

/// Display name for a contact-form service code; unknown codes pass through.
pub fn service_name(code: &str) -> &str {
    match code {
        "custom-software" => "Custom Software",
        "web-development" => "Web Development",
        "mobile-apps" => "Mobile Apps",
        "cloud-devops" => "Cloud & DevOps",
        "ai-ml" => "AI & Machine Learning",
        "blockchain" => "Blockchain",
        "digital-marketing" => "Digital Marketing",
        "consultation" => "Free Consultation",
        other => other,
    }
}

/// "Mar 5, 2024, 02:30 PM"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryDataClient;
    use crate::db::models::{NewContactMessage, Role};
    use chrono::TimeZone;

    fn session(role: Role) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            email: "someone@akacorptech.com".to_string(),
            name: "Someone".to_string(),
            role,
        }
    }

    async fn seeded() -> (MemoryDataClient, Uuid) {
        let data = MemoryDataClient::new();
        let message = NewContactMessage {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            service: "cloud-devops".to_string(),
            message: "We need a migration plan.".to_string(),
        }
        .into_message();
        repo::insert_message(&data, &message).await.unwrap();
        (data, message.id)
    }

    #[tokio::test]
    async fn test_editor_is_refused() {
        let (data, _) = seeded().await;
        assert!(matches!(
            ContactInbox::load(&data, &session(Role::Editor)).await,
            Err(AppError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_mark_as_read() {
        let (data, id) = seeded().await;
        let mut inbox = ContactInbox::load(&data, &session(Role::Admin)).await.unwrap();
        assert_eq!(inbox.unread_count(), 1);

        let notice = inbox.mark_as_read(&data, id).await;
        assert!(!notice.is_error());
        assert_eq!(inbox.unread_count(), 0);
        assert_eq!(inbox.get(id).unwrap().status, MessageStatus::Read);
    }

    #[tokio::test]
    async fn test_mark_unknown_message_fails_without_changes() {
        let (data, id) = seeded().await;
        let mut inbox = ContactInbox::load(&data, &session(Role::Admin)).await.unwrap();

        let notice = inbox.mark_as_read(&data, Uuid::new_v4()).await;
        assert!(notice.is_error());
        assert_eq!(inbox.get(id).unwrap().status, MessageStatus::Unread);
    }

    #[test]
    fn test_service_name() {
        assert_eq!(service_name("cloud-devops"), "Cloud & DevOps");
        assert_eq!(service_name("consultation"), "Free Consultation");
        assert_eq!(service_name("quantum"), "quantum");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(format_date(&date), "Mar 5, 2024, 02:30 PM");
    }
}
