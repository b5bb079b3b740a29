//! Admin panel views: dashboard, blog list and contact inbox.

pub mod blogs;
pub mod dashboard;
pub mod messages;
pub mod notify;

pub use notify::{NoticeQuery, Notification};
