//! The public marketing site.

pub mod content;
