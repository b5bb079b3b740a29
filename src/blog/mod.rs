//! Blog authoring: derived fields, the editor form and list filtering.

pub mod derive;
pub mod editor;
pub mod filter;
