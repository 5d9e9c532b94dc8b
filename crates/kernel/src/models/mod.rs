//! Database models.

pub mod content_item;

pub use content_item::{ContentInput, ContentItem, ContentList, ContentUpdate};
