//! Content item model.
//!
//! Blog posts and news articles are stored in separate tables but share this
//! shape. The table a record lives in is decided by its [`Resource`].
//!
//! [`Resource`]: crate::content::Resource

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pagination::Pagination;

/// Stored content record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContentItem {
    /// Unique identifier (UUIDv7), assigned on insert.
    pub id: Uuid,

    pub title: String,

    pub content: String,

    /// Set by the database on insert, never changed afterwards.
    pub created_at: DateTime<Utc>,
}

/// Client-supplied fields for create and update.
///
/// Any `id` or `created_at` in the request body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Update target: path identifier merged with body fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpdate {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

impl ContentUpdate {
    pub fn new(id: Uuid, input: ContentInput) -> Self {
        Self {
            id,
            title: input.title,
            content: input.content,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentList {
    /// Rows matching the filter, regardless of the window.
    pub total_count: i64,
    pub total_pages: i64,
    pub page: i64,
    pub size: i64,
    pub has_more: bool,
    pub items: Vec<ContentItem>,
}

impl ContentList {
    /// Assemble a page, deriving the metadata from `pagination`.
    pub fn new(items: Vec<ContentItem>, total_count: i64, pagination: &Pagination) -> Self {
        Self {
            total_count,
            total_pages: pagination.total_pages(total_count),
            page: pagination.page(),
            size: pagination.size(),
            has_more: pagination.has_more(total_count),
            items,
        }
    }

    /// A page with no rows.
    pub fn empty(pagination: &Pagination) -> Self {
        Self::new(Vec::new(), 0, pagination)
    }
}
