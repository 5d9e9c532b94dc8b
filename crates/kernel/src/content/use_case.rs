//! Content use case.
//!
//! Each operation forwards to the repository. This is where authorization,
//! auditing or multi-step workflows attach without changing the routes or the
//! storage code.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ContentRepository, Resource};
use crate::error::AppResult;
use crate::models::{ContentInput, ContentItem, ContentList, ContentUpdate};
use crate::pagination::Pagination;

/// Operations the HTTP layer may invoke on one content resource.
#[async_trait]
pub trait ContentUseCase: Send + Sync {
    fn resource(&self) -> Resource;

    async fn create(&self, input: ContentInput) -> AppResult<ContentItem>;

    /// Update the item at `id` with the body fields of `input`.
    async fn update(&self, id: Uuid, input: ContentInput) -> AppResult<ContentItem>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<ContentItem>;

    async fn get_all(
        &self,
        title: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<ContentList>;
}

/// Default use case over any [`ContentRepository`].
#[derive(Clone)]
pub struct ContentService {
    repository: Arc<dyn ContentRepository>,
}

impl ContentService {
    /// Create a new content service.
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ContentUseCase for ContentService {
    fn resource(&self) -> Resource {
        self.repository.resource()
    }

    async fn create(&self, input: ContentInput) -> AppResult<ContentItem> {
        self.repository.create(&input).await
    }

    async fn update(&self, id: Uuid, input: ContentInput) -> AppResult<ContentItem> {
        self.repository
            .update(&ContentUpdate::new(id, input))
            .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<ContentItem> {
        self.repository.get_by_id(id).await
    }

    async fn get_all(
        &self,
        title: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<ContentList> {
        self.repository.get_all(title, pagination).await
    }
}
