//! Content persistence.
//!
//! [`PgContentRepository`] issues one statement per call and keeps no state
//! beyond the pool handle. Listing is two reads (count, then page) outside a
//! transaction, so under concurrent writes the count and the page may come
//! from slightly different snapshots.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::Resource;
use crate::error::{AppError, AppResult};
use crate::models::{ContentInput, ContentItem, ContentList, ContentUpdate};
use crate::pagination::Pagination;

/// Columns selected for every read.
const COLUMNS: &str = "id, title, content, created_at";

/// Storage operations for one content resource.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Resource this repository serves.
    fn resource(&self) -> Resource;

    /// Insert a new row with a fresh identifier.
    async fn create(&self, input: &ContentInput) -> AppResult<ContentItem>;

    /// Overwrite title and content of an existing row.
    async fn update(&self, update: &ContentUpdate) -> AppResult<ContentItem>;

    /// Remove a row permanently.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<ContentItem>;

    /// Page through rows ordered by creation time, optionally keeping only
    /// titles that contain `title` (case-insensitive).
    async fn get_all(
        &self,
        title: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<ContentList>;
}

/// PostgreSQL-backed repository.
#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
    resource: Resource,
}

impl PgContentRepository {
    pub fn new(pool: PgPool, resource: Resource) -> Self {
        Self { pool, resource }
    }

    fn fail(&self, operation: &str) -> impl FnOnce(sqlx::Error) -> AppError {
        let operation = self.resource.operation(operation);
        move |e| AppError::persistence(operation, e)
    }
}

#[async_trait]
impl ContentRepository for PgContentRepository {
    fn resource(&self) -> Resource {
        self.resource
    }

    async fn create(&self, input: &ContentInput) -> AppResult<ContentItem> {
        let query = format!(
            "INSERT INTO {} (id, title, content) VALUES ($1, $2, $3) RETURNING {COLUMNS}",
            self.resource.table()
        );

        sqlx::query_as::<_, ContentItem>(&query)
            .bind(Uuid::now_v7())
            .bind(&input.title)
            .bind(&input.content)
            .fetch_one(&self.pool)
            .await
            .map_err(self.fail("create"))
    }

    async fn update(&self, update: &ContentUpdate) -> AppResult<ContentItem> {
        let query = format!(
            "UPDATE {} SET title = $1, content = $2 WHERE id = $3 RETURNING {COLUMNS}",
            self.resource.table()
        );

        sqlx::query_as::<_, ContentItem>(&query)
            .bind(&update.title)
            .bind(&update.content)
            .bind(update.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(self.fail("update"))?
            .ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let query = format!("DELETE FROM {} WHERE id = $1", self.resource.table());

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(self.fail("delete"))?;

        // Deleting a missing row is not a storage error; report it here.
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<ContentItem> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE id = $1",
            self.resource.table()
        );

        sqlx::query_as::<_, ContentItem>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(self.fail("get_by_id"))?
            .ok_or(AppError::NotFound)
    }

    async fn get_all(
        &self,
        title: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<ContentList> {
        let pattern = filter_pattern(title);
        let filtered = pattern.is_some();

        let count_query = count_sql(self.resource.table(), filtered);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(p) = &pattern {
            count = count.bind(p);
        }
        let total_count = count
            .fetch_one(&self.pool)
            .await
            .map_err(self.fail("get_all.count"))?;

        if !needs_page_query(total_count, pagination) {
            return Ok(ContentList::new(Vec::new(), total_count, pagination));
        }

        let page_query = page_sql(self.resource.table(), filtered);
        let mut page = sqlx::query_as::<_, ContentItem>(&page_query);
        if let Some(p) = &pattern {
            page = page.bind(p);
        }
        let items = page
            .bind(pagination.offset())
            .bind(pagination.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(self.fail("get_all.page"))?;

        Ok(ContentList::new(items, total_count, pagination))
    }
}

/// COUNT query; the title pattern, when present, is `$1`.
fn count_sql(table: &str, filtered: bool) -> String {
    let mut query = format!("SELECT COUNT(*) FROM {table} WHERE 1=1");
    if filtered {
        query.push_str(" AND title ILIKE $1 ESCAPE '\\'");
    }
    query
}

/// Page query; binds are the optional title pattern, then offset, then limit.
fn page_sql(table: &str, filtered: bool) -> String {
    let mut query = format!("SELECT {COLUMNS} FROM {table} WHERE 1=1");
    let mut param_idx = 1;

    if filtered {
        query.push_str(&format!(" AND title ILIKE ${param_idx} ESCAPE '\\'"));
        param_idx += 1;
    }

    query.push_str(&format!(
        " ORDER BY created_at ASC, id ASC OFFSET ${} LIMIT ${}",
        param_idx,
        param_idx + 1
    ));
    query
}

/// Bound value for the title filter. An absent or empty filter matches
/// everything, so no predicate is added at all.
fn filter_pattern(title: Option<&str>) -> Option<String> {
    title.filter(|t| !t.is_empty()).map(like_pattern)
}

/// Whether the window can contain rows. An empty table, or a page past the
/// end, is answered from the count alone.
fn needs_page_query(total_count: i64, pagination: &Pagination) -> bool {
    total_count > 0 && pagination.offset() < total_count
}

/// `%filter%` with LIKE metacharacters in `filter` escaped.
fn like_pattern(filter: &str) -> String {
    format!("%{}%", escape_like_wildcards(filter))
}

fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
