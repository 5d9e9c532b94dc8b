//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::content::{ContentService, ContentUseCase, PgContentRepository, Resource};
use crate::db;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap. Nothing in here is mutated
/// after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Version reported by the health check.
    version: String,

    /// Blog post use case.
    blogs: Arc<dyn ContentUseCase>,

    /// News article use case.
    news: Arc<dyn ContentUseCase>,
}

impl AppState {
    /// Connect to the database, apply migrations, and wire the services.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        if config.run_migrations {
            db::run_migrations(&db)
                .await
                .context("failed to run migrations")?;
            info!("database migrations applied");
        }

        Ok(Self::from_pool(db, &config.app_version))
    }

    /// Wire the services over an existing pool.
    pub fn from_pool(db: PgPool, version: &str) -> Self {
        let use_case = |resource: Resource| -> Arc<dyn ContentUseCase> {
            let repository = PgContentRepository::new(db.clone(), resource);
            Arc::new(ContentService::new(Arc::new(repository)))
        };

        let blogs = use_case(Resource::BLOGS);
        let news = use_case(Resource::NEWS);

        Self {
            inner: Arc::new(AppStateInner {
                db,
                version: version.to_string(),
                blogs,
                news,
            }),
        }
    }

    /// Get the database pool.
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub fn version(&self) -> &str {
        &self.inner.version
    }

    /// Get the blog post use case.
    pub fn blogs(&self) -> &Arc<dyn ContentUseCase> {
        &self.inner.blogs
    }

    /// Get the news article use case.
    pub fn news(&self) -> &Arc<dyn ContentUseCase> {
        &self.inner.news
    }

    /// Use cases for every mounted resource.
    pub fn content_use_cases(&self) -> [Arc<dyn ContentUseCase>; 2] {
        [self.blogs().clone(), self.news().clone()]
    }

    /// Check if PostgreSQL is reachable.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
