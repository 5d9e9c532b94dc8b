#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Two harnesses:
//!
//! - [`MemoryApp`]: the REAL content routes and use case over an in-memory
//!   repository. Needs no database.
//! - [`TestApp`]: the REAL kernel state and router against PostgreSQL
//!   (`DATABASE_URL`). Shared by every test via [`shared_app`].
//!
//! ## Runtime Safety
//!
//! The shared `TestApp` is initialized on a long-lived, multi-threaded Tokio
//! runtime that outlives any individual test, so pool connections opened
//! during initialization stay valid for later tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use newsdesk_kernel::content::{ContentRepository, ContentService, Resource};
use newsdesk_kernel::models::{ContentInput, ContentItem, ContentList, ContentUpdate};
use newsdesk_kernel::pagination::Pagination;
use newsdesk_kernel::{AppError, AppResult, AppState, Config, routes};
use newsdesk_test_utils::unique_marker;

// =============================================================================
// In-memory harness
// =============================================================================

/// Repository keeping rows in insertion order.
pub struct MemoryRepository {
    resource: Resource,
    rows: Mutex<Vec<ContentItem>>,
}

impl MemoryRepository {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ContentRepository for MemoryRepository {
    fn resource(&self) -> Resource {
        self.resource
    }

    async fn create(&self, input: &ContentInput) -> AppResult<ContentItem> {
        let item = ContentItem {
            id: Uuid::now_v7(),
            title: input.title.clone(),
            content: input.content.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn update(&self, update: &ContentUpdate) -> AppResult<ContentItem> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == update.id)
            .ok_or(AppError::NotFound)?;
        row.title = update.title.clone();
        row.content = update.content.clone();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<ContentItem> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn get_all(
        &self,
        title: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<ContentList> {
        let needle = title.filter(|t| !t.is_empty()).map(str::to_lowercase);
        let mut matching: Vec<ContentItem> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                needle
                    .as_ref()
                    .is_none_or(|n| r.title.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        matching.sort_by_key(|r| (r.created_at, r.id));

        let total_count = matching.len() as i64;
        if total_count == 0 {
            return Ok(ContentList::empty(pagination));
        }

        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit()).unwrap_or(0);
        let items = matching.into_iter().skip(offset).take(limit).collect();

        Ok(ContentList::new(items, total_count, pagination))
    }
}

/// Repository whose every call fails with the given storage error.
pub struct FailingRepository {
    resource: Resource,
    make_error: fn() -> sqlx::Error,
}

impl FailingRepository {
    pub fn new(resource: Resource, make_error: fn() -> sqlx::Error) -> Self {
        Self {
            resource,
            make_error,
        }
    }

    fn fail<T>(&self, operation: &str) -> AppResult<T> {
        Err(AppError::persistence(
            self.resource.operation(operation),
            (self.make_error)(),
        ))
    }
}

#[async_trait]
impl ContentRepository for FailingRepository {
    fn resource(&self) -> Resource {
        self.resource
    }

    async fn create(&self, _input: &ContentInput) -> AppResult<ContentItem> {
        self.fail("create")
    }

    async fn update(&self, _update: &ContentUpdate) -> AppResult<ContentItem> {
        self.fail("update")
    }

    async fn delete(&self, _id: Uuid) -> AppResult<()> {
        self.fail("delete")
    }

    async fn get_by_id(&self, _id: Uuid) -> AppResult<ContentItem> {
        self.fail("get_by_id")
    }

    async fn get_all(
        &self,
        _title: Option<&str>,
        _pagination: &Pagination,
    ) -> AppResult<ContentList> {
        self.fail("get_all.count")
    }
}

/// The real content routes for both resources over in-memory storage.
pub struct MemoryApp {
    router: Router,
    pub blogs: Arc<MemoryRepository>,
    pub news: Arc<MemoryRepository>,
}

impl MemoryApp {
    pub fn new() -> Self {
        let blogs = Arc::new(MemoryRepository::new(Resource::BLOGS));
        let news = Arc::new(MemoryRepository::new(Resource::NEWS));

        let router = Router::new()
            .merge(routes::content::router(Arc::new(ContentService::new(
                blogs.clone(),
            ))))
            .merge(routes::content::router(Arc::new(ContentService::new(
                news.clone(),
            ))));

        Self {
            router,
            blogs,
            news,
        }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        send(&self.router, request).await
    }
}

/// Routes for `resource` backed by a repository that always fails.
pub fn failing_router(resource: Resource, make_error: fn() -> sqlx::Error) -> Router {
    let repository = Arc::new(FailingRepository::new(resource, make_error));
    routes::content::router(Arc::new(ContentService::new(repository)))
}

// =============================================================================
// PostgreSQL harness
// =============================================================================

/// Shared Tokio runtime that outlives all individual test runtimes.
pub static SHARED_RT: std::sync::LazyLock<tokio::runtime::Runtime> =
    std::sync::LazyLock::new(|| {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to build shared test runtime")
    });

/// Global shared test app, initialized once on the shared runtime and reused
/// by every test. `None` when `DATABASE_URL` is not configured.
static SHARED_APP: std::sync::OnceLock<Option<TestApp>> = std::sync::OnceLock::new();

/// Get a reference to the shared [`TestApp`], or `None` (with a note on
/// stderr) when no database is configured.
pub fn shared_app() -> Option<&'static TestApp> {
    SHARED_APP
        .get_or_init(|| {
            dotenvy::dotenv().ok();
            if std::env::var("DATABASE_URL").is_err() {
                eprintln!("DATABASE_URL not set; skipping PostgreSQL tests");
                return None;
            }
            let handle = SHARED_RT.handle().clone();
            let app = std::thread::spawn(move || handle.block_on(TestApp::new()))
                .join()
                .expect("TestApp init thread panicked");
            Some(app)
        })
        .as_ref()
}

/// Run an async test body on [`SHARED_RT`].
pub fn run_test<F: std::future::Future<Output = ()> + Send>(f: F) {
    SHARED_RT.block_on(f);
}

/// Run `body` with a fresh marker, then delete every row tagged with it.
///
/// The body runs as its own task so a failed assertion still reaches the
/// cleanup; the panic is re-raised afterwards.
pub fn run_with_cleanup<F, Fut>(app: &'static TestApp, prefix: &str, body: F)
where
    F: FnOnce(String) -> Fut + Send,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let marker = unique_marker(prefix);
    run_test(async move {
        let outcome = tokio::spawn(body(marker.clone())).await;
        app.cleanup(&marker).await;

        if let Err(err) = outcome {
            if err.is_panic() {
                std::panic::resume_unwind(err.into_panic());
            }
            panic!("test task failed: {err}");
        }
    });
}

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub db: PgPool,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with full kernel initialization.
    pub async fn new() -> Self {
        let config = Config::from_env().expect("Failed to load config");

        // Runs the embedded migrations too.
        let state = AppState::new(&config)
            .await
            .expect("Failed to initialize AppState");

        let db = state.db().clone();
        let router = routes::app_router(state.clone());

        Self { router, db, state }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        send(&self.router, request).await
    }

    /// Remove rows whose title contains `marker` from every content table.
    pub async fn cleanup(&self, marker: &str) {
        for resource in Resource::ALL {
            let query = format!("DELETE FROM {} WHERE title LIKE $1", resource.table());
            sqlx::query(&query)
                .bind(format!("%{marker}%"))
                .execute(&self.db)
                .await
                .ok();
        }
    }
}

// =============================================================================
// Request helpers
// =============================================================================

async fn send(router: &Router, request: Request<Body>) -> Response {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request")
}

/// Build a JSON request.
pub fn json_request(method: &str, uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Build a body-less request.
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as raw bytes.
pub async fn response_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}
