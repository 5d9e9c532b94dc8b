//! Content CRUD route handlers.
//!
//! One router per resource, mounted at `/v1/{resource}`:
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | POST | `/v1/{resource}` | 201 + item |
//! | GET | `/v1/{resource}?title=&page=&size=` | 200 + page |
//! | GET | `/v1/{resource}/{id}` | 200 + item |
//! | PUT | `/v1/{resource}/{id}` | 200 + item |
//! | DELETE | `/v1/{resource}/{id}` | 204 |

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::helpers::{RequestContext, parse_id};
use crate::content::ContentUseCase;
use crate::content::sanitize::prepare_input;
use crate::error::{AppError, AppResult};
use crate::models::{ContentInput, ContentItem, ContentList};
use crate::pagination::Pagination;

type UseCase = Arc<dyn ContentUseCase>;

/// Query parameters for listing. Kept as raw strings so malformed numbers
/// produce the uniform error body.
#[derive(Debug, Default, Deserialize)]
pub struct ListContentQuery {
    pub title: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

/// Create the router for the resource served by `use_case`.
pub fn router<S>(use_case: UseCase) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let resource = use_case.resource();
    Router::new()
        .route(
            &resource.collection_path(),
            get(list_content).post(create_content),
        )
        .route(
            &resource.member_path(),
            get(get_content).put(update_content).delete(delete_content),
        )
        .with_state(use_case)
}

/// Path id, with extractor failures reported like any other bad id.
fn read_id(path: Result<Path<String>, PathRejection>) -> AppResult<Uuid> {
    let Path(raw_id) = path.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    parse_id(&raw_id)
}

fn read_payload(payload: Result<Json<ContentInput>, JsonRejection>) -> AppResult<ContentInput> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

async fn create_content(
    State(use_case): State<UseCase>,
    ctx: RequestContext,
    payload: Result<Json<ContentInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ContentItem>)> {
    let resource = use_case.resource();
    let fail = |e| ctx.fail(resource.slug(), e);

    let input = read_payload(payload).and_then(prepare_input).map_err(fail)?;
    let item = use_case.create(input).await.map_err(fail)?;

    info!(resource = %resource, id = %item.id, "content created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_content(
    State(use_case): State<UseCase>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<ContentInput>, JsonRejection>,
) -> AppResult<Json<ContentItem>> {
    let resource = use_case.resource();
    let fail = |e| ctx.fail(resource.slug(), e);

    let id = read_id(path).map_err(fail)?;
    let input = read_payload(payload).and_then(prepare_input).map_err(fail)?;
    let item = use_case.update(id, input).await.map_err(fail)?;

    info!(resource = %resource, id = %item.id, "content updated");
    Ok(Json(item))
}

async fn delete_content(
    State(use_case): State<UseCase>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<StatusCode> {
    let resource = use_case.resource();
    let fail = |e| ctx.fail(resource.slug(), e);

    let id = read_id(path).map_err(fail)?;
    use_case.delete(id).await.map_err(fail)?;

    info!(resource = %resource, %id, "content deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_content(
    State(use_case): State<UseCase>,
    ctx: RequestContext,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<ContentItem>> {
    let resource = use_case.resource();
    let fail = |e| ctx.fail(resource.slug(), e);

    let id = read_id(path).map_err(fail)?;
    let item = use_case.get_by_id(id).await.map_err(fail)?;

    Ok(Json(item))
}

async fn list_content(
    State(use_case): State<UseCase>,
    ctx: RequestContext,
    query: Result<Query<ListContentQuery>, QueryRejection>,
) -> AppResult<Json<ContentList>> {
    let resource = use_case.resource();
    let fail = |e| ctx.fail(resource.slug(), e);

    let Query(query) = query
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
        .map_err(fail)?;
    let pagination =
        Pagination::from_query(query.page.as_deref(), query.size.as_deref()).map_err(fail)?;

    let list = use_case
        .get_all(query.title.as_deref(), &pagination)
        .await
        .map_err(fail)?;

    Ok(Json(list))
}
