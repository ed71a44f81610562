// /api/assistants/:id/websites, /api/websites/:id and /api/pages/:id
//
// Pages authorize through the two-hop chain page -> website -> assistant.
// Page creation belongs to the crawling pipeline, not this API; the surface
// here is read and delete.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Website, WebsitePage};
use crate::guard::{self, ResourceKind};
use crate::handlers::require_fields;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WebsiteCreate {
    pub domain: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebsiteUpdate {
    pub domain: Option<String>,
}

const WEBSITE_COLUMNS: &str = "id, assistant_id, domain, created_at";
const PAGE_COLUMNS: &str = "id, website_id, path, title, content, fetched_at";

pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(assistant_id): Path<Uuid>,
) -> ApiResult<Vec<Website>> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, assistant_id).await?;

    let websites: Vec<Website> = sqlx::query_as(&format!(
        "SELECT {WEBSITE_COLUMNS} FROM websites WHERE assistant_id = $1 ORDER BY created_at"
    ))
    .bind(assistant_id)
    .fetch_all(state.db.pool())
    .await?;

    Ok(ApiResponse::success(websites))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(assistant_id): Path<Uuid>,
    Json(payload): Json<WebsiteCreate>,
) -> ApiResult<Website> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, assistant_id).await?;
    require_fields(&[("domain", &payload.domain)])?;

    let website: Website = sqlx::query_as(&format!(
        "INSERT INTO websites (assistant_id, domain) VALUES ($1, $2) RETURNING {WEBSITE_COLUMNS}"
    ))
    .bind(assistant_id)
    .bind(payload.domain.trim())
    .fetch_one(state.db.pool())
    .await?;

    Ok(ApiResponse::created(website))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Website> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Website, id).await?;

    let website: Website =
        sqlx::query_as(&format!("SELECT {WEBSITE_COLUMNS} FROM websites WHERE id = $1"))
            .bind(id)
            .fetch_one(state.db.pool())
            .await?;

    Ok(ApiResponse::success(website))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WebsiteUpdate>,
) -> ApiResult<Website> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Website, id).await?;

    let website: Website = sqlx::query_as(&format!(
        "UPDATE websites SET domain = COALESCE($2, domain) \
         WHERE id = $1 RETURNING {WEBSITE_COLUMNS}"
    ))
    .bind(id)
    .bind(payload.domain.as_deref())
    .fetch_one(state.db.pool())
    .await?;

    Ok(ApiResponse::success(website))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Website, id).await?;

    // Pages cascade at the schema level
    sqlx::query("DELETE FROM websites WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;

    Ok(ApiResponse::no_content())
}

pub async fn list_pages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(website_id): Path<Uuid>,
) -> ApiResult<Vec<WebsitePage>> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Website, website_id).await?;

    let pages: Vec<WebsitePage> = sqlx::query_as(&format!(
        "SELECT {PAGE_COLUMNS} FROM website_pages WHERE website_id = $1 ORDER BY path"
    ))
    .bind(website_id)
    .fetch_all(state.db.pool())
    .await?;

    Ok(ApiResponse::success(pages))
}

pub async fn get_page(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<WebsitePage> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::WebsitePage, id).await?;

    let page: WebsitePage =
        sqlx::query_as(&format!("SELECT {PAGE_COLUMNS} FROM website_pages WHERE id = $1"))
            .bind(id)
            .fetch_one(state.db.pool())
            .await?;

    Ok(ApiResponse::success(page))
}

pub async fn delete_page(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::WebsitePage, id).await?;

    sqlx::query("DELETE FROM website_pages WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;

    Ok(ApiResponse::no_content())
}
