// /api/assistants/:id/documents and /api/documents/:id - document metadata CRUD
//
// Parsing and embedding happen in a separate pipeline; records are stored
// here in `pending` status with a content digest for change detection.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::database::models::Document;
use crate::guard::{self, ResourceKind};
use crate::handlers::require_fields;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DocumentCreate {
    pub filename: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentUpdate {
    pub filename: Option<String>,
    pub content: Option<String>,
}

const COLUMNS: &str =
    "id, assistant_id, filename, content, content_hash, status, created_at, updated_at";

pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(assistant_id): Path<Uuid>,
) -> ApiResult<Vec<Document>> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, assistant_id).await?;

    let documents: Vec<Document> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM documents WHERE assistant_id = $1 ORDER BY created_at"
    ))
    .bind(assistant_id)
    .fetch_all(state.db.pool())
    .await?;

    Ok(ApiResponse::success(documents))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(assistant_id): Path<Uuid>,
    Json(payload): Json<DocumentCreate>,
) -> ApiResult<Document> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, assistant_id).await?;
    require_fields(&[("filename", &payload.filename)])?;

    let document: Document = sqlx::query_as(&format!(
        "INSERT INTO documents (assistant_id, filename, content, content_hash) \
         VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
    ))
    .bind(assistant_id)
    .bind(payload.filename.trim())
    .bind(&payload.content)
    .bind(content_digest(&payload.content))
    .fetch_one(state.db.pool())
    .await?;

    Ok(ApiResponse::created(document))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Document> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Document, id).await?;

    let document: Document =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM documents WHERE id = $1"))
            .bind(id)
            .fetch_one(state.db.pool())
            .await?;

    Ok(ApiResponse::success(document))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DocumentUpdate>,
) -> ApiResult<Document> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Document, id).await?;

    // The digest tracks the content mask: recomputed exactly when content is present
    let digest = payload.content.as_deref().map(content_digest);

    let document: Document = sqlx::query_as(&format!(
        "UPDATE documents SET \
           filename = COALESCE($2, filename), \
           content = COALESCE($3, content), \
           content_hash = COALESCE($4, content_hash), \
           updated_at = now() \
         WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(payload.filename.as_deref())
    .bind(payload.content.as_deref())
    .bind(digest)
    .fetch_one(state.db.pool())
    .await?;

    Ok(ApiResponse::success(document))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Document, id).await?;

    sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;

    Ok(ApiResponse::no_content())
}

fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
