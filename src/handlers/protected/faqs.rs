// /api/assistants/:id/faqs and /api/faqs/:id - FAQ CRUD

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Faq;
use crate::guard::{self, ResourceKind};
use crate::handlers::require_fields;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FaqCreate {
    pub question: String,
    pub answer: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub position: i32,
}

fn default_enabled() -> bool {
    true
}

/// Field-mask update; `assistant_id` is not part of the mask, so a FAQ can
/// never be re-homed to another assistant.
#[derive(Debug, Default, Deserialize)]
pub struct FaqUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub enabled: Option<bool>,
    pub position: Option<i32>,
}

const COLUMNS: &str = "id, assistant_id, question, answer, enabled, position, created_at, updated_at";

pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(assistant_id): Path<Uuid>,
) -> ApiResult<Vec<Faq>> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, assistant_id).await?;

    let faqs: Vec<Faq> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM faqs WHERE assistant_id = $1 ORDER BY position, created_at"
    ))
    .bind(assistant_id)
    .fetch_all(state.db.pool())
    .await?;

    Ok(ApiResponse::success(faqs))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(assistant_id): Path<Uuid>,
    Json(payload): Json<FaqCreate>,
) -> ApiResult<Faq> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, assistant_id).await?;
    require_fields(&[("question", &payload.question), ("answer", &payload.answer)])?;

    let faq: Faq = sqlx::query_as(&format!(
        "INSERT INTO faqs (assistant_id, question, answer, enabled, position) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
    ))
    .bind(assistant_id)
    .bind(payload.question.trim())
    .bind(payload.answer.trim())
    .bind(payload.enabled)
    .bind(payload.position)
    .fetch_one(state.db.pool())
    .await?;

    Ok(ApiResponse::created(faq))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Faq> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Faq, id).await?;

    let faq: Faq = sqlx::query_as(&format!("SELECT {COLUMNS} FROM faqs WHERE id = $1"))
        .bind(id)
        .fetch_one(state.db.pool())
        .await?;

    Ok(ApiResponse::success(faq))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FaqUpdate>,
) -> ApiResult<Faq> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Faq, id).await?;

    let faq: Faq = sqlx::query_as(&format!(
        "UPDATE faqs SET \
           question = COALESCE($2, question), \
           answer = COALESCE($3, answer), \
           enabled = COALESCE($4, enabled), \
           position = COALESCE($5, position), \
           updated_at = now() \
         WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(payload.question.as_deref())
    .bind(payload.answer.as_deref())
    .bind(payload.enabled)
    .bind(payload.position)
    .fetch_one(state.db.pool())
    .await?;

    Ok(ApiResponse::success(faq))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Faq, id).await?;

    sqlx::query("DELETE FROM faqs WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;

    Ok(ApiResponse::no_content())
}
