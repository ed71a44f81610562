// /api/assistants/:id/contact-forms and /api/contact-forms/:id

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::ContactForm;
use crate::guard::{self, ResourceKind};
use crate::handlers::require_fields;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ContactFormCreate {
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactFormUpdate {
    pub title: Option<String>,
    pub prompt: Option<String>,
    pub enabled: Option<bool>,
}

const COLUMNS: &str = "id, assistant_id, title, prompt, enabled, created_at, updated_at";

pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(assistant_id): Path<Uuid>,
) -> ApiResult<Vec<ContactForm>> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, assistant_id).await?;

    let forms: Vec<ContactForm> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM contact_forms WHERE assistant_id = $1 ORDER BY created_at"
    ))
    .bind(assistant_id)
    .fetch_all(state.db.pool())
    .await?;

    Ok(ApiResponse::success(forms))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(assistant_id): Path<Uuid>,
    Json(payload): Json<ContactFormCreate>,
) -> ApiResult<ContactForm> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, assistant_id).await?;
    require_fields(&[("title", &payload.title)])?;

    let form: ContactForm = sqlx::query_as(&format!(
        "INSERT INTO contact_forms (assistant_id, title, prompt, enabled) \
         VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
    ))
    .bind(assistant_id)
    .bind(payload.title.trim())
    .bind(&payload.prompt)
    .bind(payload.enabled)
    .fetch_one(state.db.pool())
    .await?;

    Ok(ApiResponse::created(form))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<ContactForm> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::ContactForm, id).await?;

    let form: ContactForm =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM contact_forms WHERE id = $1"))
            .bind(id)
            .fetch_one(state.db.pool())
            .await?;

    Ok(ApiResponse::success(form))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContactFormUpdate>,
) -> ApiResult<ContactForm> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::ContactForm, id).await?;

    let form: ContactForm = sqlx::query_as(&format!(
        "UPDATE contact_forms SET \
           title = COALESCE($2, title), \
           prompt = COALESCE($3, prompt), \
           enabled = COALESCE($4, enabled), \
           updated_at = now() \
         WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(payload.title.as_deref())
    .bind(payload.prompt.as_deref())
    .bind(payload.enabled)
    .fetch_one(state.db.pool())
    .await?;

    Ok(ApiResponse::success(form))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::ContactForm, id).await?;

    sqlx::query("DELETE FROM contact_forms WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;

    Ok(ApiResponse::no_content())
}
