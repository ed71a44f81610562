// /api/assistants - assistant CRUD for the authenticated principal

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Assistant;
use crate::guard::{self, ResourceKind};
use crate::handlers::require_fields;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssistantCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub welcome_message: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Field-mask update: absent fields stay untouched. Ownership (user_id) is
/// not part of the mask and cannot be moved.
#[derive(Debug, Default, Deserialize)]
pub struct AssistantUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub welcome_message: Option<String>,
    pub enabled: Option<bool>,
}

const COLUMNS: &str = "id, user_id, name, description, welcome_message, enabled, created_at, updated_at";

pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<Assistant>> {
    let assistants: Vec<Assistant> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM assistants WHERE user_id = $1 ORDER BY created_at"
    ))
    .bind(auth.user_id)
    .fetch_all(state.db.pool())
    .await?;

    Ok(ApiResponse::success(assistants))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<AssistantCreate>,
) -> ApiResult<Assistant> {
    require_fields(&[("name", &payload.name)])?;

    let assistant: Assistant = sqlx::query_as(&format!(
        "INSERT INTO assistants (user_id, name, description, welcome_message, enabled) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
    ))
    .bind(auth.user_id)
    .bind(payload.name.trim())
    .bind(&payload.description)
    .bind(&payload.welcome_message)
    .bind(payload.enabled)
    .fetch_one(state.db.pool())
    .await?;

    Ok(ApiResponse::created(assistant))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Assistant> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, id).await?;

    let assistant: Assistant =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM assistants WHERE id = $1"))
            .bind(id)
            .fetch_one(state.db.pool())
            .await?;

    Ok(ApiResponse::success(assistant))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssistantUpdate>,
) -> ApiResult<Assistant> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, id).await?;

    let assistant: Assistant = sqlx::query_as(&format!(
        "UPDATE assistants SET \
           name = COALESCE($2, name), \
           description = COALESCE($3, description), \
           welcome_message = COALESCE($4, welcome_message), \
           enabled = COALESCE($5, enabled), \
           updated_at = now() \
         WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(payload.name.as_deref())
    .bind(payload.description.as_deref())
    .bind(payload.welcome_message.as_deref())
    .bind(payload.enabled)
    .fetch_one(state.db.pool())
    .await?;

    Ok(ApiResponse::success(assistant))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, id).await?;

    // Owned sub-resources cascade at the schema level
    sqlx::query("DELETE FROM assistants WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;

    Ok(ApiResponse::no_content())
}
