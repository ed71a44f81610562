// /api/assistants/:id/conversations and /api/conversations/:id
//
// Listing is always scoped to an assistant the caller owns; there is no
// unscoped conversation query anywhere in this API.

use axum::extract::{Path, State};
use axum::Extension;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Conversation, Message};
use crate::guard::{self, ResourceKind};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

const COLUMNS: &str = "id, assistant_id, visitor_label, started_at";

pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(assistant_id): Path<Uuid>,
) -> ApiResult<Vec<Conversation>> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Assistant, assistant_id).await?;

    let conversations: Vec<Conversation> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM conversations WHERE assistant_id = $1 ORDER BY started_at DESC"
    ))
    .bind(assistant_id)
    .fetch_all(state.db.pool())
    .await?;

    Ok(ApiResponse::success(conversations))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<ConversationDetail> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Conversation, id).await?;

    let conversation: Conversation =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM conversations WHERE id = $1"))
            .bind(id)
            .fetch_one(state.db.pool())
            .await?;

    let messages: Vec<Message> = sqlx::query_as(
        "SELECT id, conversation_id, role, content, created_at \
         FROM messages WHERE conversation_id = $1 ORDER BY created_at",
    )
    .bind(id)
    .fetch_all(state.db.pool())
    .await?;

    Ok(ApiResponse::success(ConversationDetail {
        conversation,
        messages,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    guard::authorize(&state.db, auth.user_id, ResourceKind::Conversation, id).await?;

    // Messages cascade at the schema level
    sqlx::query("DELETE FROM conversations WHERE id = $1")
        .bind(id)
        .execute(state.db.pool())
        .await?;

    Ok(ApiResponse::no_content())
}
