// GET /api/auth/whoami - current principal details

use axum::extract::State;
use axum::Extension;

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub async fn whoami(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<User> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(auth.user_id)
    .fetch_optional(state.db.pool())
    .await?;

    // A live token for a deleted account is still unauthenticated
    user.map(ApiResponse::success)
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))
}
