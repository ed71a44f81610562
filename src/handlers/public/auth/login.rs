// POST /auth/login - authenticate a principal and return a JWT

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{self, password, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// Unknown email and wrong password produce the same response.
pub async fn login_post(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user: Option<User> = sqlx::query_as(
        "SELECT id, name, email, password_hash, created_at, updated_at \
         FROM users WHERE email = $1",
    )
    .bind(payload.email.trim())
    .fetch_optional(state.db.pool())
    .await?;

    let user = match user {
        Some(user) => user,
        None => {
            tracing::debug!("login attempt for unknown email");
            return Err(invalid_credentials());
        }
    };

    if !password::verify_password(&payload.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "login attempt with wrong password");
        return Err(invalid_credentials());
    }

    let token = auth::generate_jwt(Claims::new(user.id, user.email.clone()))?;

    Ok(ApiResponse::success(LoginResponse { user, token }))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid email or password")
}
