// POST /auth/register - create a principal account

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{self, password, Claims};
use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::require_fields;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub token: String,
}

pub async fn register_post(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    require_fields(&[("name", &payload.name), ("email", &payload.email)])?;

    if !is_plausible_email(&payload.email) {
        return Err(ApiError::validation_error(
            "Invalid field format",
            Some(
                [("email".to_string(), "Invalid email format".to_string())]
                    .into_iter()
                    .collect(),
            ),
        ));
    }

    if let Err(violation) = password::check_password_policy(&payload.password) {
        return Err(ApiError::validation_error(
            "Invalid field format",
            Some(
                [("password".to_string(), violation.message())]
                    .into_iter()
                    .collect(),
            ),
        ));
    }

    let password_hash = password::hash_password(&payload.password)?;

    let inserted: Result<User, sqlx::Error> = sqlx::query_as(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) \
         RETURNING id, name, email, password_hash, created_at, updated_at",
    )
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(&password_hash)
    .fetch_one(state.db.pool())
    .await;

    let user = match inserted {
        Ok(user) => user,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return Err(ApiError::conflict("An account with that email already exists"));
        }
        Err(other) => return Err(other.into()),
    };

    let token = auth::generate_jwt(Claims::new(user.id, user.email.clone()))?;

    tracing::info!(user_id = %user.id, "account registered");
    Ok(ApiResponse::created(RegisterResponse { user, token }))
}

/// Minimal shape check; deliverability is the mailer's problem.
fn is_plausible_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        _ => false,
    }
}
