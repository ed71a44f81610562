// POST /auth/recover          - request a recovery link
// POST /auth/recover/confirm  - redeem a recovery token
//
// Both endpoints are enumeration-resistant: the request endpoint acknowledges
// every well-formed identifier identically, and the confirm endpoint returns
// one generic message for every failure sub-case.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, RECOVERY_REQUESTED_MESSAGE};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecoverRequest {
    pub identifier: String,
}

#[derive(Debug, Deserialize)]
pub struct RecoverConfirmRequest {
    pub identifier: String,
    pub secret: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn recover_post(
    State(state): State<AppState>,
    payload: Result<Json<RecoverRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let Json(payload) = payload.map_err(structural)?;

    if payload.identifier.trim().is_empty() {
        return Err(ApiError::bad_request("identifier is required"));
    }

    // The outcome (issued or no such account) never changes the response
    state.recovery.issue(&payload.identifier).await?;

    Ok(ApiResponse::success(MessageResponse {
        message: RECOVERY_REQUESTED_MESSAGE,
    }))
}

pub async fn recover_confirm_post(
    State(state): State<AppState>,
    payload: Result<Json<RecoverConfirmRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let Json(payload) = payload.map_err(structural)?;

    state
        .recovery
        .redeem(&payload.secret, &payload.identifier, &payload.new_password)
        .await?;

    Ok(ApiResponse::success(MessageResponse {
        message: "Password updated",
    }))
}

/// Missing or wrong-typed fields are the only inputs that earn a 400 with
/// specific wording on these routes.
fn structural(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(rejection.body_text())
}
