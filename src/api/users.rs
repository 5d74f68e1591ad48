use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::validation::{validate_password, validate_username};
use super::{ApiError, ApiResponse, AppState, CreatedDto, LockRequest};
use crate::models::status::LockState;
use crate::models::user::{RegisterUser, UserInfo};
use crate::services::UserError;

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(msg) => Self::NotFound(msg),
            UserError::UsernameTaken(msg) => Self::Conflict(msg),
            UserError::Validation(msg) => Self::validation(msg),
            UserError::Database(msg) => Self::DatabaseError(msg),
            UserError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `POST /api/users`
///
/// New accounts start locked with the default scope.
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterUser>,
) -> Result<Json<ApiResponse<CreatedDto>>, ApiError> {
    validate_username(&payload.username)?;
    validate_password(&payload.password)?;

    let id = state.user_service().register(payload).await?;
    Ok(Json(ApiResponse::success(CreatedDto { id })))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    validate_username(&username)?;

    let record = state
        .user_service()
        .find_by_name(&username)
        .await?
        .ok_or_else(|| ApiError::user_not_found(&username))?;

    Ok(Json(ApiResponse::success(record.into())))
}

/// `PUT /api/users/{id}/lock`
pub async fn set_lock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<LockRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .user_service()
        .set_lock(&id, LockState::from(payload.locked))
        .await?;
    Ok(Json(ApiResponse::success(())))
}
