//! Device registry endpoints.
//!
//! Handlers validate the request, delegate to [`DeviceService`] and wrap the
//! result in the JSON envelope. The device secret only leaves the server in
//! the response to `POST /api/devices`.
//!
//! [`DeviceService`]: crate::services::DeviceService

use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::validation::{
    validate_device_id, validate_device_name, validate_grant_names, validate_page,
};
use super::{
    ApiError, ApiResponse, AppState, DeleteDevicesRequest, DeletedDto, GrantListDto,
    GrantNamesRequest, LinkUserRequest,
};
use crate::db::Pagination;
use crate::models::device::{
    DeviceCredentials, DeviceDetail, DeviceQuery, DeviceSummary, DeviceUpdate,
};
use crate::services::{DeviceError, RegisterDevice};

impl From<DeviceError> for ApiError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::NotFound(msg) => Self::NotFound(msg),
            DeviceError::Conflict(msg) => Self::Conflict(msg),
            DeviceError::Validation(msg) => Self::validation(msg),
            DeviceError::Database(msg) => Self::DatabaseError(msg),
            DeviceError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `POST /api/devices`
///
/// Registers a device and returns its primary id and derived secret.
pub async fn create_device(
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<RegisterDevice>,
) -> Result<Json<ApiResponse<DeviceCredentials>>, ApiError> {
    payload.device.device_id = validate_device_id(&payload.device.device_id)?.to_string();
    payload.device.name = validate_device_name(&payload.device.name)?.to_string();
    payload.grants = validate_grant_names(&payload.grants)?;

    let credentials = state.device_service().register(payload).await?;
    Ok(Json(ApiResponse::success(credentials)))
}

/// `GET /api/devices`
pub async fn list_devices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<ApiResponse<Pagination<Vec<DeviceSummary>>>>, ApiError> {
    let max_page_size = state.config().read().await.devices.max_page_size;
    validate_page(query.page_number, query.page_size, max_page_size)?;

    let page = state.device_service().list(&query).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// `DELETE /api/devices`
pub async fn delete_devices(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeleteDevicesRequest>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let deleted = state.device_service().delete(&payload.ids).await?;
    Ok(Json(ApiResponse::success(DeletedDto { deleted })))
}

pub async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeviceDetail>>, ApiError> {
    let detail = state.device_service().detail(&id).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// `PUT /api/devices/{id}`
///
/// Partial update; fields missing from the body are left as they are.
pub async fn update_device(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(mut update): Json<DeviceUpdate>,
) -> Result<Json<ApiResponse<DeviceDetail>>, ApiError> {
    update.id = id;
    let detail = state.device_service().update(update).await?;
    Ok(Json(ApiResponse::success(detail)))
}

/// `POST /api/devices/{id}/grants`
pub async fn assign_grants(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<GrantNamesRequest>,
) -> Result<Json<ApiResponse<GrantListDto>>, ApiError> {
    let names = validate_grant_names(&payload.names)?;
    let grants = state.device_service().assign_grants(&id, &names).await?;
    Ok(Json(ApiResponse::success(GrantListDto { grants })))
}

/// `POST /api/devices/{id}/users`
pub async fn link_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<LinkUserRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if payload.user_id.trim().is_empty() {
        return Err(ApiError::validation("User ID cannot be empty"));
    }

    state.device_service().link_user(&id, &payload.user_id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// `GET /api/devices/by-device-id/{device_id}`
pub async fn get_device_by_device_id(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<String>,
) -> Result<Json<ApiResponse<DeviceDetail>>, ApiError> {
    let device_id = validate_device_id(&device_id)?;
    let record = state
        .device_service()
        .find_by_device_id(device_id)
        .await?
        .ok_or_else(|| ApiError::device_not_found(device_id))?;

    Ok(Json(ApiResponse::success(record.into())))
}
