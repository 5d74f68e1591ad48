use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedDto {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteDevicesRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletedDto {
    pub deleted: u64,
}

#[derive(Debug, Deserialize)]
pub struct GrantNamesRequest {
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GrantListDto {
    pub grants: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkUserRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LockRequest {
    pub locked: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime: u64,
    pub database: bool,
}
