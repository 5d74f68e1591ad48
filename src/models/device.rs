use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use super::status::{LockState, OnlineStatus};
use crate::db::pagination::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::entities::devices;

#[derive(Debug, Clone, Deserialize)]
pub struct NewDevice {
    pub device_id: String,
    pub name: String,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default, rename = "type")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub access_token_validate_seconds: Option<i64>,
    #[serde(default)]
    pub refresh_token_validate_seconds: Option<i64>,
}

/// The only projection that carries the device secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCredentials {
    pub id: String,
    pub device_secret: String,
}

/// Partial update keyed by primary id. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceUpdate {
    #[serde(default)]
    pub id: String,
    pub is_online: Option<OnlineStatus>,
    pub os: Option<String>,
    pub engine: Option<String>,
    pub is_locked: Option<LockState>,
    pub access_token_validate_seconds: Option<i64>,
    pub refresh_token_validate_seconds: Option<i64>,
}

impl DeviceUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.is_online.is_none()
            && self.os.is_none()
            && self.engine.is_none()
            && self.is_locked.is_none()
            && self.access_token_validate_seconds.is_none()
            && self.refresh_token_validate_seconds.is_none()
    }
}

/// Device looked up by its external id, with grant names attached.
#[derive(Debug, Clone)]
pub struct DeviceRecord {
    pub device: devices::Model,
    pub grants: Vec<String>,
}

/// Listing projection; never includes the secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct DeviceSummary {
    pub id: String,
    pub device_id: String,
    pub name: String,
    pub os: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub engine: Option<String>,
    pub is_online: OnlineStatus,
    pub is_locked: LockState,
    pub access_token_validate_seconds: Option<i64>,
    pub refresh_token_validate_seconds: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<devices::Model> for DeviceSummary {
    fn from(model: devices::Model) -> Self {
        Self {
            id: model.id,
            device_id: model.device_id,
            name: model.name,
            os: model.os,
            device_type: model.device_type,
            engine: model.engine,
            is_online: model.is_online,
            is_locked: model.is_locked,
            access_token_validate_seconds: model.access_token_validate_seconds,
            refresh_token_validate_seconds: model.refresh_token_validate_seconds,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceDetail {
    #[serde(flatten)]
    pub device: DeviceSummary,
    pub grants: Vec<String>,
}

impl From<DeviceRecord> for DeviceDetail {
    fn from(record: DeviceRecord) -> Self {
        Self {
            device: record.device.into(),
            grants: record.grants,
        }
    }
}

/// Filter and page parameters for the device listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceQuery {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    pub name: Option<String>,
    pub device_id: Option<String>,
    pub os: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub engine: Option<String>,
    pub is_online: Option<OnlineStatus>,
    pub is_locked: Option<LockState>,
}

const fn default_page_number() -> i64 {
    DEFAULT_PAGE_NUMBER
}

const fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for DeviceQuery {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
            name: None,
            device_id: None,
            os: None,
            device_type: None,
            engine: None,
            is_online: None,
            is_locked: None,
        }
    }
}

impl DeviceQuery {
    #[must_use]
    pub fn page(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number,
            page_size,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_device_reads_type_field() {
        let device: NewDevice = serde_json::from_str(
            r#"{"device_id": "tv-1", "name": "Den", "type": "stb", "access_token_validate_seconds": 600}"#,
        )
        .unwrap();

        assert_eq!(device.device_type.as_deref(), Some("stb"));
        assert_eq!(device.access_token_validate_seconds, Some(600));
        assert!(device.os.is_none());
    }

    #[test]
    fn test_device_update_is_empty() {
        let update: DeviceUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());

        let update: DeviceUpdate = serde_json::from_str(r#"{"is_online": "OFFLINE"}"#).unwrap();
        assert!(!update.is_empty());
        assert_eq!(update.is_online, Some(OnlineStatus::Offline));
    }

    #[test]
    fn test_query_defaults() {
        let query: DeviceQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page_number, DEFAULT_PAGE_NUMBER);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert!(query.name.is_none());
    }
}
