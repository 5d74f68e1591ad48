//! Domain service for device registration and access control.
//!
//! Wraps the store operations into the flows callers actually run: registering
//! a device together with its grants and owner, assigning grants by name, and
//! reading, updating or removing devices.

use serde::Deserialize;
use thiserror::Error;

use crate::db::{Pagination, StoreError};
use crate::models::device::{
    DeviceCredentials, DeviceDetail, DeviceQuery, DeviceRecord, DeviceSummary, DeviceUpdate,
    NewDevice,
};

/// Domain errors for device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Device not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for DeviceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => Self::NotFound(msg),
            StoreError::UniqueConstraintViolation(msg) => Self::Conflict(msg),
            StoreError::InvalidArgument(msg) => Self::Validation(msg),
            StoreError::TransactionFailure(msg) | StoreError::Database(msg) => {
                Self::Database(msg)
            }
            StoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// Device registration request: the device plus optional owner and grants.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDevice {
    #[serde(flatten)]
    pub device: NewDevice,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub grants: Vec<String>,
}

#[async_trait::async_trait]
pub trait DeviceService: Send + Sync {
    /// Registers a device, creates any missing grants and links them, and
    /// links the owning user when one is given.
    ///
    /// The steps are not one transaction: a failure after the device row is
    /// written leaves the device registered without the remaining links.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Conflict`] if the device id is already registered.
    async fn register(&self, request: RegisterDevice) -> Result<DeviceCredentials, DeviceError>;

    /// Looks a device up by its external id. The record includes the secret.
    async fn find_by_device_id(&self, device_id: &str)
    -> Result<Option<DeviceRecord>, DeviceError>;

    async fn detail(&self, id: &str) -> Result<DeviceDetail, DeviceError>;

    async fn list(
        &self,
        query: &DeviceQuery,
    ) -> Result<Pagination<Vec<DeviceSummary>>, DeviceError>;

    /// Applies a partial update and returns the updated detail.
    async fn update(&self, update: DeviceUpdate) -> Result<DeviceDetail, DeviceError>;

    /// Removes devices and their links. Unknown ids are ignored.
    async fn delete(&self, ids: &[String]) -> Result<u64, DeviceError>;

    /// Creates missing grants, links all of them and returns the device's
    /// full grant list afterwards.
    async fn assign_grants(&self, id: &str, names: &[String]) -> Result<Vec<String>, DeviceError>;

    async fn link_user(&self, id: &str, user_id: &str) -> Result<(), DeviceError>;
}
