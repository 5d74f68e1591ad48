//! `SeaORM` implementation of the `DeviceService` trait.

use async_trait::async_trait;
use tracing::warn;

use crate::db::{Pagination, Store};
use crate::models::device::{
    DeviceCredentials, DeviceDetail, DeviceQuery, DeviceRecord, DeviceSummary, DeviceUpdate,
};
use crate::services::device_service::{DeviceError, DeviceService, RegisterDevice};

pub struct SeaOrmDeviceService {
    store: Store,
}

impl SeaOrmDeviceService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn link_grants(&self, id: &str, names: &[String]) -> Result<(), DeviceError> {
        if names.is_empty() {
            return Ok(());
        }

        self.store.save_grant(names).await?;
        let grant_ids = self.store.find_grants_by_name(names).await?;
        if grant_ids.len() < names.len() {
            // Duplicates in `names` also land here
            warn!(
                device = id,
                requested = names.len(),
                found = grant_ids.len(),
                "Not every requested grant resolved"
            );
        }

        self.store.save_grant_on_device(id, &grant_ids).await?;
        Ok(())
    }
}

#[async_trait]
impl DeviceService for SeaOrmDeviceService {
    async fn register(&self, request: RegisterDevice) -> Result<DeviceCredentials, DeviceError> {
        let credentials = self.store.save_device(request.device).await?;

        self.link_grants(&credentials.id, &request.grants).await?;

        if let Some(user_id) = request.user_id.as_deref() {
            self.store.upsert_device(&credentials.id, user_id).await?;
        }

        Ok(credentials)
    }

    async fn find_by_device_id(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceRecord>, DeviceError> {
        Ok(self.store.find_device_by_id(device_id).await?)
    }

    async fn detail(&self, id: &str) -> Result<DeviceDetail, DeviceError> {
        self.store
            .get_device_detail(id)
            .await?
            .ok_or_else(|| DeviceError::NotFound(id.to_string()))
    }

    async fn list(
        &self,
        query: &DeviceQuery,
    ) -> Result<Pagination<Vec<DeviceSummary>>, DeviceError> {
        Ok(self.store.page_list(query).await?)
    }

    async fn update(&self, update: DeviceUpdate) -> Result<DeviceDetail, DeviceError> {
        if update.is_empty() {
            return Err(DeviceError::Validation(
                "Update must change at least one field".to_string(),
            ));
        }

        let id = update.id.clone();
        self.store
            .update_device(update)
            .await?
            .ok_or_else(|| DeviceError::NotFound(id.clone()))?;

        self.detail(&id).await
    }

    async fn delete(&self, ids: &[String]) -> Result<u64, DeviceError> {
        Ok(self.store.batch_delete_device(ids).await?)
    }

    async fn assign_grants(&self, id: &str, names: &[String]) -> Result<Vec<String>, DeviceError> {
        // Fail before creating grants for a device that is not there
        self.detail(id).await?;
        self.link_grants(id, names).await?;

        Ok(self.detail(id).await?.grants)
    }

    async fn link_user(&self, id: &str, user_id: &str) -> Result<(), DeviceError> {
        self.detail(id).await?;
        self.store.upsert_device(id, user_id).await?;
        Ok(())
    }
}
