use std::collections::BTreeSet;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use tokio::task;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::error::{StoreError, StoreResult};
use crate::db::pagination::{Filter, PagePlan, PageWindow, Pagination};
use crate::entities::{devices, grant_on_device, grants, prelude::*, user_on_device};
use crate::models::device::{
    DeviceCredentials, DeviceDetail, DeviceQuery, DeviceRecord, DeviceSummary, DeviceUpdate,
    NewDevice,
};
use crate::models::status::{LockState, OnlineStatus};
use crate::secret::SecretDeriver;

pub struct DeviceRepository {
    conn: DatabaseConnection,
    secrets: SecretDeriver,
}

impl DeviceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection, secrets: SecretDeriver) -> Self {
        Self { conn, secrets }
    }

    /// Look up a device by its external id, with grant names.
    pub async fn find_by_device_id(&self, device_id: &str) -> StoreResult<Option<DeviceRecord>> {
        debug!(device_id, "Looking up device by external id");

        let Some(device) = Devices::find()
            .filter(devices::Column::DeviceId.eq(device_id))
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let grants = device
            .find_related(Grants)
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|g| g.name)
            .collect();

        Ok(Some(DeviceRecord { device, grants }))
    }

    /// Create the user/device link or refresh its `updated_at`.
    pub async fn upsert_user_link(&self, device_id: &str, user_id: &str) -> StoreResult<()> {
        info!(device_id, user_id, "Upserting user on device");

        let now = chrono::Utc::now().to_rfc3339();
        let link = user_on_device::ActiveModel {
            user_id: Set(user_id.to_string()),
            device_id: Set(device_id.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        UserOnDevice::insert(link)
            .on_conflict(
                OnConflict::columns([
                    user_on_device::Column::UserId,
                    user_on_device::Column::DeviceId,
                ])
                .update_column(user_on_device::Column::UpdatedAt)
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn insert_user_link(&self, device_id: &str, user_id: &str) -> StoreResult<()> {
        info!(device_id, user_id, "Inserting user on device");

        let now = chrono::Utc::now().to_rfc3339();
        let link = user_on_device::ActiveModel {
            user_id: Set(user_id.to_string()),
            device_id: Set(device_id.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        UserOnDevice::insert(link)
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    /// Register a device. The secret is derived here and never recomputed.
    pub async fn save(&self, device: NewDevice) -> StoreResult<DeviceCredentials> {
        info!(device_id = %device.device_id, name = %device.name, "Saving device");

        let secrets = self.secrets.clone();
        let external_id = device.device_id.clone();
        // PBKDF2 is CPU-bound
        let device_secret = task::spawn_blocking(move || secrets.derive(&external_id))
            .await
            .map_err(|e| StoreError::Internal(format!("Secret derivation task panicked: {e}")))?;

        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = devices::ActiveModel {
            id: Set(id.clone()),
            device_id: Set(device.device_id),
            name: Set(device.name),
            os: Set(device.os),
            device_type: Set(device.device_type),
            engine: Set(device.engine),
            is_online: Set(OnlineStatus::Online),
            is_locked: Set(LockState::Unlocked),
            device_secret: Set(device_secret.clone()),
            access_token_validate_seconds: Set(device.access_token_validate_seconds),
            refresh_token_validate_seconds: Set(device.refresh_token_validate_seconds),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        Devices::insert(active_model)
            .exec_without_returning(&self.conn)
            .await?;

        Ok(DeviceCredentials { id, device_secret })
    }

    /// Insert grants by name; names that already exist are skipped.
    pub async fn save_grants(&self, names: &[String]) -> StoreResult<()> {
        let names: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        if names.is_empty() {
            return Ok(());
        }

        let models: Vec<grants::ActiveModel> = names
            .into_iter()
            .map(|name| grants::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                name: Set(name.to_string()),
            })
            .collect();

        let inserted = Grants::insert_many(models)
            .on_conflict(
                OnConflict::column(grants::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        info!(inserted, "Saved grants");
        Ok(())
    }

    /// Ids of the grants with the given names. Unknown names are dropped.
    pub async fn find_grants_by_name(&self, names: &[String]) -> StoreResult<Vec<String>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = Grants::find()
            .select_only()
            .column(grants::Column::Id)
            .filter(grants::Column::Name.is_in(names.iter().cloned()))
            .into_tuple()
            .all(&self.conn)
            .await?;

        debug!(requested = names.len(), found = ids.len(), "Resolved grants by name");
        Ok(ids)
    }

    /// Link grants to a device; pairs that already exist are skipped.
    pub async fn save_grant_links(&self, device_id: &str, grant_ids: &[String]) -> StoreResult<()> {
        let grant_ids: BTreeSet<&str> = grant_ids.iter().map(String::as_str).collect();
        if grant_ids.is_empty() {
            return Ok(());
        }

        let now = chrono::Utc::now().to_rfc3339();
        let models: Vec<grant_on_device::ActiveModel> = grant_ids
            .into_iter()
            .map(|grant_id| grant_on_device::ActiveModel {
                device_id: Set(device_id.to_string()),
                grant_id: Set(grant_id.to_string()),
                created_at: Set(now.clone()),
            })
            .collect();

        GrantOnDevice::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    grant_on_device::Column::DeviceId,
                    grant_on_device::Column::GrantId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        info!(device_id, "Saved grants on device");
        Ok(())
    }

    /// Partial update of the mutable fields. Returns `None` if no device has `id`.
    pub async fn update(&self, update: DeviceUpdate) -> StoreResult<Option<String>> {
        let id = update.id;
        let mut active = devices::ActiveModel {
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        if let Some(is_online) = update.is_online {
            active.is_online = Set(is_online);
        }
        if let Some(os) = update.os {
            active.os = Set(Some(os));
        }
        if let Some(engine) = update.engine {
            active.engine = Set(Some(engine));
        }
        if let Some(is_locked) = update.is_locked {
            active.is_locked = Set(is_locked);
        }
        if let Some(seconds) = update.access_token_validate_seconds {
            active.access_token_validate_seconds = Set(Some(seconds));
        }
        if let Some(seconds) = update.refresh_token_validate_seconds {
            active.refresh_token_validate_seconds = Set(Some(seconds));
        }

        let result = Devices::update_many()
            .set(active)
            .filter(devices::Column::Id.eq(id.as_str()))
            .exec(&self.conn)
            .await?;

        info!(id = %id, rows = result.rows_affected, "Updated device");
        Ok((result.rows_affected > 0).then_some(id))
    }

    /// Device by primary id with its full grant rows.
    pub async fn get_by_id(
        &self,
        id: &str,
    ) -> StoreResult<Option<(devices::Model, Vec<grants::Model>)>> {
        debug!(id, "Getting device by id");

        let Some(device) = Devices::find_by_id(id.to_string()).one(&self.conn).await? else {
            return Ok(None);
        };
        let grants = device.find_related(Grants).all(&self.conn).await?;

        Ok(Some((device, grants)))
    }

    pub async fn get_detail(&self, id: &str) -> StoreResult<Option<DeviceDetail>> {
        debug!(id, "Getting device detail");

        let Some(device) = summary_select()
            .filter(devices::Column::Id.eq(id))
            .into_model::<DeviceSummary>()
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let grants: Vec<String> = Grants::find()
            .select_only()
            .column(grants::Column::Name)
            .inner_join(GrantOnDevice)
            .filter(grant_on_device::Column::DeviceId.eq(id))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(Some(DeviceDetail { device, grants }))
    }

    pub async fn page_list(
        &self,
        query: &DeviceQuery,
        max_page_size: u64,
    ) -> StoreResult<Pagination<Vec<DeviceSummary>>> {
        let window = PageWindow::new(query.page_number, query.page_size, max_page_size)?;
        let filter = Filter::new()
            .contains(devices::Column::Name, query.name.as_deref())
            .eq_str(devices::Column::DeviceId, query.device_id.as_deref())
            .eq_str(devices::Column::Os, query.os.as_deref())
            .eq_str(devices::Column::DeviceType, query.device_type.as_deref())
            .eq_str(devices::Column::Engine, query.engine.as_deref())
            .eq(devices::Column::IsOnline, query.is_online)
            .eq(devices::Column::IsLocked, query.is_locked);
        let plan = PagePlan::new(filter, window);

        let data = plan
            .page(summary_select())
            .order_by_asc(devices::Column::CreatedAt)
            .order_by_asc(devices::Column::Id)
            .into_model::<DeviceSummary>()
            .all(&self.conn)
            .await?;

        let total = plan.count(Devices::find()).count(&self.conn).await?;

        debug!(
            page = window.page_number,
            size = window.page_size,
            returned = data.len(),
            total,
            "Listed devices"
        );

        Ok(window.wrap(data, total))
    }

    /// Delete devices and every join row that references them, atomically.
    pub async fn batch_delete(&self, ids: &[String]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let txn = self
            .conn
            .begin()
            .await
            .map_err(StoreError::in_transaction)?;

        UserOnDevice::delete_many()
            .filter(user_on_device::Column::DeviceId.is_in(ids.iter().cloned()))
            .exec(&txn)
            .await
            .map_err(StoreError::in_transaction)?;

        GrantOnDevice::delete_many()
            .filter(grant_on_device::Column::DeviceId.is_in(ids.iter().cloned()))
            .exec(&txn)
            .await
            .map_err(StoreError::in_transaction)?;

        let result = Devices::delete_many()
            .filter(devices::Column::Id.is_in(ids.iter().cloned()))
            .exec(&txn)
            .await
            .map_err(StoreError::in_transaction)?;

        txn.commit().await.map_err(StoreError::in_transaction)?;

        info!(
            requested = ids.len(),
            deleted = result.rows_affected,
            "Batch deleted devices"
        );
        Ok(result.rows_affected)
    }
}

/// Device columns without the secret.
fn summary_select() -> Select<Devices> {
    Devices::find().select_only().columns([
        devices::Column::Id,
        devices::Column::DeviceId,
        devices::Column::Name,
        devices::Column::Os,
        devices::Column::DeviceType,
        devices::Column::Engine,
        devices::Column::IsOnline,
        devices::Column::IsLocked,
        devices::Column::AccessTokenValidateSeconds,
        devices::Column::RefreshTokenValidateSeconds,
        devices::Column::CreatedAt,
        devices::Column::UpdatedAt,
    ])
}
