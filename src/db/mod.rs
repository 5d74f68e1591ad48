use crate::config::Config;
use crate::entities::{devices, grants};
use crate::models::device::{
    DeviceCredentials, DeviceDetail, DeviceQuery, DeviceRecord, DeviceSummary, DeviceUpdate,
    NewDevice,
};
use crate::models::status::LockState;
use crate::models::user::{RegisterUser, UserRecord};
use crate::secret::SecretDeriver;
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod error;
pub mod migrator;
pub mod pagination;
pub mod repositories;

pub use error::{StoreError, StoreResult};
pub use pagination::Pagination;

const DEFAULT_MAX_PAGE_SIZE: u64 = 100;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    secrets: SecretDeriver,
    max_page_size: u64,
}

impl Store {
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = Self::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(store
            .with_secret_deriver(SecretDeriver::from_config(&config.security))
            .with_max_page_size(config.devices.max_page_size))
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self {
            conn,
            secrets: SecretDeriver::default(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        })
    }

    #[must_use]
    pub fn with_secret_deriver(mut self, secrets: SecretDeriver) -> Self {
        self.secrets = secrets;
        self
    }

    #[must_use]
    pub const fn with_max_page_size(mut self, max_page_size: u64) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn device_repo(&self) -> repositories::device::DeviceRepository {
        repositories::device::DeviceRepository::new(self.conn.clone(), self.secrets.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn find_device_by_id(&self, device_id: &str) -> StoreResult<Option<DeviceRecord>> {
        self.device_repo().find_by_device_id(device_id).await
    }

    pub async fn upsert_device(&self, device_id: &str, user_id: &str) -> StoreResult<()> {
        self.device_repo().upsert_user_link(device_id, user_id).await
    }

    pub async fn insert_user_on_device(&self, device_id: &str, user_id: &str) -> StoreResult<()> {
        self.device_repo().insert_user_link(device_id, user_id).await
    }

    pub async fn save_device(&self, device: NewDevice) -> StoreResult<DeviceCredentials> {
        self.device_repo().save(device).await
    }

    pub async fn save_grant(&self, names: &[String]) -> StoreResult<()> {
        self.device_repo().save_grants(names).await
    }

    pub async fn find_grants_by_name(&self, names: &[String]) -> StoreResult<Vec<String>> {
        self.device_repo().find_grants_by_name(names).await
    }

    pub async fn save_grant_on_device(
        &self,
        device_id: &str,
        grant_ids: &[String],
    ) -> StoreResult<()> {
        self.device_repo()
            .save_grant_links(device_id, grant_ids)
            .await
    }

    pub async fn update_device(&self, update: DeviceUpdate) -> StoreResult<Option<String>> {
        self.device_repo().update(update).await
    }

    pub async fn get_device_by_id(
        &self,
        id: &str,
    ) -> StoreResult<Option<(devices::Model, Vec<grants::Model>)>> {
        self.device_repo().get_by_id(id).await
    }

    pub async fn get_device_detail(&self, id: &str) -> StoreResult<Option<DeviceDetail>> {
        self.device_repo().get_detail(id).await
    }

    pub async fn page_list(
        &self,
        query: &DeviceQuery,
    ) -> StoreResult<Pagination<Vec<DeviceSummary>>> {
        self.device_repo()
            .page_list(query, self.max_page_size)
            .await
    }

    pub async fn batch_delete_device(&self, ids: &[String]) -> StoreResult<u64> {
        self.device_repo().batch_delete(ids).await
    }

    pub async fn find_user_by_name(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        self.user_repo().find_by_username(username).await
    }

    pub async fn user_register(&self, params: RegisterUser) -> StoreResult<String> {
        self.user_repo().register(params).await
    }

    pub async fn set_user_lock(&self, user_id: &str, state: LockState) -> StoreResult<bool> {
        self.user_repo().set_lock(user_id, state).await
    }
}
