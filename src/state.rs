use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::keys::KeyNamer;
use crate::services::{DeviceService, SeaOrmDeviceService, SeaOrmUserService, UserService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub device_service: Arc<dyn DeviceService>,

    pub user_service: Arc<dyn UserService>,

    /// Cache key names handed to the token and client layers.
    pub keys: KeyNamer,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::from_config(&config).await?;
        Ok(Self::with_store(config, store))
    }

    /// Builds the services around an already connected store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let device_service = Arc::new(SeaOrmDeviceService::new(store.clone()))
            as Arc<dyn DeviceService + Send + Sync + 'static>;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn UserService + Send + Sync + 'static>;

        let keys = KeyNamer::new(config.cache.clone());

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            device_service,
            user_service,
            keys,
        }
    }
}
