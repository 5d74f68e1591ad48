//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::db::repositories::user::hash_password;
use crate::models::status::LockState;
use crate::models::user::{RegisterUser, UserRecord};
use crate::services::user_service::{UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn register(&self, mut params: RegisterUser) -> Result<String, UserError> {
        let password = std::mem::take(&mut params.password);
        let security = self.security.clone();

        // Argon2 would block the runtime
        params.password = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await
            .map_err(|e| UserError::Internal(format!("Password hashing task panicked: {e}")))??;

        Ok(self.store.user_register(params).await?)
    }

    async fn find_by_name(&self, username: &str) -> Result<Option<UserRecord>, UserError> {
        Ok(self.store.find_user_by_name(username).await?)
    }

    async fn set_lock(&self, user_id: &str, state: LockState) -> Result<(), UserError> {
        if self.store.set_user_lock(user_id, state).await? {
            Ok(())
        } else {
            Err(UserError::NotFound(user_id.to_string()))
        }
    }
}
